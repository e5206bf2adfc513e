//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{accounts, authors, books, catalog, health, home, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Local Library API",
        version = "0.3.0",
        description = "Catalog, loans and renewals of a small lending library"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Home
        home::root_redirect,
        home::index,
        // Books
        books::list_books,
        books::get_book,
        books::create_form,
        books::create_book,
        books::update_form,
        books::update_book,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_form,
        authors::create_author,
        authors::update_form,
        authors::update_author,
        authors::delete_author,
        // Loans
        loans::my_borrowed,
        loans::all_borrowed,
        loans::renew_form,
        loans::renew_book,
        // Genres, languages and copies
        catalog::list_genres,
        catalog::create_genre,
        catalog::list_languages,
        catalog::create_language,
        catalog::create_instance,
        catalog::update_instance,
        // Accounts
        accounts::login_form,
        accounts::login,
        accounts::create_user,
    ),
    components(
        schemas(
            // Catalog
            crate::models::catalog::CatalogCounts,
            crate::models::catalog::HomePage,
            crate::models::catalog::Genre,
            crate::models::catalog::Language,
            crate::models::catalog::NameForm,
            // Books
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::BookRef,
            crate::models::book::BookDetail,
            crate::models::book::BookForm,
            crate::models::book::BookFields,
            crate::models::book::BookFormDocument,
            crate::models::page::BookPage,
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorListEntry,
            crate::models::author::AuthorRef,
            crate::models::author::AuthorDetail,
            crate::models::author::AuthorForm,
            crate::models::author::AuthorFields,
            crate::models::author::AuthorFormDocument,
            crate::models::page::AuthorPage,
            // Copies and loans
            crate::models::book_instance::LoanStatus,
            crate::models::book_instance::BookInstance,
            crate::models::book_instance::CopyEntry,
            crate::models::book_instance::BorrowedCopy,
            crate::models::book_instance::BookInstanceForm,
            crate::models::book_instance::RenewalForm,
            crate::models::book_instance::RenewalFormDocument,
            crate::models::page::BorrowedCopyPage,
            // Accounts
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            crate::models::user::LoginFormDocument,
            crate::models::user::UserInfo,
            crate::models::user::CreateUser,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Home page, genres, languages and copies"),
        (name = "books", description = "Book browsing and editing"),
        (name = "authors", description = "Author browsing and editing"),
        (name = "loans", description = "Borrowed books and renewals"),
        (name = "accounts", description = "Login and user accounts")
    )
)]
pub struct ApiDoc;

/// Declares the `bearer_auth` scheme referenced by gated paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
