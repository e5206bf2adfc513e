//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Json,
};
use axum_extra::extract::Form;

use crate::{
    access::{self, Permission},
    error::{AppError, AppResult},
    models::{
        book::{BookDetail, BookForm, BookFormDocument},
        page::{BookPage, Page, PageQuery},
        BookSummary,
    },
};

use super::CurrentUser;

/// List books, three per page, by title
#[utoipa::path(
    get,
    path = "/catalog/books/",
    tag = "books",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of books", body = BookPage),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<BookSummary>>> {
    let page = state.services.catalog.list_books(query.number()).await?;
    Ok(Json(page))
}

/// Get book details with author, language, genres and copies
#[utoipa::path(
    get,
    path = "/catalog/book/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetail),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetail>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Blank book form
#[utoipa::path(
    get,
    path = "/catalog/book/create/",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Form document", body = BookFormDocument),
        (status = 403, description = "Missing catalog.can_change")
    )
)]
pub async fn create_form(
    State(state): State<crate::AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<BookFormDocument>> {
    access::require(user.as_ref(), Permission::CanChange)?;
    let form = state.services.catalog.book_create_form().await?;
    Ok(Json(form))
}

/// Create a book with its genres
#[utoipa::path(
    post,
    path = "/catalog/book/create/",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to the new book"),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing catalog.can_change")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<BookForm>,
) -> AppResult<Redirect> {
    access::require(user.as_ref(), Permission::CanChange)?;
    let fields = form.clean().map_err(AppError::InvalidForm)?;
    let book = state.services.catalog.create_book(&fields).await?;
    Ok(Redirect::to(&book.url()))
}

/// Book form filled with the current values
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/update/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Form document", body = BookFormDocument),
        (status = 403, description = "Missing catalog.can_change"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_form(
    State(state): State<crate::AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookFormDocument>> {
    access::require(user.as_ref(), Permission::CanChange)?;
    let form = state.services.catalog.book_update_form(id).await?;
    Ok(Json(form))
}

/// Update a book and replace its genres
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/update/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to the book"),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing catalog.can_change"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    Form(form): Form<BookForm>,
) -> AppResult<Redirect> {
    access::require(user.as_ref(), Permission::CanChange)?;
    let fields = form.clean().map_err(AppError::InvalidForm)?;
    let book = state.services.catalog.update_book(id, &fields).await?;
    Ok(Redirect::to(&book.url()))
}

/// Delete a book; its copies lose their book reference
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/delete/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 303, description = "Redirect to the book list"),
        (status = 403, description = "Missing catalog.can_change"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<Redirect> {
    access::require(user.as_ref(), Permission::CanChange)?;
    state.services.catalog.delete_book(id).await?;
    Ok(Redirect::to("/catalog/books/"))
}
