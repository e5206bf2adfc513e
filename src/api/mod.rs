//! API handlers for the Local Library endpoints

pub mod accounts;
pub mod authors;
pub mod books;
pub mod catalog;
pub mod health;
pub mod home;
pub mod loans;
pub mod openapi;

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Claims carried by a `Bearer` authorization header
fn bearer_claims(parts: &Parts, secret: &str) -> Result<UserClaims, AppError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

    UserClaims::from_token(token, secret).map_err(|e| AppError::Authentication(e.to_string()))
}

/// Caller identity; `None` for anonymous requests.
///
/// A missing or invalid token makes the request anonymous, permission checks
/// then decide what an anonymous caller may do.
pub struct CurrentUser(pub Option<UserClaims>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match bearer_claims(parts, &state.config.auth.jwt_secret) {
            Ok(claims) => Ok(CurrentUser(Some(claims))),
            Err(e) => {
                if parts.headers.contains_key(AUTHORIZATION) {
                    tracing::debug!("Ignoring credentials: {}", e);
                }
                Ok(CurrentUser(None))
            }
        }
    }
}

/// Signed-in user; anonymous callers are sent to the login page
pub struct LoggedInUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for LoggedInUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        bearer_claims(parts, &state.config.auth.jwt_secret)
            .map(LoggedInUser)
            .map_err(|_| AppError::LoginRequired {
                next: parts.uri.path().to_string(),
            })
    }
}

/// Session identified by the session cookie, started on first use
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub cookie_name: String,
}

impl Session {
    /// Cookie to send back so the browser keeps the session
    pub fn cookie(&self) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), self.id.clone()))
            .path("/")
            .http_only(true)
            .build()
    }

    /// Jar carrying the session cookie, to be returned with the response
    pub fn jar(&self) -> CookieJar {
        CookieJar::new().add(self.cookie())
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let cookie_name = state.config.session.cookie_name.clone();
        let jar = CookieJar::from_headers(&parts.headers);

        // Anything but a well-formed id starts a fresh session
        let id = jar
            .get(&cookie_name)
            .and_then(|cookie| Uuid::try_parse(cookie.value()).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Session {
            id: id.simple().to_string(),
            cookie_name,
        })
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(home::root_redirect))
        .route("/catalog/", get(home::index))
        // Books
        .route("/catalog/books/", get(books::list_books))
        .route("/catalog/book/create/", get(books::create_form).post(books::create_book))
        .route("/catalog/book/:id", get(books::get_book))
        .route("/catalog/book/:id/update/", get(books::update_form).post(books::update_book))
        .route("/catalog/book/:id/delete/", post(books::delete_book))
        .route("/catalog/book/:id/renew/", get(loans::renew_form).post(loans::renew_book))
        // Authors
        .route("/catalog/authors/", get(authors::list_authors))
        .route("/catalog/author/create/", get(authors::create_form).post(authors::create_author))
        .route("/catalog/author/:id", get(authors::get_author))
        .route("/catalog/author/:id/update/", get(authors::update_form).post(authors::update_author))
        .route("/catalog/author/:id/delete/", post(authors::delete_author))
        // Loans
        .route("/catalog/mybooks/", get(loans::my_borrowed))
        .route("/catalog/all-borrowed-books/", get(loans::all_borrowed))
        // Genres, languages and copies
        .route("/catalog/genres/", get(catalog::list_genres))
        .route("/catalog/genre/create/", post(catalog::create_genre))
        .route("/catalog/languages/", get(catalog::list_languages))
        .route("/catalog/language/create/", post(catalog::create_language))
        .route("/catalog/bookinstance/create/", post(catalog::create_instance))
        .route("/catalog/bookinstance/:id/update/", post(catalog::update_instance))
        // Accounts
        .route("/accounts/login/", get(accounts::login_form).post(accounts::login))
        .route("/accounts/users/", post(accounts::create_user))
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .with_state(state);

    Router::new()
        .merge(app)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
