//! Genre, language and copy endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Form;
use uuid::Uuid;

use crate::{
    access::{self, Permission},
    error::{AppError, AppResult},
    models::{
        book_instance::BookInstanceForm,
        catalog::{Genre, Language, NameForm},
        BookInstance,
    },
};

use super::CurrentUser;

#[utoipa::path(
    get,
    path = "/catalog/genres/",
    tag = "catalog",
    responses(
        (status = 200, description = "Genres by name", body = Vec<Genre>)
    )
)]
pub async fn list_genres(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.services.catalog.list_genres().await?;
    Ok(Json(genres))
}

#[utoipa::path(
    post,
    path = "/catalog/genre/create/",
    tag = "catalog",
    security(("bearer_auth" = [])),
    request_body(content = NameForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 400, description = "Invalid or duplicate name", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing catalog.can_change")
    )
)]
pub async fn create_genre(
    State(state): State<crate::AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<NameForm>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    access::require(user.as_ref(), Permission::CanChange)?;
    let name = form.clean().map_err(AppError::InvalidForm)?;
    let genre = state.services.catalog.create_genre(&name).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

#[utoipa::path(
    get,
    path = "/catalog/languages/",
    tag = "catalog",
    responses(
        (status = 200, description = "Languages by name", body = Vec<Language>)
    )
)]
pub async fn list_languages(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Language>>> {
    let languages = state.services.catalog.list_languages().await?;
    Ok(Json(languages))
}

#[utoipa::path(
    post,
    path = "/catalog/language/create/",
    tag = "catalog",
    security(("bearer_auth" = [])),
    request_body(content = NameForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Language created", body = Language),
        (status = 400, description = "Invalid or duplicate name", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing catalog.can_change")
    )
)]
pub async fn create_language(
    State(state): State<crate::AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<NameForm>,
) -> AppResult<(StatusCode, Json<Language>)> {
    access::require(user.as_ref(), Permission::CanChange)?;
    let name = form.clean().map_err(AppError::InvalidForm)?;
    let language = state.services.catalog.create_language(&name).await?;
    Ok((StatusCode::CREATED, Json(language)))
}

/// Register a new copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/create/",
    tag = "catalog",
    security(("bearer_auth" = [])),
    request_body(content = BookInstanceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Copy created", body = BookInstance),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing catalog.can_change")
    )
)]
pub async fn create_instance(
    State(state): State<crate::AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<(StatusCode, Json<BookInstance>)> {
    access::require(user.as_ref(), Permission::CanChange)?;
    let fields = form.clean().map_err(AppError::InvalidForm)?;
    let copy = state.services.loans.create_instance(&fields).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// Update a copy (status, due date, borrower, imprint, book)
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/update/",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Copy ID (32 hex characters)")
    ),
    request_body(content = BookInstanceForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Copy updated", body = BookInstance),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing catalog.can_change"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn update_instance(
    State(state): State<crate::AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Form(form): Form<BookInstanceForm>,
) -> AppResult<Json<BookInstance>> {
    access::require(user.as_ref(), Permission::CanChange)?;
    let id = Uuid::try_parse(&id)
        .map_err(|_| AppError::NotFound(format!("Book instance {} not found", id)))?;
    let fields = form.clean().map_err(AppError::InvalidForm)?;
    let copy = state.services.loans.update_instance(id, &fields).await?;
    Ok(Json(copy))
}
