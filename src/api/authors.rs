//! Author endpoints

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
        author::{AuthorDetail, AuthorForm, AuthorFormDocument, AuthorListEntry},
        page::{AuthorPage, Page, PageQuery},
    },
};

use super::CurrentUser;

#[utoipa::path(
    get,
    path = "/catalog/authors/",
    tag = "authors",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of authors", body = AuthorPage),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<AuthorListEntry>>> {
    let page = state.services.catalog.list_authors(query.number()).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/catalog/author/{id}",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author with their books", body = AuthorDetail),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetail>> {
    let author = state.services.catalog.get_author(id).await?;
    Ok(Json(author))
}

#[utoipa::path(
    get,
    path = "/catalog/author/create/",
    tag = "authors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Form document", body = AuthorFormDocument),
        (status = 403, description = "Missing catalog.can_change")
    )
)]
pub async fn create_form(
    State(state): State<crate::AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<AuthorFormDocument>> {
    access::require(user.as_ref(), Permission::CanChange)?;
    Ok(Json(state.services.catalog.author_create_form()))
}

#[utoipa::path(
    post,
    path = "/catalog/author/create/",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body(content = AuthorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to the new author"),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing catalog.can_change")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<AuthorForm>,
) -> AppResult<Redirect> {
    access::require(user.as_ref(), Permission::CanChange)?;
    let fields = form.clean().map_err(AppError::InvalidForm)?;
    let author = state.services.catalog.create_author(&fields).await?;
    Ok(Redirect::to(&author.url()))
}

#[utoipa::path(
    get,
    path = "/catalog/author/{id}/update/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Form document", body = AuthorFormDocument),
        (status = 403, description = "Missing catalog.can_change"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_form(
    State(state): State<crate::AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorFormDocument>> {
    access::require(user.as_ref(), Permission::CanChange)?;
    let form = state.services.catalog.author_update_form(id).await?;
    Ok(Json(form))
}

#[utoipa::path(
    post,
    path = "/catalog/author/{id}/update/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    request_body(content = AuthorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to the author"),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing catalog.can_change"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Redirect> {
    access::require(user.as_ref(), Permission::CanChange)?;
    let fields = form.clean().map_err(AppError::InvalidForm)?;
    let author = state.services.catalog.update_author(id, &fields).await?;
    Ok(Redirect::to(&author.url()))
}

/// Delete an author; their books are kept without author
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/delete/",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 303, description = "Redirect to the author list"),
        (status = 403, description = "Missing catalog.can_change"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<Redirect> {
    access::require(user.as_ref(), Permission::CanChange)?;
    state.services.catalog.delete_author(id).await?;
    Ok(Redirect::to("/catalog/authors/"))
}
