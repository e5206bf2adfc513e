//! Site root and catalog home page

use axum::{
    extract::{Query, State},
    response::Redirect,
    Json,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    error::AppResult,
    models::catalog::{HomePage, HomeQuery},
};

use super::Session;

/// Redirect the site root to the catalog
#[utoipa::path(
    get,
    path = "/",
    tag = "catalog",
    responses(
        (status = 303, description = "Redirect to /catalog/")
    )
)]
pub async fn root_redirect() -> Redirect {
    Redirect::to("/catalog/")
}

/// Catalog counts and the session visit counter
#[utoipa::path(
    get,
    path = "/catalog/",
    tag = "catalog",
    params(HomeQuery),
    responses(
        (status = 200, description = "Catalog counts", body = HomePage)
    )
)]
pub async fn index(
    State(state): State<crate::AppState>,
    session: Session,
    Query(query): Query<HomeQuery>,
) -> AppResult<(CookieJar, Json<HomePage>)> {
    let num_visits = state.services.sessions.count_visit(&session.id).await?;
    let home = state.services.catalog.home(query.title, num_visits).await?;
    Ok((session.jar(), Json(home)))
}
