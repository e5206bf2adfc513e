//! Login and account management endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    access,
    error::{AppError, AppResult, LOGIN_URL},
    models::user::{CreateUser, LoginFormDocument, LoginRequest, LoginResponse, UserInfo},
};

use super::CurrentUser;

#[derive(Debug, Deserialize, IntoParams)]
pub struct LoginQuery {
    /// Page to return to after logging in
    pub next: Option<String>,
}

/// Describe the login form
#[utoipa::path(
    get,
    path = "/accounts/login/",
    tag = "accounts",
    params(LoginQuery),
    responses(
        (status = 200, description = "Login form", body = LoginFormDocument)
    )
)]
pub async fn login_form(Query(query): Query<LoginQuery>) -> Json<LoginFormDocument> {
    Json(LoginFormDocument {
        action: LOGIN_URL.to_string(),
        next: query.next,
        fields: vec!["username".to_string(), "password".to_string()],
    })
}

/// Login with username and password
#[utoipa::path(
    post,
    path = "/accounts/login/",
    tag = "accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing credentials", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = state
        .services
        .users
        .authenticate(&request.username, &request.password)
        .await?;
    Ok(Json(response))
}

/// Create a user account (superuser only)
#[utoipa::path(
    post,
    path = "/accounts/users/",
    tag = "accounts",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserInfo),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Superuser privileges required")
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<UserInfo>)> {
    access::require_superuser(user.as_ref())?;
    let created = state.services.users.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(UserInfo::from(&created))))
}
