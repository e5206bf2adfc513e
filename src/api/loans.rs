//! Borrowed books and renewal endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::Form;
use chrono::{Local, NaiveDate};
use uuid::Uuid;

use crate::{
    access::{self, Permission},
    error::{AppError, AppResult},
    models::{
        book_instance::{RenewalForm, RenewalFormDocument},
        page::{BorrowedCopyPage, Page, PageQuery},
        BorrowedCopy,
    },
    services::loans::RenewalOutcome,
};

use super::{CurrentUser, LoggedInUser};

/// Where a successful renewal leads
const AFTER_RENEWAL: &str = "/catalog/all-borrowed-books/";

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Copy id from the path; anything unparseable names no copy
fn parse_copy_id(raw: &str) -> AppResult<Uuid> {
    Uuid::try_parse(raw).map_err(|_| AppError::NotFound(format!("Book instance {} not found", raw)))
}

/// Copies on loan to the caller, soonest due first
#[utoipa::path(
    get,
    path = "/catalog/mybooks/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Caller's borrowed copies", body = BorrowedCopyPage),
        (status = 302, description = "Redirect to the login page"),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn my_borrowed(
    State(state): State<crate::AppState>,
    LoggedInUser(claims): LoggedInUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<BorrowedCopy>>> {
    let page = state.services.loans.my_loans(claims.user_id, query.number()).await?;
    Ok(Json(page))
}

/// Every copy on loan with its borrower
#[utoipa::path(
    get,
    path = "/catalog/all-borrowed-books/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Borrowed copies", body = BorrowedCopyPage),
        (status = 403, description = "Missing catalog.can_mark_returned"),
        (status = 404, description = "Invalid page")
    )
)]
pub async fn all_borrowed(
    State(state): State<crate::AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<BorrowedCopy>>> {
    access::require(user.as_ref(), Permission::CanMarkReturned)?;
    let page = state.services.loans.all_borrowed(query.number()).await?;
    Ok(Json(page))
}

/// Renewal form proposing a date three weeks ahead
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/renew/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Copy ID (32 hex characters)")
    ),
    responses(
        (status = 200, description = "Renewal form", body = RenewalFormDocument),
        (status = 403, description = "Missing catalog.can_mark_returned"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renew_form(
    State(state): State<crate::AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<RenewalFormDocument>> {
    access::require(user.as_ref(), Permission::CanMarkReturned)?;
    let id = parse_copy_id(&id)?;
    let form = state.services.loans.renewal_form(id, today()).await?;
    Ok(Json(form))
}

/// Set a new due date on a borrowed copy
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/renew/",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Copy ID (32 hex characters)")
    ),
    request_body(content = RenewalForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Renewed, redirect to all borrowed books"),
        (status = 400, description = "Rejected date, form with messages", body = RenewalFormDocument),
        (status = 403, description = "Missing catalog.can_mark_returned"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renew_book(
    State(state): State<crate::AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Form(form): Form<RenewalForm>,
) -> AppResult<Response> {
    access::require(user.as_ref(), Permission::CanMarkReturned)?;
    let id = parse_copy_id(&id)?;

    match state.services.loans.renew(id, &form.renewal_date, today()).await? {
        RenewalOutcome::Renewed(_) => Ok(Redirect::to(AFTER_RENEWAL).into_response()),
        RenewalOutcome::Rejected(document) => {
            Ok((StatusCode::BAD_REQUEST, Json(document)).into_response())
        }
    }
}
