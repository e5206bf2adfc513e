//! Access control: permission checks run at the top of each gated handler.

use crate::{
    error::{AppError, AppResult},
    models::user::UserClaims,
};

/// Named grants controlling librarian and editor operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Librarian: see every loan, renew copies
    CanMarkReturned,
    /// Editor: create, update and delete catalog entries
    CanChange,
}

impl Permission {
    pub fn codename(&self) -> &'static str {
        match self {
            Permission::CanMarkReturned => "catalog.can_mark_returned",
            Permission::CanChange => "catalog.can_change",
        }
    }
}

/// Outcome of an authorization check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(String),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// Decides whether `user` (anonymous when `None`) holds `permission`.
pub fn authorize(user: Option<&UserClaims>, permission: Permission) -> AccessDecision {
    match user {
        None => AccessDecision::Deny(format!(
            "Authentication required for {}",
            permission.codename()
        )),
        Some(claims) if claims.has_permission(permission.codename()) => AccessDecision::Allow,
        Some(claims) => AccessDecision::Deny(format!(
            "User {} lacks permission {}",
            claims.sub,
            permission.codename()
        )),
    }
}

/// Runs [`authorize`] and turns a denial into a Forbidden error.
pub fn require(user: Option<&UserClaims>, permission: Permission) -> AppResult<()> {
    match authorize(user, permission) {
        AccessDecision::Allow => Ok(()),
        AccessDecision::Deny(reason) => {
            tracing::warn!("Access denied: {}", reason);
            Err(AppError::Authorization(reason))
        }
    }
}

/// Account management is reserved to superusers.
pub fn require_superuser(user: Option<&UserClaims>) -> AppResult<&UserClaims> {
    match user {
        Some(claims) if claims.is_superuser => Ok(claims),
        _ => Err(AppError::Authorization(
            "Superuser privileges required".to_string(),
        )),
    }
}
