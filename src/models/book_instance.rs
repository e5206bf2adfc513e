//! Book instance (loanable copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::forms::{FieldErrors, FormCleaner, INVALID_CHOICE};

/// Loan status of a copy, stored as a one letter code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LoanStatus {
    #[default]
    #[serde(rename = "m")]
    Maintenance,
    #[serde(rename = "o")]
    OnLoan,
    #[serde(rename = "a")]
    Available,
    #[serde(rename = "r")]
    Reserved,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 4] = [
        LoanStatus::Maintenance,
        LoanStatus::OnLoan,
        LoanStatus::Available,
        LoanStatus::Reserved,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "m",
            LoanStatus::OnLoan => "o",
            LoanStatus::Available => "a",
            LoanStatus::Reserved => "r",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "Maintenance",
            LoanStatus::OnLoan => "On loan",
            LoanStatus::Available => "Available",
            LoanStatus::Reserved => "Reserved",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LoanStatus::ALL
            .into_iter()
            .find(|status| status.code() == s)
            .ok_or_else(|| format!("Invalid loan status: {}", s))
    }
}

// SQLx conversion for LoanStatus
impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: &str = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for LoanStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode_by_ref(&self.code(), buf)
    }
}

/// Full book instance model from database
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BookInstance {
    /// 32 character hex identifier
    #[serde(with = "uuid::serde::simple")]
    pub id: Uuid,
    pub book_id: Option<i32>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub status: LoanStatus,
}

impl BookInstance {
    /// Canonical text form of the identifier
    pub fn key(&self) -> String {
        self.id.simple().to_string()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_back.map(|due| due < today).unwrap_or(false)
    }
}

/// Copy listed on a book detail page
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CopyEntry {
    #[serde(with = "uuid::serde::simple")]
    pub id: Uuid,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
}

/// Copy on loan, as listed in the borrowed-books views
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BorrowedCopy {
    #[serde(with = "uuid::serde::simple")]
    pub id: Uuid,
    pub book_id: Option<i32>,
    pub book_title: Option<String>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    pub borrower_id: Option<i32>,
    pub borrower_username: Option<String>,
    pub is_overdue: bool,
}

/// Copy create/update submission
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BookInstanceForm {
    #[serde(default)]
    pub book: String,
    #[serde(default)]
    #[validate(length(max = 200, message = "Ensure this value has at most 200 characters."))]
    pub imprint: String,
    #[serde(default)]
    pub due_back: String,
    #[serde(default)]
    pub borrower: String,
    /// Status code (m, o, a, r); defaults to maintenance
    #[serde(default)]
    pub status: String,
}

/// Cleaned copy values ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct BookInstanceFields {
    pub book_id: Option<i32>,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub status: LoanStatus,
}

impl BookInstanceForm {
    pub fn clean(&self) -> Result<BookInstanceFields, FieldErrors> {
        let mut cleaner = FormCleaner::from_validation(self.validate());
        let status = match self.status.trim() {
            "" => LoanStatus::default(),
            code => code.parse::<LoanStatus>().unwrap_or_else(|_| {
                cleaner.add("status", INVALID_CHOICE);
                LoanStatus::default()
            }),
        };
        let fields = BookInstanceFields {
            book_id: cleaner.optional_id("book", &self.book),
            imprint: cleaner.required("imprint", &self.imprint),
            due_back: cleaner.optional_date("due_back", &self.due_back),
            borrower_id: cleaner.optional_id("borrower", &self.borrower),
            status,
        };
        if fields.borrower_id.is_some() && fields.status != LoanStatus::OnLoan {
            cleaner.add("borrower", "A borrower can only be set while the copy is on loan.");
        }
        cleaner.finish(fields)
    }
}

pub fn renew_url(id: &Uuid) -> String {
    format!("/catalog/book/{}/renew/", id.simple())
}

/// Renewal submission
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RenewalForm {
    #[serde(default)]
    pub renewal_date: String,
}

/// Renewal form, as first displayed or re-displayed after a rejected submission
#[derive(Debug, Serialize, ToSchema)]
pub struct RenewalFormDocument {
    pub action: String,
    pub copy: BookInstance,
    /// Proposed date (three weeks from today)
    pub initial: NaiveDate,
    /// Submitted value, echoed back unchanged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewal_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub errors: Option<FieldErrors>,
}
