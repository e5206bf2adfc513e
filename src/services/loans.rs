//! Borrowed copies and the renewal workflow

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::{
    error::AppResult,
    forms::{parse_date, FieldErrors, INVALID_DATE, REQUIRED},
    models::{
        book_instance::{renew_url, BookInstance, BookInstanceFields, BorrowedCopy, RenewalFormDocument},
        page::Page,
        LoanStatus,
    },
    repository::{
        book_instances::{BORROWED_COLUMNS, BORROWED_SOURCE},
        listing::{FilterValue, Listing},
        Repository,
    },
};

pub const LOANS_PER_PAGE: i64 = 10;

/// Proposed renewal, in weeks from today
const RENEWAL_DEFAULT_WEEKS: i64 = 3;
/// Furthest allowed renewal, in weeks from today
const RENEWAL_MAX_WEEKS: i64 = 4;

pub const RENEWAL_IN_PAST: &str = "Invalid date - renewal in past.";
pub const RENEWAL_TOO_FAR: &str = "Invalid date - renewal more than 4 weeks ahead.";

pub fn default_renewal_date(today: NaiveDate) -> NaiveDate {
    today + Duration::weeks(RENEWAL_DEFAULT_WEEKS)
}

/// Accepts dates from today up to four weeks ahead, both included
pub fn clean_renewal_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    if raw.trim().is_empty() {
        return Err(REQUIRED.to_string());
    }
    let date = parse_date(raw).ok_or_else(|| INVALID_DATE.to_string())?;
    if date < today {
        return Err(RENEWAL_IN_PAST.to_string());
    }
    if date > today + Duration::weeks(RENEWAL_MAX_WEEKS) {
        return Err(RENEWAL_TOO_FAR.to_string());
    }
    Ok(date)
}

/// Copies on loan, soonest due first
fn borrowed_listing() -> Listing {
    Listing::new(
        BORROWED_COLUMNS,
        BORROWED_SOURCE,
        "bi.due_back ASC NULLS LAST, bi.id",
        LOANS_PER_PAGE,
    )
    .filter("bi.status", FilterValue::Status(LoanStatus::OnLoan))
}

fn borrower_listing(user_id: i32) -> Listing {
    borrowed_listing().filter("bi.borrower_id", FilterValue::Int(user_id))
}

/// Result of a renewal submission
#[derive(Debug)]
pub enum RenewalOutcome {
    Renewed(NaiveDate),
    /// Form to display again, nothing was written
    Rejected(RenewalFormDocument),
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Copies on loan to a user
    pub async fn my_loans(&self, user_id: i32, page: i64) -> AppResult<Page<BorrowedCopy>> {
        self.repository.fetch_page(&borrower_listing(user_id), page).await
    }

    /// Every copy on loan, with its borrower
    pub async fn all_borrowed(&self, page: i64) -> AppResult<Page<BorrowedCopy>> {
        self.repository.fetch_page(&borrowed_listing(), page).await
    }

    pub async fn renewal_form(&self, id: Uuid, today: NaiveDate) -> AppResult<RenewalFormDocument> {
        let copy = self.repository.book_instances.get_by_id(id).await?;
        Ok(Self::renewal_document(copy, today, None, None))
    }

    /// Sets the due date of a copy when `raw` is an acceptable renewal date
    pub async fn renew(&self, id: Uuid, raw: &str, today: NaiveDate) -> AppResult<RenewalOutcome> {
        let copy = self.repository.book_instances.get_by_id(id).await?;

        match clean_renewal_date(raw, today) {
            Ok(date) => {
                self.repository.book_instances.set_due_back(id, date).await?;
                tracing::info!("Renewed copy {} until {}", copy.key(), date);
                Ok(RenewalOutcome::Renewed(date))
            }
            Err(message) => {
                tracing::debug!("Rejected renewal of {}: {}", copy.key(), message);
                let mut errors = FieldErrors::new();
                errors.insert("renewal_date".to_string(), vec![message]);
                Ok(RenewalOutcome::Rejected(Self::renewal_document(
                    copy,
                    today,
                    Some(raw.to_string()),
                    Some(errors),
                )))
            }
        }
    }

    fn renewal_document(
        copy: BookInstance,
        today: NaiveDate,
        renewal_date: Option<String>,
        errors: Option<FieldErrors>,
    ) -> RenewalFormDocument {
        RenewalFormDocument {
            action: renew_url(&copy.id),
            copy,
            initial: default_renewal_date(today),
            renewal_date,
            errors,
        }
    }

    /// Register a new copy
    pub async fn create_instance(&self, fields: &BookInstanceFields) -> AppResult<BookInstance> {
        let copy = self.repository.book_instances.create(fields).await?;
        tracing::info!("Created copy {} ({})", copy.key(), copy.status.label());
        Ok(copy)
    }

    pub async fn update_instance(&self, id: Uuid, fields: &BookInstanceFields) -> AppResult<BookInstance> {
        let copy = self.repository.book_instances.update(id, fields).await?;
        tracing::info!("Updated copy {} ({})", copy.key(), copy.status.label());
        Ok(copy)
    }
}
