//! Form cleaning helpers shared by the submission handlers.
//!
//! Submissions arrive as url-encoded strings. Each form struct keeps the raw
//! values so they can be echoed back, and a `clean` step turns them into typed
//! fields or a map of field-level messages.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use validator::ValidationErrors;

/// Field name -> messages, in stable order
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_DATE: &str = "Enter a valid date.";
pub const INVALID_CHOICE: &str = "Select a valid choice.";

/// Accepted input formats for date fields
const DATE_INPUT_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Collects messages while a form is being cleaned
#[derive(Debug, Default)]
pub struct FormCleaner {
    errors: FieldErrors,
}

impl FormCleaner {
    /// Starts from the outcome of a `validator` pass
    pub fn from_validation(result: Result<(), ValidationErrors>) -> Self {
        let mut cleaner = Self::default();
        if let Err(errors) = result {
            for (field, errs) in errors.field_errors() {
                for err in errs.iter() {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", err.code));
                    cleaner.add(&field.to_string(), &message);
                }
            }
        }
        cleaner
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    /// Trimmed value, or a "required" error when blank
    pub fn required(&mut self, field: &str, raw: &str) -> String {
        let value = raw.trim();
        if value.is_empty() {
            self.add(field, REQUIRED);
        }
        value.to_string()
    }

    /// Blank means no date
    pub fn optional_date(&mut self, field: &str, raw: &str) -> Option<NaiveDate> {
        if raw.trim().is_empty() {
            return None;
        }
        let parsed = parse_date(raw);
        if parsed.is_none() {
            self.add(field, INVALID_DATE);
        }
        parsed
    }

    /// Blank means no reference
    pub fn optional_id(&mut self, field: &str, raw: &str) -> Option<i32> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<i32>() {
            Ok(id) => Some(id),
            Err(_) => {
                self.add(field, INVALID_CHOICE);
                None
            }
        }
    }

    pub fn id_list(&mut self, field: &str, raw: &[String]) -> Vec<i32> {
        let mut ids = Vec::with_capacity(raw.len());
        for value in raw {
            match value.trim().parse::<i32>() {
                Ok(id) if !ids.contains(&id) => ids.push(id),
                Ok(_) => {}
                Err(_) => self.add(field, INVALID_CHOICE),
            }
        }
        ids
    }

    /// Hands back `value` when no message was recorded
    pub fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }
}
