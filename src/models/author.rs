//! Author model and related types

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::forms::{FieldErrors, FormCleaner};

use super::book::BookRef;

pub const NAME_MAX_LENGTH: usize = 100;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    /// Shown as "died"
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    pub fn url(&self) -> String {
        author_url(self.id)
    }
}

pub fn author_url(id: i32) -> String {
    format!("/catalog/author/{}", id)
}

/// "last_name, first_name"
impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.last_name, self.first_name)
    }
}

/// Author as shown in the paginated list
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorListEntry {
    pub id: i32,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
    pub url: String,
}

impl From<Author> for AuthorListEntry {
    fn from(author: Author) -> Self {
        AuthorListEntry {
            id: author.id,
            name: author.to_string(),
            date_of_birth: author.date_of_birth,
            date_of_death: author.date_of_death,
            url: author.url(),
        }
    }
}

/// Author reference embedded in book documents
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorRef {
    pub id: i32,
    pub name: String,
    pub url: String,
}

impl From<&Author> for AuthorRef {
    fn from(author: &Author) -> Self {
        AuthorRef {
            id: author.id,
            name: author.to_string(),
            url: author.url(),
        }
    }
}

/// Author detail page with their books
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorDetail {
    pub author: Author,
    pub name: String,
    pub books: Vec<BookRef>,
}

/// Author create/update submission
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct AuthorForm {
    #[serde(default)]
    #[validate(length(max = 100, message = "Ensure this value has at most 100 characters."))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "Ensure this value has at most 100 characters."))]
    pub last_name: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub date_of_death: String,
}

/// Cleaned author values ready to be written
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AuthorFields {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl AuthorForm {
    pub fn clean(&self) -> Result<AuthorFields, FieldErrors> {
        let mut cleaner = FormCleaner::from_validation(self.validate());
        let fields = AuthorFields {
            first_name: cleaner.required("first_name", &self.first_name),
            last_name: cleaner.required("last_name", &self.last_name),
            date_of_birth: cleaner.optional_date("date_of_birth", &self.date_of_birth),
            date_of_death: cleaner.optional_date("date_of_death", &self.date_of_death),
        };
        cleaner.finish(fields)
    }
}

impl From<&Author> for AuthorFields {
    fn from(author: &Author) -> Self {
        AuthorFields {
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            date_of_birth: author.date_of_birth,
            date_of_death: author.date_of_death,
        }
    }
}

/// Form document returned by the create/update GET routes
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorFormDocument {
    /// Where the form posts to
    pub action: String,
    pub initial: AuthorFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big_bob() -> Author {
        Author {
            id: 1,
            first_name: "Big".to_string(),
            last_name: "Bob".to_string(),
            date_of_birth: None,
            date_of_death: None,
        }
    }

    #[test]
    fn test_display_is_last_name_comma_first_name() {
        assert_eq!(big_bob().to_string(), "Bob, Big");
        assert_eq!(AuthorListEntry::from(big_bob()).name, "Bob, Big");
    }

    #[test]
    fn test_url() {
        assert_eq!(big_bob().url(), "/catalog/author/1");
    }

    #[test]
    fn test_clean_accepts_valid_form() {
        let form = AuthorForm {
            first_name: "Ursula".into(),
            last_name: "Le Guin".into(),
            date_of_birth: "1929-10-21".into(),
            date_of_death: "".into(),
        };
        let fields = form.clean().unwrap();
        assert_eq!(fields.last_name, "Le Guin");
        assert_eq!(fields.date_of_birth, NaiveDate::from_ymd_opt(1929, 10, 21));
        assert_eq!(fields.date_of_death, None);
    }

    #[test]
    fn test_clean_enforces_name_length() {
        let form = AuthorForm {
            first_name: "a".repeat(NAME_MAX_LENGTH),
            last_name: "b".repeat(NAME_MAX_LENGTH + 1),
            ..Default::default()
        };
        let errors = form.clean().unwrap_err();
        assert!(!errors.contains_key("first_name"));
        assert!(errors.contains_key("last_name"));
    }

    #[test]
    fn test_clean_requires_names_and_valid_dates() {
        let form = AuthorForm {
            date_of_death: "someday".into(),
            ..Default::default()
        };
        let errors = form.clean().unwrap_err();
        assert!(errors.contains_key("first_name"));
        assert!(errors.contains_key("last_name"));
        assert!(errors.contains_key("date_of_death"));
    }
}
