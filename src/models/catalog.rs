//! Genres, languages and the home page aggregate

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::forms::{FieldErrors, FormCleaner};

pub const GENRE_NAME_MAX_LENGTH: usize = 200;

/// Book genre (e.g. Science Fiction, French Poetry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

/// Language a book is written in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Language {
    pub id: i32,
    pub name: String,
}

/// Genre or language creation submission
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct NameForm {
    #[serde(default)]
    #[validate(length(max = 200, message = "Ensure this value has at most 200 characters."))]
    pub name: String,
}

impl NameForm {
    pub fn clean(&self) -> Result<String, FieldErrors> {
        let mut cleaner = FormCleaner::from_validation(self.validate());
        let name = cleaner.required("name", &self.name);
        cleaner.finish(name)
    }
}

/// Catalog cardinalities, read in one statement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct CatalogCounts {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_genres: i64,
    pub num_languages: i64,
    /// Books whose title contains `title_filter`
    pub num_books_matching: i64,
}

/// Home page query
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct HomeQuery {
    /// Substring counted in book titles (case-insensitive)
    pub title: Option<String>,
}

/// Home page document
#[derive(Debug, Serialize, ToSchema)]
pub struct HomePage {
    pub counts: CatalogCounts,
    pub title_filter: String,
    /// Home page visits from this session before the current one
    pub num_visits: i64,
}
