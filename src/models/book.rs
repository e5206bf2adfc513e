//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::forms::{FieldErrors, FormCleaner, REQUIRED};

use super::{
    author::AuthorRef,
    book_instance::CopyEntry,
    catalog::{Genre, Language},
};

pub const TITLE_MAX_LENGTH: usize = 200;
pub const SUMMARY_MAX_LENGTH: usize = 1000;
pub const ISBN_MAX_LENGTH: usize = 13;

/// Number of genres listed by [`display_genre`]
const DISPLAY_GENRE_COUNT: usize = 3;

/// Full book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    pub summary: String,
    /// 13 character ISBN
    pub isbn: String,
    pub language_id: Option<i32>,
}

impl Book {
    pub fn url(&self) -> String {
        book_url(self.id)
    }
}

pub fn book_url(id: i32) -> String {
    format!("/catalog/book/{}", id)
}

/// Comma-joined names of the first genres, for display
pub fn display_genre(genres: &[Genre]) -> String {
    genres
        .iter()
        .take(DISPLAY_GENRE_COUNT)
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Book row in the paginated list
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    /// "last_name, first_name" of the author, if any
    pub author_name: Option<String>,
}

/// Book reference embedded in other documents
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BookRef {
    pub id: i32,
    pub title: String,
    pub summary: String,
}

/// Book detail page
#[derive(Debug, Serialize, ToSchema)]
pub struct BookDetail {
    pub book: Book,
    pub url: String,
    pub author: Option<AuthorRef>,
    pub language: Option<Language>,
    pub genres: Vec<Genre>,
    pub display_genre: String,
    pub copies: Vec<CopyEntry>,
}

/// Book create/update submission
///
/// `genre` may be repeated to select several genres.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BookForm {
    #[serde(default)]
    #[validate(length(max = 200, message = "Ensure this value has at most 200 characters."))]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Ensure this value has at most 1000 characters."))]
    pub summary: String,
    #[serde(default)]
    #[validate(length(max = 13, message = "Ensure this value has at most 13 characters."))]
    pub isbn: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub genre: Vec<String>,
}

/// Cleaned book values ready to be written
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct BookFields {
    pub title: String,
    pub author_id: Option<i32>,
    pub summary: String,
    pub isbn: String,
    pub language_id: Option<i32>,
    pub genre_ids: Vec<i32>,
}

impl BookForm {
    pub fn clean(&self) -> Result<BookFields, FieldErrors> {
        let mut cleaner = FormCleaner::from_validation(self.validate());
        let fields = BookFields {
            title: cleaner.required("title", &self.title),
            author_id: cleaner.optional_id("author", &self.author),
            summary: cleaner.required("summary", &self.summary),
            isbn: cleaner.required("isbn", &self.isbn),
            language_id: cleaner.optional_id("language", &self.language),
            genre_ids: cleaner.id_list("genre", &self.genre),
        };
        if self.genre.iter().all(|g| g.trim().is_empty()) {
            cleaner.add("genre", REQUIRED);
        }
        cleaner.finish(fields)
    }
}

/// Form document returned by the create/update GET routes
#[derive(Debug, Serialize, ToSchema)]
pub struct BookFormDocument {
    /// Where the form posts to
    pub action: String,
    pub initial: BookFields,
}
