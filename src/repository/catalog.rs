//! Genres, languages and catalog-wide counts

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        catalog::{CatalogCounts, Genre, Language},
        LoanStatus,
    },
};

/// ILIKE pattern matching `needle` anywhere, with wildcards in it taken literally
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Clone)]
pub struct CatalogRepository {
    pool: Pool<Postgres>,
}

impl CatalogRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Every catalog count from a single statement
    pub async fn counts(&self, title_filter: &str) -> AppResult<CatalogCounts> {
        let counts = sqlx::query_as::<_, CatalogCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM books) AS num_books,
                (SELECT COUNT(*) FROM book_instances) AS num_instances,
                (SELECT COUNT(*) FROM book_instances WHERE status = $1) AS num_instances_available,
                (SELECT COUNT(*) FROM authors) AS num_authors,
                (SELECT COUNT(*) FROM genres) AS num_genres,
                (SELECT COUNT(*) FROM languages) AS num_languages,
                (SELECT COUNT(*) FROM books WHERE title ILIKE $2) AS num_books_matching
            "#,
        )
        .bind(LoanStatus::Available)
        .bind(contains_pattern(title_filter))
        .fetch_one(&self.pool)
        .await?;
        Ok(counts)
    }

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(genres)
    }

    pub async fn create_genre(&self, name: &str) -> AppResult<Genre> {
        sqlx::query_as::<_, Genre>("INSERT INTO genres (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_write)
    }

    pub async fn list_languages(&self) -> AppResult<Vec<Language>> {
        let languages = sqlx::query_as::<_, Language>("SELECT id, name FROM languages ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(languages)
    }

    pub async fn get_language(&self, id: i32) -> AppResult<Option<Language>> {
        let language = sqlx::query_as::<_, Language>("SELECT id, name FROM languages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(language)
    }

    pub async fn find_language_by_name(&self, name: &str) -> AppResult<Option<Language>> {
        let language = sqlx::query_as::<_, Language>(
            "SELECT id, name FROM languages WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(language)
    }

    pub async fn create_language(&self, name: &str) -> AppResult<Language> {
        sqlx::query_as::<_, Language>("INSERT INTO languages (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_write)
    }
}
