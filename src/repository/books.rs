//! Books repository for database operations

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookFields},
        book_instance::CopyEntry,
        catalog::Genre,
    },
};

/// Columns and source used by the book list
pub const LIST_COLUMNS: &str =
    "b.id, b.title, b.author_id, a.last_name || ', ' || a.first_name AS author_name";
pub const LIST_SOURCE: &str = "FROM books b LEFT JOIN authors a ON a.id = b.author_id";

const BOOK_COLUMNS: &str = "id, title, author_id, summary, isbn, language_id";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Genres of a book, by name
    pub async fn get_genres(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM genres g
            JOIN book_genres bg ON bg.genre_id = g.id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(genres)
    }

    /// Copies of a book
    pub async fn get_copies(&self, book_id: i32) -> AppResult<Vec<CopyEntry>> {
        let copies = sqlx::query_as::<_, CopyEntry>(
            r#"
            SELECT id, imprint, due_back, status
            FROM book_instances
            WHERE book_id = $1
            ORDER BY due_back NULLS LAST, id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(copies)
    }

    /// Create a book and its genre links in one transaction
    pub async fn create(&self, data: &BookFields) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author_id, summary, isbn, language_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&data.title)
        .bind(data.author_id)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(data.language_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::from_write)?;

        Self::link_genres(&mut tx, book.id, &data.genre_ids).await?;

        tx.commit().await?;
        Ok(book)
    }

    /// Replace every field and the genre links of a book in one transaction
    pub async fn update(&self, id: i32, data: &BookFields) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $1, author_id = $2, summary = $3, isbn = $4, language_id = $5
            WHERE id = $6
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&data.title)
        .bind(data.author_id)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(data.language_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::from_write)?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::link_genres(&mut tx, id, &data.genre_ids).await?;

        tx.commit().await?;
        Ok(book)
    }

    async fn link_genres(
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        genre_ids: &[i32],
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO book_genres (book_id, genre_id) SELECT $1, UNNEST($2::int4[])",
        )
        .bind(book_id)
        .bind(genre_ids)
        .execute(&mut **tx)
        .await
        .map_err(AppError::from_write)?;
        Ok(())
    }

    /// Delete book; its copies are kept unattached
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }
}
