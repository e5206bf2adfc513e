//! Book instances (copies) repository for database operations

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book_instance::{BookInstance, BookInstanceFields},
};

/// Columns and source used by the borrowed-copies lists
pub const BORROWED_COLUMNS: &str = r#"
    bi.id, bi.book_id, b.title AS book_title, bi.imprint, bi.due_back, bi.status,
    bi.borrower_id, u.username AS borrower_username,
    (bi.due_back IS NOT NULL AND bi.due_back < CURRENT_DATE) AS is_overdue"#;
pub const BORROWED_SOURCE: &str = r#"FROM book_instances bi
    LEFT JOIN books b ON b.id = bi.book_id
    LEFT JOIN users u ON u.id = bi.borrower_id"#;

const INSTANCE_COLUMNS: &str = "id, book_id, imprint, due_back, borrower_id, status";

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get copy by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(&format!(
            "SELECT {} FROM book_instances WHERE id = $1",
            INSTANCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id.simple())))
    }

    /// Set the due date of a copy, leaving its status untouched
    pub async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<()> {
        let result = sqlx::query("UPDATE book_instances SET due_back = $1 WHERE id = $2")
            .bind(due_back)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id.simple())));
        }
        Ok(())
    }

    /// Register a newly acquired copy
    pub async fn create(&self, data: &BookInstanceFields) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(&format!(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, due_back, borrower_id, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            INSTANCE_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(data.book_id)
        .bind(&data.imprint)
        .bind(data.due_back)
        .bind(data.borrower_id)
        .bind(data.status)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_write)
    }

    /// Update every field of a copy
    pub async fn update(&self, id: Uuid, data: &BookInstanceFields) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(&format!(
            r#"
            UPDATE book_instances
            SET book_id = $1, imprint = $2, due_back = $3, borrower_id = $4, status = $5
            WHERE id = $6
            RETURNING {}
            "#,
            INSTANCE_COLUMNS
        ))
        .bind(data.book_id)
        .bind(&data.imprint)
        .bind(data.due_back)
        .bind(data.borrower_id)
        .bind(data.status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from_write)?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id.simple())))
    }
}
