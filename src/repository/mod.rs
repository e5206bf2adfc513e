//! Repository layer for database operations

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod listing;
pub mod users;

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::page::Page,
};

use self::listing::Listing;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub authors: authors::AuthorsRepository,
    pub books: books::BooksRepository,
    pub book_instances: book_instances::BookInstancesRepository,
    pub catalog: catalog::CatalogRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: authors::AuthorsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            book_instances: book_instances::BookInstancesRepository::new(pool.clone()),
            catalog: catalog::CatalogRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }

    /// Run a paginated listing against the pool
    pub async fn fetch_page<T>(&self, listing: &Listing, page: i64) -> AppResult<Page<T>>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>
            + Send
            + Unpin
            + for<'a> utoipa::ToSchema<'a>,
    {
        listing::fetch_page(&self.pool, listing, page).await
    }

    /// Round-trip to the database, used by the readiness probe
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
