//! Data models for the Local Library

pub mod author;
pub mod book;
pub mod book_instance;
pub mod catalog;
pub mod page;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorDetail, AuthorListEntry};
pub use book::{Book, BookDetail, BookSummary};
pub use book_instance::{BookInstance, BorrowedCopy, LoanStatus};
pub use catalog::{CatalogCounts, Genre, Language};
pub use page::{Page, PageQuery};
pub use user::{User, UserClaims};
