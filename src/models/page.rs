//! Paginated list wrapper

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{author::AuthorListEntry, book::BookSummary, book_instance::BorrowedCopy};

/// One page of a list, numbered from 1
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    BookPage = Page<BookSummary>,
    AuthorPage = Page<AuthorListEntry>,
    BorrowedCopyPage = Page<BorrowedCopy>
)]
pub struct Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub items: Vec<T>,
    /// Number of rows across all pages
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub num_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, total: i64, page: i64, per_page: i64) -> Self {
        let num_pages = num_pages(total, per_page);
        Self {
            items,
            total,
            page,
            per_page,
            num_pages,
            has_next: page < num_pages,
            has_previous: page > 1,
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        U: for<'a> ToSchema<'a>,
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            num_pages: self.num_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}

/// `?page=N` query parameter
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PageQuery {
    /// Page number (default: 1)
    pub page: Option<i64>,
}

impl PageQuery {
    pub fn number(&self) -> i64 {
        self.page.unwrap_or(1)
    }
}

/// An empty list still has one (empty) first page.
pub fn num_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 || per_page <= 0 {
        return 1;
    }
    (total + per_page - 1) / per_page
}

/// Row offset of `page`, or `None` when the page does not exist
pub fn page_offset(total: i64, page: i64, per_page: i64) -> Option<i64> {
    if page < 1 || page > num_pages(total, per_page) {
        return None;
    }
    Some((page - 1) * per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_pages() {
        assert_eq!(num_pages(0, 3), 1);
        assert_eq!(num_pages(3, 3), 1);
        assert_eq!(num_pages(4, 3), 2);
        assert_eq!(num_pages(10, 10), 1);
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(0, 1, 3), Some(0));
        assert_eq!(page_offset(7, 3, 3), Some(6));
        assert_eq!(page_offset(7, 4, 3), None);
        assert_eq!(page_offset(7, 0, 3), None);
    }
}
