//! Generic paginated listing.
//!
//! A [`Listing`] describes a list page as plain values (columns, source,
//! filters, ordering and page size) and [`fetch_page`] runs it for any row type.

use sqlx::{postgres::PgRow, FromRow, Pool, Postgres, QueryBuilder};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        page::{page_offset, Page},
        LoanStatus,
    },
};

/// Value compared for equality in a listing filter
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Int(i32),
    Status(LoanStatus),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub value: FilterValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    /// Select list, e.g. `b.id, b.title`
    pub columns: &'static str,
    /// `FROM` clause with its joins
    pub source: &'static str,
    pub filters: Vec<Filter>,
    pub order_by: &'static str,
    pub page_size: i64,
}

impl Listing {
    pub fn new(
        columns: &'static str,
        source: &'static str,
        order_by: &'static str,
        page_size: i64,
    ) -> Self {
        Self {
            columns,
            source,
            filters: Vec::new(),
            order_by,
            page_size,
        }
    }

    pub fn filter(mut self, column: &'static str, value: FilterValue) -> Self {
        self.filters.push(Filter { column, value });
        self
    }

    fn push_where(&self, builder: &mut QueryBuilder<'static, Postgres>) {
        for (i, filter) in self.filters.iter().enumerate() {
            builder.push(if i == 0 { " WHERE " } else { " AND " });
            builder.push(filter.column).push(" = ");
            match &filter.value {
                FilterValue::Int(v) => builder.push_bind(*v),
                FilterValue::Status(s) => builder.push_bind(*s),
            };
        }
    }

    /// `SELECT COUNT(*)` over the filtered source
    fn count_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) ");
        builder.push(self.source);
        self.push_where(&mut builder);
        builder
    }

    /// One page of rows starting at `offset`
    fn select_query(&self, offset: i64) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT ");
        builder.push(self.columns).push(" ").push(self.source);
        self.push_where(&mut builder);
        builder
            .push(" ORDER BY ")
            .push(self.order_by)
            .push(" LIMIT ")
            .push_bind(self.page_size)
            .push(" OFFSET ")
            .push_bind(offset);
        builder
    }
}

/// Fetch page `page` (1-based) of `listing`.
///
/// A page past the end, or below 1, is Not-Found; the first page of an empty
/// list is returned empty.
pub async fn fetch_page<T>(pool: &Pool<Postgres>, listing: &Listing, page: i64) -> AppResult<Page<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin + for<'a> ToSchema<'a>,
{
    let mut count = listing.count_query();
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let offset = page_offset(total, page, listing.page_size)
        .ok_or_else(|| AppError::NotFound(format!("Invalid page ({})", page)))?;

    let mut select = listing.select_query(offset);
    let items = select.build_query_as::<T>().fetch_all(pool).await?;

    Ok(Page::new(items, total, page, listing.page_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries_without_filters() {
        let listing = Listing::new("a.*", "FROM authors a", "a.last_name", 3);
        assert_eq!(listing.count_query().into_sql(), "SELECT COUNT(*) FROM authors a");
        assert_eq!(
            listing.select_query(6).into_sql(),
            "SELECT a.* FROM authors a ORDER BY a.last_name LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn test_filters_bind_in_order() {
        let listing = Listing::new("bi.*", "FROM book_instances bi", "bi.due_back", 10)
            .filter("bi.borrower_id", FilterValue::Int(4))
            .filter("bi.status", FilterValue::Status(LoanStatus::OnLoan));
        assert_eq!(
            listing.count_query().into_sql(),
            "SELECT COUNT(*) FROM book_instances bi WHERE bi.borrower_id = $1 AND bi.status = $2"
        );
        assert!(listing
            .select_query(0)
            .into_sql()
            .ends_with("AND bi.status = $2 ORDER BY bi.due_back LIMIT $3 OFFSET $4"));
    }
}
