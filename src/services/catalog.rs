//! Catalog browsing and editing service

use chrono::NaiveDate;

use crate::{
    config::CatalogConfig,
    error::AppResult,
    models::{
        author::{author_url, Author, AuthorDetail, AuthorFields, AuthorFormDocument, AuthorListEntry, AuthorRef},
        book::{book_url, display_genre, Book, BookDetail, BookFields, BookFormDocument, BookSummary},
        catalog::{Genre, HomePage, Language},
        page::Page,
    },
    repository::{authors, books, listing::Listing, Repository},
};

pub const BOOKS_PER_PAGE: i64 = 3;
pub const AUTHORS_PER_PAGE: i64 = 3;

/// Date offered on a blank author form
pub fn initial_date_of_death() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2016, 12, 10)
}

pub fn book_listing() -> Listing {
    Listing::new(books::LIST_COLUMNS, books::LIST_SOURCE, "b.title, b.id", BOOKS_PER_PAGE)
}

pub fn author_listing() -> Listing {
    Listing::new(
        authors::LIST_COLUMNS,
        authors::LIST_SOURCE,
        "a.last_name, a.first_name, a.id",
        AUTHORS_PER_PAGE,
    )
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    config: CatalogConfig,
}

impl CatalogService {
    pub fn new(repository: Repository, config: CatalogConfig) -> Self {
        Self { repository, config }
    }

    /// Home page counts; `title` overrides the configured title filter
    pub async fn home(&self, title: Option<String>, num_visits: i64) -> AppResult<HomePage> {
        let title_filter = title.unwrap_or_else(|| self.config.home_title_filter.clone());
        let counts = self.repository.catalog.counts(&title_filter).await?;
        Ok(HomePage {
            counts,
            title_filter,
            num_visits,
        })
    }

    // ---- Books ----

    pub async fn list_books(&self, page: i64) -> AppResult<Page<BookSummary>> {
        self.repository.fetch_page(&book_listing(), page).await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<BookDetail> {
        let book = self.repository.books.get_by_id(id).await?;

        let author = match book.author_id {
            Some(author_id) => Some(AuthorRef::from(&self.repository.authors.get_by_id(author_id).await?)),
            None => None,
        };
        let language = match book.language_id {
            Some(language_id) => self.repository.catalog.get_language(language_id).await?,
            None => None,
        };
        let genres = self.repository.books.get_genres(id).await?;
        let copies = self.repository.books.get_copies(id).await?;

        Ok(BookDetail {
            url: book.url(),
            display_genre: display_genre(&genres),
            book,
            author,
            language,
            genres,
            copies,
        })
    }

    /// Blank book form, with the configured default language selected when it exists
    pub async fn book_create_form(&self) -> AppResult<BookFormDocument> {
        let language_id = self
            .repository
            .catalog
            .find_language_by_name(&self.config.default_language)
            .await?
            .map(|language| language.id);

        Ok(BookFormDocument {
            action: "/catalog/book/create/".to_string(),
            initial: BookFields {
                language_id,
                ..Default::default()
            },
        })
    }

    pub async fn book_update_form(&self, id: i32) -> AppResult<BookFormDocument> {
        let book = self.repository.books.get_by_id(id).await?;
        let genres = self.repository.books.get_genres(id).await?;
        Ok(BookFormDocument {
            action: format!("{}/update/", book_url(id)),
            initial: BookFields {
                title: book.title,
                author_id: book.author_id,
                summary: book.summary,
                isbn: book.isbn,
                language_id: book.language_id,
                genre_ids: genres.into_iter().map(|g| g.id).collect(),
            },
        })
    }

    pub async fn create_book(&self, fields: &BookFields) -> AppResult<Book> {
        let book = self.repository.books.create(fields).await?;
        tracing::info!("Created book {} ({})", book.id, book.title);
        Ok(book)
    }

    pub async fn update_book(&self, id: i32, fields: &BookFields) -> AppResult<Book> {
        let book = self.repository.books.update(id, fields).await?;
        tracing::info!("Updated book {}", id);
        Ok(book)
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book {}", id);
        Ok(())
    }

    // ---- Authors ----

    pub async fn list_authors(&self, page: i64) -> AppResult<Page<AuthorListEntry>> {
        let page: Page<Author> = self.repository.fetch_page(&author_listing(), page).await?;
        Ok(page.map(AuthorListEntry::from))
    }

    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetail> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.authors.get_books(id).await?;
        Ok(AuthorDetail {
            name: author.to_string(),
            author,
            books,
        })
    }

    pub fn author_create_form(&self) -> AuthorFormDocument {
        AuthorFormDocument {
            action: "/catalog/author/create/".to_string(),
            initial: AuthorFields {
                first_name: String::new(),
                last_name: String::new(),
                date_of_birth: None,
                date_of_death: initial_date_of_death(),
            },
        }
    }

    pub async fn author_update_form(&self, id: i32) -> AppResult<AuthorFormDocument> {
        let author = self.repository.authors.get_by_id(id).await?;
        Ok(AuthorFormDocument {
            action: format!("{}/update/", author_url(id)),
            initial: AuthorFields::from(&author),
        })
    }

    pub async fn create_author(&self, fields: &AuthorFields) -> AppResult<Author> {
        let author = self.repository.authors.create(fields).await?;
        tracing::info!("Created author {} ({})", author.id, author);
        Ok(author)
    }

    pub async fn update_author(&self, id: i32, fields: &AuthorFields) -> AppResult<Author> {
        let author = self.repository.authors.update(id, fields).await?;
        tracing::info!("Updated author {}", id);
        Ok(author)
    }

    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await?;
        tracing::info!("Deleted author {}", id);
        Ok(())
    }

    // ---- Genres and languages ----

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.catalog.list_genres().await
    }

    pub async fn create_genre(&self, name: &str) -> AppResult<Genre> {
        let genre = self.repository.catalog.create_genre(name).await?;
        tracing::info!("Created genre {} ({})", genre.id, genre.name);
        Ok(genre)
    }

    pub async fn list_languages(&self) -> AppResult<Vec<Language>> {
        self.repository.catalog.list_languages().await
    }

    pub async fn create_language(&self, name: &str) -> AppResult<Language> {
        let language = self.repository.catalog.create_language(name).await?;
        tracing::info!("Created language {} ({})", language.id, language.name);
        Ok(language)
    }
}
