//! Database-backed tests
//!
//! Need a Postgres server: `DATABASE_URL=... cargo test -- --ignored`

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use sqlx::PgPool;

use locallibrary::{
    config::AppConfig,
    models::{
        author::AuthorFields,
        book::BookFields,
        book_instance::BookInstanceFields,
        user::CreateUser,
        LoanStatus,
    },
    repository::Repository,
    services::{loans::RenewalOutcome, session::MemorySessionStore, Services},
    AppError,
};

fn services(pool: PgPool) -> Services {
    let config = AppConfig::default();
    Services::new(Repository::new(pool), &config, Arc::new(MemorySessionStore::new()))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn add_book(services: &Services, title: &str, author_id: Option<i32>) -> i32 {
    let genre = services
        .catalog
        .create_genre(&format!("Genre for {}", title))
        .await
        .unwrap();
    services
        .catalog
        .create_book(&BookFields {
            title: title.to_string(),
            author_id,
            summary: "summary".to_string(),
            isbn: "1234567890123".to_string(),
            language_id: None,
            genre_ids: vec![genre.id],
        })
        .await
        .unwrap()
        .id
}

async fn add_user(services: &Services, username: &str) -> i32 {
    services
        .users
        .create_user(CreateUser {
            username: username.to_string(),
            password: "password".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: None,
            is_superuser: false,
            permissions: vec![],
        })
        .await
        .unwrap()
        .id
}

async fn lend(
    services: &Services,
    book_id: i32,
    borrower_id: Option<i32>,
    due_back: Option<NaiveDate>,
    status: LoanStatus,
) -> uuid::Uuid {
    services
        .loans
        .create_instance(&BookInstanceFields {
            book_id: Some(book_id),
            imprint: "Imprint".to_string(),
            due_back,
            borrower_id,
            status,
        })
        .await
        .unwrap()
        .id
}

#[sqlx::test]
#[ignore]
async fn test_book_list_pages(pool: PgPool) {
    let services = services(pool);

    let empty = services.catalog.list_books(1).await.unwrap();
    assert!(empty.items.is_empty());
    assert_eq!(empty.num_pages, 1);

    for title in ["Charlie", "Alpha", "Bravo", "Delta"] {
        add_book(&services, title, None).await;
    }

    let first = services.catalog.list_books(1).await.unwrap();
    let titles: Vec<_> = first.items.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha", "Bravo", "Charlie"]);
    assert!(first.has_next);

    let second = services.catalog.list_books(2).await.unwrap();
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].title, "Delta");

    assert!(matches!(services.catalog.list_books(3).await, Err(AppError::NotFound(_))));
    assert!(matches!(services.catalog.list_books(0).await, Err(AppError::NotFound(_))));
}

#[sqlx::test]
#[ignore]
async fn test_borrowed_lists(pool: PgPool) {
    let services = services(pool);
    let book = add_book(&services, "War and Peace", None).await;
    let reader = add_user(&services, "reader").await;
    let other = add_user(&services, "other").await;

    let late = lend(&services, book, Some(reader), Some(today() + Duration::days(9)), LoanStatus::OnLoan).await;
    let soon = lend(&services, book, Some(other), Some(today() + Duration::days(2)), LoanStatus::OnLoan).await;
    let undated = lend(&services, book, Some(reader), None, LoanStatus::OnLoan).await;
    lend(&services, book, None, None, LoanStatus::Available).await;

    let all = services.loans.all_borrowed(1).await.unwrap();
    let ids: Vec<_> = all.items.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![soon, late, undated]);
    assert!(all.items.iter().all(|c| c.status == LoanStatus::OnLoan));
    assert_eq!(all.items[0].borrower_username.as_deref(), Some("other"));

    let mine = services.loans.my_loans(reader, 1).await.unwrap();
    let ids: Vec<_> = mine.items.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![late, undated]);
}

#[sqlx::test]
#[ignore]
async fn test_renewal_window(pool: PgPool) {
    let services = services(pool.clone());
    let book = add_book(&services, "The Dispossessed", None).await;
    let reader = add_user(&services, "reader").await;
    let due = today() + Duration::days(2);
    let copy = lend(&services, book, Some(reader), Some(due), LoanStatus::OnLoan).await;

    let too_far = (today() + Duration::weeks(4) + Duration::days(1)).to_string();
    match services.loans.renew(copy, &too_far, today()).await.unwrap() {
        RenewalOutcome::Rejected(form) => {
            assert_eq!(form.renewal_date.as_deref(), Some(too_far.as_str()));
            assert_eq!(form.copy.due_back, Some(due));
        }
        RenewalOutcome::Renewed(_) => panic!("renewal more than 4 weeks ahead accepted"),
    }

    let repository = Repository::new(pool);
    assert_eq!(repository.book_instances.get_by_id(copy).await.unwrap().due_back, Some(due));

    let three_weeks = today() + Duration::weeks(3);
    let outcome = services
        .loans
        .renew(copy, &three_weeks.to_string(), today())
        .await
        .unwrap();
    assert!(matches!(outcome, RenewalOutcome::Renewed(date) if date == three_weeks));

    let renewed = repository.book_instances.get_by_id(copy).await.unwrap();
    assert_eq!(renewed.due_back, Some(three_weeks));
    assert_eq!(renewed.status, LoanStatus::OnLoan);

    assert!(matches!(
        services.loans.renew(uuid::Uuid::new_v4(), &three_weeks.to_string(), today()).await,
        Err(AppError::NotFound(_))
    ));
}

#[sqlx::test]
#[ignore]
async fn test_home_counts(pool: PgPool) {
    let services = services(pool);
    let book = add_book(&services, "WAR of the Worlds", None).await;
    add_book(&services, "Peace", None).await;
    services.catalog.create_language("English").await.unwrap();
    lend(&services, book, None, None, LoanStatus::Available).await;
    lend(&services, book, None, None, LoanStatus::Maintenance).await;

    let home = services.catalog.home(None, 0).await.unwrap();
    assert_eq!(home.title_filter, "war");
    assert_eq!(home.counts.num_books, 2);
    assert_eq!(home.counts.num_instances, 2);
    assert_eq!(home.counts.num_instances_available, 1);
    assert_eq!(home.counts.num_authors, 0);
    assert_eq!(home.counts.num_genres, 2);
    assert_eq!(home.counts.num_languages, 1);
    assert_eq!(home.counts.num_books_matching, 1);

    let home = services.catalog.home(Some("%".to_string()), 0).await.unwrap();
    assert_eq!(home.counts.num_books_matching, 0);
}

#[sqlx::test]
#[ignore]
async fn test_deletes_nullify_references(pool: PgPool) {
    let services = services(pool);
    let author = services
        .catalog
        .create_author(&AuthorFields {
            first_name: "Ursula".to_string(),
            last_name: "Le Guin".to_string(),
            date_of_birth: None,
            date_of_death: None,
        })
        .await
        .unwrap();
    let book = add_book(&services, "Lathe of Heaven", Some(author.id)).await;
    let copy = lend(&services, book, None, None, LoanStatus::Available).await;

    services.catalog.delete_author(author.id).await.unwrap();
    let detail = services.catalog.get_book(book).await.unwrap();
    assert!(detail.author.is_none());
    assert_eq!(detail.copies.len(), 1);

    services.catalog.delete_book(book).await.unwrap();
    assert!(matches!(services.catalog.get_book(book).await, Err(AppError::NotFound(_))));
    assert!(matches!(services.catalog.delete_book(book).await, Err(AppError::NotFound(_))));

    let orphan = services
        .loans
        .update_instance(
            copy,
            &BookInstanceFields {
                book_id: None,
                imprint: "Imprint".to_string(),
                due_back: None,
                borrower_id: None,
                status: LoanStatus::Available,
            },
        )
        .await
        .unwrap();
    assert_eq!(orphan.book_id, None);
}

#[sqlx::test]
#[ignore]
async fn test_write_violations_become_field_errors(pool: PgPool) {
    let services = services(pool);
    services.catalog.create_genre("Fantasy").await.unwrap();

    match services.catalog.create_genre("Fantasy").await {
        Err(AppError::InvalidForm(fields)) => assert!(fields.contains_key("name")),
        other => panic!("duplicate genre accepted: {:?}", other.map(|g| g.id)),
    }

    let result = services
        .catalog
        .create_book(&BookFields {
            title: "Orphan".to_string(),
            author_id: Some(424242),
            summary: "s".to_string(),
            isbn: "1".to_string(),
            language_id: None,
            genre_ids: vec![],
        })
        .await;
    match result {
        Err(AppError::InvalidForm(fields)) => {
            assert_eq!(fields["author"], vec!["Select a valid choice.".to_string()])
        }
        other => panic!("unknown author accepted: {:?}", other.map(|b| b.id)),
    }
}

#[sqlx::test]
#[ignore]
async fn test_login(pool: PgPool) {
    let mut config = AppConfig::default();
    config.auth.admin_username = Some("admin".to_string());
    config.auth.admin_password = Some("admin".to_string());
    let services = Services::new(Repository::new(pool), &config, Arc::new(MemorySessionStore::new()));

    let admin = services.users.ensure_admin().await.unwrap().unwrap();
    assert!(admin.is_superuser);
    assert!(services.users.ensure_admin().await.unwrap().is_none());

    let response = services.users.authenticate("admin", "admin").await.unwrap();
    assert_eq!(response.token_type, "Bearer");
    assert!(response.user.is_superuser);

    assert!(matches!(
        services.users.authenticate("admin", "nope").await,
        Err(AppError::Authentication(_))
    ));
}
