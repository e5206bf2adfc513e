//! API integration tests, run against a live server
//!
//! The server must be started with `LOCALLIBRARY_AUTH__ADMIN_USERNAME=admin` and
//! `LOCALLIBRARY_AUTH__ADMIN_PASSWORD=admin` on an empty database.

use chrono::{Duration, Local};
use reqwest::{header::LOCATION, redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8000";

/// Client that reports redirects instead of following them
fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

/// Helper to get a superuser token and id
async fn admin_login(client: &Client) -> (String, i64) {
    let response = client
        .post(format!("{}/accounts/login/", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    (
        body["token"].as_str().expect("No token in response").to_string(),
        body["user"]["id"].as_i64().expect("No user id in response"),
    )
}

fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Creates a genre and returns its id
async fn create_genre(client: &Client, token: &str) -> i64 {
    let response = client
        .post(format!("{}/catalog/genre/create/", BASE_URL))
        .bearer_auth(token)
        .form(&[("name", format!("Genre {}", Uuid::new_v4().simple()))])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No genre id")
}

/// Creates an author and returns the URL it redirects to
async fn create_author(client: &Client, token: &str) -> String {
    let response = client
        .post(format!("{}/catalog/author/create/", BASE_URL))
        .bearer_auth(token)
        .form(&[
            ("first_name", "Ursula"),
            ("last_name", "Le Guin"),
            ("date_of_birth", "1929-10-21"),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    location(&response)
}

fn id_from_url(url: &str) -> String {
    url.rsplit('/').next().unwrap_or_default().to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let response = client()
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_root_redirects_to_catalog() {
    let response = client()
        .get(format!("{}/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/");
}

#[tokio::test]
#[ignore]
async fn test_home_counts_visits_per_session() {
    let client = client();

    let first = client
        .get(format!("{}/catalog/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(first.status().is_success());
    let cookie = first
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("No session cookie")
        .to_string();
    let body: Value = first.json().await.expect("Failed to parse response");
    assert_eq!(body["num_visits"], 0);
    assert!(body["counts"]["num_books"].is_number());

    let second: Value = client
        .get(format!("{}/catalog/", BASE_URL))
        .header("cookie", &cookie)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(second["num_visits"], 1);
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let response = client()
        .post(format!("{}/accounts/login/", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_anonymous_access() {
    let client = client();

    let response = client
        .get(format!("{}/catalog/mybooks/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/accounts/login/?next=/catalog/mybooks/");

    let response = client
        .get(format!("{}/catalog/all-borrowed-books/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .post(format!("{}/catalog/author/create/", BASE_URL))
        .form(&[("first_name", "Anon"), ("last_name", "Ymous")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_author_lifecycle() {
    let client = client();
    let (token, _) = admin_login(&client).await;

    let form: Value = client
        .get(format!("{}/catalog/author/create/", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(form["initial"]["date_of_death"], "2016-12-10");

    let url = create_author(&client, &token).await;
    assert!(url.starts_with("/catalog/author/"));

    let author: Value = client
        .get(format!("{}{}", BASE_URL, url))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(author["name"], "Le Guin, Ursula");

    let response = client
        .post(format!("{}{}/delete/", BASE_URL, url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/authors/");

    let response = client
        .get(format!("{}{}", BASE_URL, url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_book_form_errors() {
    let client = client();
    let (token, _) = admin_login(&client).await;

    let response = client
        .post(format!("{}/catalog/book/create/", BASE_URL))
        .bearer_auth(&token)
        .form(&[("title", "No genre"), ("summary", "x"), ("isbn", "123")])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["fields"]["genre"].is_array());

    let genre = create_genre(&client, &token).await.to_string();
    let response = client
        .post(format!("{}/catalog/book/create/", BASE_URL))
        .bearer_auth(&token)
        .form(&[
            ("title", "Bad author"),
            ("summary", "x"),
            ("isbn", "123"),
            ("author", "999999"),
            ("genre", genre.as_str()),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["fields"]["author"][0], "Select a valid choice.");
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_renew() {
    let client = client();
    let (token, admin_id) = admin_login(&client).await;

    let author_id = id_from_url(&create_author(&client, &token).await);
    let genre_a = create_genre(&client, &token).await.to_string();
    let genre_b = create_genre(&client, &token).await.to_string();

    let response = client
        .post(format!("{}/catalog/book/create/", BASE_URL))
        .bearer_auth(&token)
        .form(&[
            ("title", "The Dispossessed"),
            ("summary", "Shevek travels to Urras."),
            ("isbn", "9780061054884"),
            ("author", author_id.as_str()),
            ("genre", genre_a.as_str()),
            ("genre", genre_b.as_str()),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let book_url = location(&response);
    let book_id = id_from_url(&book_url);

    let book: Value = client
        .get(format!("{}{}", BASE_URL, book_url))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(book["genres"].as_array().map(|g| g.len()), Some(2));

    let due = Local::now().date_naive() + Duration::days(5);
    let response = client
        .post(format!("{}/catalog/bookinstance/create/", BASE_URL))
        .bearer_auth(&token)
        .form(&[
            ("book", book_id.clone()),
            ("imprint", "Harper, 1994".to_string()),
            ("due_back", due.to_string()),
            ("borrower", admin_id.to_string()),
            ("status", "o".to_string()),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let copy: Value = response.json().await.expect("Failed to parse response");
    let copy_id = copy["id"].as_str().expect("No copy id").to_string();
    assert_eq!(copy_id.len(), 32);

    let mine: Value = client
        .get(format!("{}/catalog/mybooks/", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(mine["items"]
        .as_array()
        .map(|items| items.iter().any(|c| c["id"] == copy_id.as_str()))
        .unwrap_or(false));

    // Past dates are rejected and the submitted value is echoed back
    let yesterday = (Local::now().date_naive() - Duration::days(1)).to_string();
    let response = client
        .post(format!("{}/catalog/book/{}/renew/", BASE_URL, copy_id))
        .bearer_auth(&token)
        .form(&[("renewal_date", yesterday.as_str())])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["renewal_date"], yesterday.as_str());
    assert_eq!(body["errors"]["renewal_date"][0], "Invalid date - renewal in past.");

    let renewal = (Local::now().date_naive() + Duration::days(21)).to_string();
    let response = client
        .post(format!("{}/catalog/book/{}/renew/", BASE_URL, copy_id))
        .bearer_auth(&token)
        .form(&[("renewal_date", renewal.as_str())])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/all-borrowed-books/");

    let form: Value = client
        .get(format!("{}/catalog/book/{}/renew/", BASE_URL, copy_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(form["copy"]["due_back"], renewal.as_str());
    assert_eq!(form["copy"]["status"], "o");
}

#[tokio::test]
#[ignore]
async fn test_page_out_of_range() {
    let response = client()
        .get(format!("{}/catalog/books/?page=100000", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
