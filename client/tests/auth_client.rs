//! Auth store behavior against a mocked backend: transparent refresh,
//! single retry on 401, and logged-out failure modes.

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use audiobook_client::{AuthClient, ClientError};

fn user_json() -> serde_json::Value {
    json!({
        "id": "US_TEST01",
        "googleId": "g1",
        "email": "a@x.com",
        "name": "A",
        "avatar": null,
        "createdAt": "2024-01-01T00:00:00Z",
        "lastLogin": "2024-01-01T00:00:00Z"
    })
}

fn book_json() -> serde_json::Value {
    json!({
        "id": "B_AAAAAA",
        "fileId": "F_AAAAAA",
        "title": "My Book",
        "originalFileName": "book.pdf",
        "userId": "US_TEST01",
        "createdAt": "2024-01-02T00:00:00Z",
        "audioUrl": "https://example.com/presigned"
    })
}

async fn mock_refresh(server: &MockServer, token: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn no_token_refreshes_first_then_request_succeeds() {
    // Scenario: client holds no token; refresh succeeds; the request
    // proceeds with the new token and returns 200
    let server = MockServer::start().await;
    mock_refresh(&server, "t1", 1).await;

    Mock::given(method("GET"))
        .and(path("/api/audiobooks"))
        .and(header("authorization", "Bearer t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = AuthClient::new(server.uri()).unwrap();
    let books = client.fetch_audiobooks().await.unwrap();
    assert!(books.is_empty());
    assert_eq!(client.state().await.token.as_deref(), Some("t1"));
}

#[tokio::test]
async fn rejected_token_is_refreshed_and_request_retried_once() {
    let server = MockServer::start().await;
    mock_refresh(&server, "t2", 1).await;

    Mock::given(method("GET"))
        .and(path("/api/audiobooks"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Token expired", "code": "TOKEN_EXPIRED"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/audiobooks"))
        .and(header("authorization", "Bearer t2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([book_json()])))
        .expect(1)
        .mount(&server)
        .await;

    let client = AuthClient::new(server.uri()).unwrap();
    client.set_token("stale").await;

    let books = client.fetch_audiobooks().await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].file_id, "F_AAAAAA");
    assert_eq!(client.state().await.audiobooks.len(), 1);
}

#[tokio::test]
async fn second_401_surfaces_without_further_retries() {
    // Scenario: the server rejects both the original and the retried
    // request; the second 401 reaches the caller, refresh ran exactly once
    let server = MockServer::start().await;
    mock_refresh(&server, "t2", 1).await;

    Mock::given(method("GET"))
        .and(path("/api/audiobooks"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Invalid token", "code": "TOKEN_INVALID"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = AuthClient::new(server.uri()).unwrap();
    client.set_token("stale").await;

    let err = client.fetch_audiobooks().await.unwrap_err();
    match err {
        ClientError::UnexpectedStatus(status) => assert_eq!(status.as_u16(), 401),
        other => panic!("expected UnexpectedStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn no_token_and_failed_refresh_means_logged_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/refresh-token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Not authenticated", "code": "UNAUTHORIZED"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AuthClient::new(server.uri()).unwrap();
    let err = client.fetch_audiobooks().await.unwrap_err();
    assert!(matches!(err, ClientError::NoTokenAvailable));
}

#[tokio::test]
async fn check_auth_status_stores_user_and_embedded_token() {
    let server = MockServer::start().await;

    let mut body = user_json();
    body["apiToken"] = json!("fresh-token");

    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = AuthClient::new(server.uri()).unwrap();
    assert!(client.state().await.loading);

    client.check_auth_status().await;

    let state = client.state().await;
    assert!(!state.loading);
    assert_eq!(state.token.as_deref(), Some("fresh-token"));
    assert_eq!(state.user.as_ref().unwrap().email, "a@x.com");
}

#[tokio::test]
async fn check_auth_status_failure_still_clears_loading() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Not authenticated", "code": "UNAUTHORIZED"
        })))
        .mount(&server)
        .await;

    let client = AuthClient::new(server.uri()).unwrap();
    client.check_auth_status().await;

    let state = client.state().await;
    assert!(!state.loading);
    assert!(state.user.is_none());
    assert!(state.token.is_none());
}

#[tokio::test]
async fn logout_clears_all_local_state() {
    let server = MockServer::start().await;
    mock_refresh(&server, "t1", 1).await;

    Mock::given(method("GET"))
        .and(path("/api/audiobooks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([book_json()])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/logout"))
        .respond_with(
            ResponseTemplate::new(303).insert_header("location", "http://localhost:3000/"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = AuthClient::new(server.uri()).unwrap();
    client.fetch_audiobooks().await.unwrap();
    assert_eq!(client.state().await.audiobooks.len(), 1);

    client.logout().await;

    let state = client.state().await;
    assert!(state.user.is_none());
    assert!(state.token.is_none());
    assert!(state.audiobooks.is_empty());
}

#[tokio::test]
async fn store_audiobook_retries_multipart_upload_once_on_401() {
    let server = MockServer::start().await;
    mock_refresh(&server, "t2", 1).await;

    Mock::given(method("POST"))
        .and(path("/api/audiobooks"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Token expired", "code": "TOKEN_EXPIRED"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/audiobooks"))
        .and(header("authorization", "Bearer t2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(book_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = AuthClient::new(server.uri()).unwrap();
    client.set_token("stale").await;

    let book = client
        .store_audiobook(vec![0u8; 64], "My Book", "book.pdf")
        .await
        .unwrap();
    assert_eq!(book.title, "My Book");
    assert_eq!(client.state().await.audiobooks.len(), 1);
}
