//! Banner, API key, login and fallback tests.

use toolbox_client::{Error, LoginOutcome};
use toolbox_tests::{TEST_API_KEY, TestServer};

#[tokio::test]
async fn test_banner() {
    let server = TestServer::start().await;

    let banner = server.client.banner().await.expect("Failed to get banner");
    assert!(banner.starts_with("API Server Toolbox v"));
}

#[tokio::test]
async fn test_users_require_allowed_key() {
    let server = TestServer::start().await;

    let missing = server.client.list_users(None).await;
    assert!(matches!(missing, Err(Error::Unauthorized(_))));

    let unknown = server.client.list_users(Some("guessed-key")).await;
    assert!(matches!(unknown, Err(Error::Unauthorized(_))));

    let users = server
        .client
        .list_users(Some(TEST_API_KEY))
        .await
        .expect("Allowed key rejected");
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn test_courses_are_public() {
    let server = TestServer::start().await;

    let courses = server.client.list_courses().await.expect("Failed to list courses");
    assert_eq!(courses[0]["name"], "Anatomia");
}

#[tokio::test]
async fn test_login() {
    let server = TestServer::start().await;

    let passed = server
        .client
        .login("admin", "admin")
        .await
        .expect("Login request failed");
    assert_eq!(passed, LoginOutcome::Passed);

    let failed = server
        .client
        .login("admin", "wrong")
        .await
        .expect("Login request failed");
    assert_eq!(failed, LoginOutcome::Failed);
}

#[tokio::test]
async fn test_unknown_route() {
    let server = TestServer::start().await;

    let url = server
        .client
        .endpoint(&["no", "such", "route"])
        .expect("Failed to build URL");
    let response = reqwest::get(url).await.expect("Request failed");
    assert_eq!(response.status().as_u16(), 404);

    let body: serde_json::Value = response.json().await.expect("JSON body");
    assert_eq!(
        body,
        serde_json::json!({"message": "This is nowhere to be found."})
    );
}

#[tokio::test]
async fn test_wrong_method_uses_fallback() {
    let server = TestServer::start().await;

    let url = server.client.endpoint(&["exams"]).expect("Failed to build URL");
    let response = reqwest::Client::new()
        .delete(url)
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status().as_u16(), 404);
}
