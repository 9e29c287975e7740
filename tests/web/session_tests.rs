//! # Session Web API Tests
//!
//! Sign-in page, sign-in, sign-out and session expiry.

use super::test_infrastructure::*;
use reqwest::header::SET_COOKIE;
use reqwest::StatusCode;
use serde_json::json;
use todo_items::config::{AccountConfig, AppConfig};
use todo_items::session::SessionProvider;
use todo_items::store::ItemStore;
use uuid::Uuid;

const ACCOUNT_ID: &str = "6f1c2b1e-3d4a-4c5b-9e8f-0a1b2c3d4e5f";

fn config_with_account() -> AppConfig {
    let mut config = AppConfig::default();
    config.session.accounts = vec![AccountConfig {
        actor_id: Uuid::parse_str(ACCOUNT_ID).unwrap(),
        email: "owner@example.com".to_string(),
        password: "hunter22".to_string(),
    }];
    config
}

fn credentials(email: &str, password: &str) -> serde_json::Value {
    json!({ "user": { "email": email, "password": password } })
}

#[tokio::test]
async fn test_sign_in_page_for_anonymous_visitors() {
    let test_server = TestServer::start()
        .await
        .expect("Failed to start test server");

    let response = test_server
        .anonymous_client()
        .get("/users/sign_in")
        .await
        .expect("Failed to send request");
    let form = assert_json_response(response, 200, &["action", "method", "fields"])
        .await
        .expect("Failed to parse sign-in form");

    assert_eq!(form["action"], "/users/sign_in");

    test_server
        .shutdown()
        .await
        .expect("Failed to shutdown test server");
}

#[tokio::test]
async fn test_sign_in_page_redirects_signed_in_actor() {
    let test_server = TestServer::start()
        .await
        .expect("Failed to start test server");
    let (_, token) = test_server.sign_in("owner@example.com").await;

    let response = test_server
        .client_for(&token)
        .get("/users/sign_in")
        .await
        .expect("Failed to send request");

    assert_redirect(&response, "/");

    test_server
        .shutdown()
        .await
        .expect("Failed to shutdown test server");
}

/// Submitting the sign-in form to its advertised target opens a usable session
#[tokio::test]
async fn test_sign_in_with_valid_credentials_opens_session() {
    let test_server = TestServer::start_with_config(config_with_account())
        .await
        .expect("Failed to start test server");
    let client = test_server.anonymous_client();

    let response = client
        .get("/users/sign_in")
        .await
        .expect("Failed to send request");
    let form = assert_json_response(response, 200, &["action", "method"])
        .await
        .expect("Failed to parse sign-in form");
    assert_eq!(form["method"], "POST");
    let action = form["action"].as_str().expect("action should be a string");

    let response = client
        .post_json(action, &credentials("Owner@Example.com", "hunter22"))
        .await
        .expect("Failed to send request");
    assert_redirect(&response, "/");

    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("Sign-in should set the session cookie");
    assert!(set_cookie.starts_with("_items_session="));
    assert!(set_cookie.contains("HttpOnly"));
    let session_pair = set_cookie
        .split(';')
        .next()
        .expect("Set-Cookie should start with name=value");
    assert_eq!(test_server.sessions.len(), 1);

    let signed_in = test_server.anonymous_client().with_raw_cookie(session_pair);
    let response = signed_in
        .post_json("/items", &item_params("clean out the fridge"))
        .await
        .expect("Failed to send request");
    assert_redirect(&response, "/");

    let response = signed_in.get("/items").await.expect("Failed to send request");
    let body = assert_json_response(response, 200, &["items", "count"])
        .await
        .expect("Failed to parse item list");
    assert_eq!(body["count"], 1);

    // Items belong to the configured actor id
    let owned = test_server
        .store
        .list_by_owner(Uuid::parse_str(ACCOUNT_ID).unwrap())
        .await
        .expect("Failed to list items");
    assert_eq!(owned.len(), 1);

    test_server
        .shutdown()
        .await
        .expect("Failed to shutdown test server");
}

#[tokio::test]
async fn test_sign_in_with_bad_credentials_redirects_back() {
    let test_server = TestServer::start_with_config(config_with_account())
        .await
        .expect("Failed to start test server");
    let client = test_server.anonymous_client();

    for (email, password) in [
        ("owner@example.com", "wrong"),
        ("owner@example.com", ""),
        ("nobody@example.com", "hunter22"),
    ] {
        let response = client
            .post_json("/users/sign_in", &credentials(email, password))
            .await
            .expect("Failed to send request");

        assert_redirect(&response, "/users/sign_in");
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    assert!(test_server.sessions.is_empty());

    test_server
        .shutdown()
        .await
        .expect("Failed to shutdown test server");
}

#[tokio::test]
async fn test_sign_in_with_malformed_body_is_bad_request() {
    let test_server = TestServer::start_with_config(config_with_account())
        .await
        .expect("Failed to start test server");

    let response = test_server
        .anonymous_client()
        .post_raw("/users/sign_in", "{not json")
        .await
        .expect("Failed to send request");
    let body = assert_json_response(response, 400, &["error"])
        .await
        .expect("Failed to parse error body");

    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(test_server.sessions.is_empty());

    test_server
        .shutdown()
        .await
        .expect("Failed to shutdown test server");
}

#[tokio::test]
async fn test_sign_in_while_signed_in_redirects_to_root() {
    let test_server = TestServer::start_with_config(config_with_account())
        .await
        .expect("Failed to start test server");
    let (_, token) = test_server.sign_in("other@example.com").await;

    let response = test_server
        .client_for(&token)
        .post_json("/users/sign_in", &credentials("owner@example.com", "hunter22"))
        .await
        .expect("Failed to send request");

    assert_redirect(&response, "/");
    assert!(response.headers().get(SET_COOKIE).is_none());
    assert_eq!(test_server.sessions.len(), 1);

    test_server
        .shutdown()
        .await
        .expect("Failed to shutdown test server");
}

#[tokio::test]
async fn test_sign_out_revokes_session() {
    let test_server = TestServer::start()
        .await
        .expect("Failed to start test server");
    let (_, token) = test_server.sign_in("owner@example.com").await;
    let client = test_server.client_for(&token);

    let response = client.get("/items").await.expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .delete("/users/sign_out")
        .await
        .expect("Failed to send request");
    assert_redirect(&response, "/");

    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("Sign-out should expire the cookie");
    assert!(set_cookie.starts_with("_items_session=;"));
    assert!(set_cookie.contains("Max-Age=0"));

    assert!(test_server.sessions.current_actor(&token).await.is_none());

    // The old cookie is now just an anonymous request
    let response = client.get("/items").await.expect("Failed to send request");
    assert_redirect(&response, "/users/sign_in");

    test_server
        .shutdown()
        .await
        .expect("Failed to shutdown test server");
}

#[tokio::test]
async fn test_anonymous_sign_out_is_a_plain_redirect() {
    let test_server = TestServer::start()
        .await
        .expect("Failed to start test server");

    let response = test_server
        .anonymous_client()
        .delete("/users/sign_out")
        .await
        .expect("Failed to send request");

    assert_redirect(&response, "/");
    assert!(response.headers().get(SET_COOKIE).is_none());

    test_server
        .shutdown()
        .await
        .expect("Failed to shutdown test server");
}

#[tokio::test]
async fn test_configured_cookie_name_and_paths() {
    let mut config = AppConfig::default();
    config.session.cookie_name = "todo_sid".to_string();
    config.paths.sign_in = "/login".to_string();
    let test_server = TestServer::start_with_config(config)
        .await
        .expect("Failed to start test server");
    let (_, token) = test_server.sign_in("owner@example.com").await;

    let response = test_server
        .anonymous_client()
        .get("/items")
        .await
        .expect("Failed to send request");
    assert_redirect(&response, "/login");

    // The default cookie name is ignored under a custom configuration
    let response = test_server
        .anonymous_client()
        .with_session("_items_session", &token)
        .get("/items")
        .await
        .expect("Failed to send request");
    assert_redirect(&response, "/login");

    let response = test_server
        .client_for(&token)
        .get("/items")
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    test_server
        .shutdown()
        .await
        .expect("Failed to shutdown test server");
}

#[tokio::test]
async fn test_expired_session_is_anonymous() {
    let mut config = AppConfig::default();
    config.session.ttl_seconds = 0;
    let test_server = TestServer::start_with_config(config)
        .await
        .expect("Failed to start test server");
    let (owner, token) = test_server.sign_in("owner@example.com").await;
    let item = test_server.seed_item(&owner, "wash dishes").await;

    let response = test_server
        .client_for(&token)
        .delete(&format!("/items/{}", item.item_id))
        .await
        .expect("Failed to send request");

    assert_redirect(&response, "/users/sign_in");
    assert!(test_server.find_item(item.item_id).await.is_some());

    test_server
        .shutdown()
        .await
        .expect("Failed to shutdown test server");
}
