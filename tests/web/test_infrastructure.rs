//! # Web API Test Infrastructure
//!
//! Common testing utilities and infrastructure for web API integration tests.

use reqwest::header::{COOKIE, LOCATION};
use reqwest::{redirect, Client, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use todo_items::config::AppConfig;
use todo_items::models::{Actor, Item};
use todo_items::session::{MemorySessionStore, SessionProvider, SessionToken};
use todo_items::store::{ItemStore, MemoryItemStore};
use todo_items::web::{create_app, state::AppState};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Test server instance that manages a running web server for tests
#[derive(Debug)]
pub struct TestServer {
    pub base_url: String,
    pub config: AppConfig,
    pub store: Arc<MemoryItemStore>,
    pub sessions: Arc<MemorySessionStore>,
    handle: JoinHandle<()>,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
}

impl TestServer {
    /// Start a test server with default configuration on an ephemeral port
    pub async fn start() -> Result<Self, BoxError> {
        Self::start_with_config(AppConfig::default()).await
    }

    /// Start a test server with the given configuration on an ephemeral port
    pub async fn start_with_config(config: AppConfig) -> Result<Self, BoxError> {
        let store = Arc::new(MemoryItemStore::new());
        let sessions = Arc::new(MemorySessionStore::new(config.session.ttl()));

        let app_state = AppState::new(
            Arc::new(config.clone()),
            store.clone(),
            sessions.clone(),
        );
        let app = create_app(app_state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("Server failed to start");
        });

        // Give the server a moment to start
        tokio::time::sleep(Duration::from_millis(50)).await;

        Ok(TestServer {
            base_url: format!("http://{address}"),
            config,
            store,
            sessions,
            handle,
            shutdown_tx,
        })
    }

    /// Open a session for a fresh actor
    pub async fn sign_in(&self, email: &str) -> (Actor, SessionToken) {
        let actor = Actor::generate(email);
        let token = self.sessions.sign_in(actor.clone()).await;
        (actor, token)
    }

    /// Client that presents `token` as its session cookie
    pub fn client_for(&self, token: &SessionToken) -> WebTestClient {
        WebTestClient::for_server(self)
            .expect("Failed to create test client")
            .with_session(&self.config.session.cookie_name, token)
    }

    /// Client without any session
    pub fn anonymous_client(&self) -> WebTestClient {
        WebTestClient::for_server(self).expect("Failed to create test client")
    }

    /// Seed an item directly through the store
    pub async fn seed_item(&self, owner: &Actor, text: &str) -> Item {
        self.store
            .create(owner.actor_id, text)
            .await
            .expect("Failed to seed item")
    }

    pub async fn find_item(&self, item_id: Uuid) -> Option<Item> {
        self.store.find(item_id).await.expect("Failed to look up item")
    }

    pub async fn item_count(&self) -> u64 {
        self.store.count().await.expect("Failed to count items")
    }

    /// Shutdown the test server
    pub async fn shutdown(self) -> Result<(), BoxError> {
        let _ = self.shutdown_tx.send(());

        tokio::time::timeout(Duration::from_secs(5), self.handle).await??;

        Ok(())
    }
}

/// reqwest wrapper that never follows redirects, so tests see the 303s
#[derive(Debug)]
pub struct WebTestClient {
    client: Client,
    base_url: String,
    cookie: Option<String>,
}

impl WebTestClient {
    pub fn for_server(server: &TestServer) -> Result<Self, BoxError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            base_url: server.base_url.clone(),
            cookie: None,
        })
    }

    pub fn with_session(mut self, cookie_name: &str, token: &SessionToken) -> Self {
        self.cookie = Some(format!("{cookie_name}={token}"));
        self
    }

    pub fn with_raw_cookie(mut self, cookie: &str) -> Self {
        self.cookie = Some(cookie.to_string());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.cookie {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        }
    }

    pub async fn get(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.request(reqwest::Method::GET, path).send().await
    }

    pub async fn delete(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.request(reqwest::Method::DELETE, path).send().await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Response, reqwest::Error> {
        self.request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await
    }

    pub async fn patch_json(&self, path: &str, body: &Value) -> Result<Response, reqwest::Error> {
        self.request(reqwest::Method::PATCH, path)
            .json(body)
            .send()
            .await
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> Result<Response, reqwest::Error> {
        self.request(reqwest::Method::PUT, path)
            .json(body)
            .send()
            .await
    }

    /// POST with an arbitrary, possibly malformed, body
    pub async fn post_raw(&self, path: &str, body: &str) -> Result<Response, reqwest::Error> {
        self.request(reqwest::Method::POST, path)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
    }
}

/// `{"item": {"text": ...}}`
pub fn item_params(text: &str) -> Value {
    serde_json::json!({ "item": { "text": text } })
}

/// Assert a `303 See Other` to `location`
pub fn assert_redirect(response: &Response, location: &str) {
    assert_eq!(
        response.status(),
        StatusCode::SEE_OTHER,
        "Expected 303 redirect to {location}"
    );
    let actual = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("Redirect without Location header");
    assert_eq!(actual, location);
}

/// Assert the status and the presence of top-level JSON fields, returning the body
pub async fn assert_json_response(
    response: Response,
    expected_status: u16,
    expected_fields: &[&str],
) -> Result<Value, BoxError> {
    assert_eq!(response.status().as_u16(), expected_status);

    let json: Value = response.json().await?;
    for field in expected_fields {
        assert!(
            json.get(field).is_some(),
            "Missing expected field '{field}' in response: {json}"
        );
    }

    Ok(json)
}
