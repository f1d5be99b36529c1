/// Common test utilities for integration tests
///
/// Runs the full request path against an in-memory store, so no database or
/// external service is needed:
/// - test configuration and app construction
/// - seeded login identity with a real Argon2id hash
/// - request builders and body helpers

use axum::body::Body;
use axum::http::{header, Request, Response};
use linkdesk_api::app::{build_router, AppState};
use linkdesk_api::config::{ApiConfig, Config, DatabaseConfig, SessionConfig};
use linkdesk_api::middleware::session::session_cookie;
use linkdesk_shared::auth::password::hash_password;
use linkdesk_shared::auth::token::{Claims, TokenService};
use linkdesk_shared::store::memory::MemoryStore;
use linkdesk_shared::store::DocumentStore;
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_EMAIL: &str = "ana@example.com";
pub const TEST_PASSWORD: &str = "correct horse battery staple";
pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: axum::Router,
    pub store: Arc<MemoryStore>,
    pub tokens: TokenService,
    pub user_id: Uuid,
}

impl TestContext {
    /// Creates a new test context with one seeded identity.
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());

        let doc = store
            .insert(
                "users",
                json!({
                    "name": "Ana",
                    "email": TEST_EMAIL,
                    "role": "admin",
                    "password": hash_password(TEST_PASSWORD).unwrap(),
                }),
            )
            .await
            .unwrap();

        let state = AppState::new(store.clone(), store.clone(), test_config());
        let app = build_router(state);

        TestContext {
            app,
            store,
            tokens: TokenService::new(TEST_SECRET),
            user_id: doc.id,
        }
    }

    /// A valid session cookie for the seeded identity.
    pub fn valid_cookie(&self) -> String {
        let claims = Claims::new(self.user_id, TEST_EMAIL, "admin");
        session_cookie(&self.tokens.issue(&claims).unwrap(), false)
    }

    /// A session cookie whose token expired one second ago.
    pub fn expired_cookie(&self) -> String {
        let claims = Claims::expiring_in(
            self.user_id,
            TEST_EMAIL,
            "admin",
            chrono::Duration::seconds(-1),
        );
        session_cookie(&self.tokens.issue(&claims).unwrap(), false)
    }
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 1,
        },
        session: SessionConfig {
            jwt_secret: TEST_SECRET.to_string(),
            protected_paths: ["/clients", "/prospects", "/tasks", "/users"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        },
    }
}

/// Builds a JSON request, optionally carrying a session cookie.
pub fn request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<JsonValue>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(cookie) = cookie {
        // Only the name=value pair travels back on requests.
        let pair = cookie.split(';').next().unwrap();
        builder = builder.header(header::COOKIE, pair);
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Reads a response body as JSON.
pub async fn body_json(response: Response<Body>) -> JsonValue {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
