/// Application state and router builder
///
/// This module defines the shared application state and provides a function
/// to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use linkdesk_api::{app::AppState, config::Config};
/// use linkdesk_shared::store::memory::MemoryStore;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let store = Arc::new(MemoryStore::new());
/// let state = AppState::new(store.clone(), store, config);
/// let app = linkdesk_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{security::SecurityHeadersLayer, session::session_gate},
    routes,
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use linkdesk_shared::auth::{token::TokenService, verifier::CredentialVerifier};
use linkdesk_shared::models::{Client, Prospect, Task, User};
use linkdesk_shared::store::{CredentialStore, DocumentStore};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Everything
/// inside is an Arc, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Document storage backend
    pub store: Arc<dyn DocumentStore>,

    /// Credential verification against the identity collection
    pub verifier: Arc<CredentialVerifier>,

    /// Session token issuance and verification
    pub tokens: Arc<TokenService>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state.
    ///
    /// In production both store arguments are the same `PgStore`; tests pass
    /// a shared `MemoryStore`.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        credentials: Arc<dyn CredentialStore>,
        config: Config,
    ) -> Self {
        Self {
            store,
            verifier: Arc::new(CredentialVerifier::new(credentials)),
            tokens: Arc::new(TokenService::new(&config.session.jwt_secret)),
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health              # Health check (public)
/// ├── /login               # POST: establish a session (public)
/// ├── /me                  # GET: resolve the current session
/// ├── /clients             # CRUD (session gate)
/// ├── /prospects           # CRUD (session gate)
/// ├── /tasks               # CRUD (session gate)
/// └── /users               # CRUD (session gate)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (innermost first):
/// 1. Session gate (protected prefixes only)
/// 2. Logging (tower-http TraceLayer)
/// 3. CORS (tower-http CorsLayer)
/// 4. Security headers
pub fn build_router(state: AppState) -> Router {
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/login", post(routes::auth::login))
        .route("/me", get(routes::auth::me))
        .nest("/clients", routes::resources::resource_routes::<Client>())
        .nest(
            "/prospects",
            routes::resources::resource_routes::<Prospect>(),
        )
        .nest("/tasks", routes::resources::resource_routes::<Task>())
        .nest("/users", routes::resources::resource_routes::<User>())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_gate,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
