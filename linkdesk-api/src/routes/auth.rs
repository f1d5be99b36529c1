/// Session endpoints
///
/// - `POST /login` - verify credentials and establish a session cookie
/// - `GET /me` - resolve the current session back to its identity
///
/// Login failures are uniform: unknown email, missing stored hash, and a
/// wrong password all produce the same 401 body, so the endpoint cannot be
/// used to probe which emails exist.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use linkdesk_shared::auth::token::Claims;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::session::{cookie_value, session_cookie, SESSION_COOKIE},
};

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: String,

    /// Password
    pub password: String,
}

/// Current-session response
#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    /// Identity id
    pub id: String,

    /// Display name, if the identity has one
    pub name: Option<String>,

    /// Email address
    pub email: String,
}

/// Login handler
///
/// # Endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "..." }
/// ```
///
/// On success: `200 {"ok": true}` plus a `Set-Cookie` establishing the
/// session. On failure: `401 {"error": "Invalid email or password"}`.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let identity = state.verifier.verify(&req.email, &req.password).await?;

    let claims = Claims::new(identity.id, &identity.email, &identity.role);
    let token = state
        .tokens
        .issue(&claims)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(user = %identity.id, "login succeeded");

    let cookie = session_cookie(&token, state.config.api.production);
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(json!({ "ok": true })),
    ))
}

/// Current-session handler
///
/// Verifies the session cookie itself rather than going through the gate:
/// an API caller probing its session wants a 401, not a redirect. The
/// subject is re-resolved against the credential store on every call, so a
/// token minted for a since-deleted identity is rejected even though its
/// signature still verifies.
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<MeResponse>> {
    let claims = cookie_value(&headers, SESSION_COOKIE)
        .and_then(|token| state.tokens.verify(token))
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    let identity = state
        .verifier
        .resolve(claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    Ok(Json(MeResponse {
        id: identity.id.to_string(),
        name: identity.name,
        email: identity.email,
    }))
}
