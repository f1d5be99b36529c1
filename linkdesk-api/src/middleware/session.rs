/// Session gate middleware
///
/// Requests whose path falls under a configured protected prefix must carry
/// a valid session cookie. The gate fails closed: a missing cookie and a
/// cookie that does not verify are treated identically, and both produce a
/// temporary redirect to `/login`. Verified claims are inserted into request
/// extensions for downstream handlers. Paths outside the protected prefixes
/// pass through untouched.
///
/// No session state is retained between requests; the cookie is the session.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use linkdesk_shared::auth::token::TOKEN_TTL_SECONDS;

use crate::app::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Session gate middleware layer
///
/// Installed on the whole router so prefix matching sees full request paths.
pub async fn session_gate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let protected = path_is_protected(req.uri().path(), &state.config.session.protected_paths);

    if !protected {
        return next.run(req).await;
    }

    let claims = cookie_value(req.headers(), SESSION_COOKIE)
        .and_then(|token| state.tokens.verify(token));

    match claims {
        Some(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        None => {
            tracing::debug!(path = %req.uri().path(), "unauthenticated request, redirecting");
            Redirect::temporary("/login").into_response()
        }
    }
}

/// Returns true if the path equals a protected prefix or sits below it.
///
/// A prefix matches on a segment boundary only, so `/clients` guards
/// `/clients` and `/clients/123` but not `/clientsfoo`.
pub fn path_is_protected(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| {
        path.strip_prefix(prefix.as_str())
            .map_or(false, |rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Extracts a cookie value from the `Cookie` request header.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
}

/// Builds the `Set-Cookie` value establishing a session.
///
/// `HttpOnly` keeps the token away from scripts; `Max-Age` matches the token
/// lifetime so the cookie and the token expire together. `Secure` is added
/// in production mode.
pub fn session_cookie(token: &str, production: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        SESSION_COOKIE, token, TOKEN_TTL_SECONDS
    );
    if production {
        cookie.push_str("; Secure");
    }
    cookie
}
