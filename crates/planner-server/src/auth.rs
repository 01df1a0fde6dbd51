//! Session authentication.
//!
//! Sign-in exchanges the configured password for a signed token set as an
//! http-only cookie. The token payload carries a hash of the password it
//! was minted under, so changing the password invalidates outstanding
//! sessions, plus an expiry timestamp. When no password is configured the
//! guard is a no-op and the API runs unauthenticated.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::api::AppState;
use crate::error::ApiError;

/// Sessions live this long before the cookie and token expire.
pub const SESSION_TTL_SECONDS: i64 = 8 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    /// Hash of the password the token was minted under.
    hash: String,
    /// Unix timestamp after which the token is rejected.
    exp: i64,
}

fn password_hash(password: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(password.as_bytes()))
}

fn sign(payload: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b".");
    hasher.update(payload.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Mints a `payload.signature` token bound to `password`.
pub fn issue_token(password: &str) -> String {
    let claims = SessionClaims {
        hash: password_hash(password),
        exp: Utc::now().timestamp() + SESSION_TTL_SECONDS,
    };
    let payload =
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).expect("claims always serialize"));
    let signature = sign(&payload, password);
    format!("{payload}.{signature}")
}

/// Checks signature, expiry and password binding.
pub fn verify_token(token: &str, password: &str) -> bool {
    let Some((payload, signature)) = token.split_once('.') else {
        return false;
    };
    if sign(payload, password) != signature {
        return false;
    }
    let Ok(raw) = URL_SAFE_NO_PAD.decode(payload) else {
        return false;
    };
    let Ok(claims) = serde_json::from_slice::<SessionClaims>(&raw) else {
        return false;
    };
    claims.hash == password_hash(password) && claims.exp > Utc::now().timestamp()
}

/// Middleware guarding task-mutating routes. With an empty configured
/// password every request passes through.
pub async fn require_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.config.password.is_empty() {
        return Ok(next.run(request).await);
    }

    let token = request
        .headers()
        .get(axum::http::header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(token_from_cookies);

    match token {
        Some(token) if verify_token(&token, &state.config.password) => Ok(next.run(request).await),
        _ => Err(ApiError::unauthorized("authentication required")),
    }
}

fn token_from_cookies(cookies: &str) -> Option<String> {
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == "token").then(|| value.to_string())
    })
}
