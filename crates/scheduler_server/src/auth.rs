//! Password-derived session token and request guard.
//!
//! # Responsibility
//! - Issue the HS256 JWT (empty claims) signed with the configured password.
//! - Reject API requests whose `token` cookie does not carry that JWT.
//!
//! # Invariants
//! - Without a configured password every request passes.
//! - Tokens carry no expiry; changing the password invalidates them.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const TOKEN_COOKIE: &str = "token";

/// Session claims; serialized as `{}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionClaims {}

/// Builds the session token for `password`.
pub fn issue_token(password: &str) -> jsonwebtoken::errors::Result<String> {
    encode(
        &Header::new(Algorithm::HS256),
        &SessionClaims::default(),
        &EncodingKey::from_secret(password.as_bytes()),
    )
}

/// Returns whether `token` is the session token for `password`.
pub fn verify_token(password: &str, token: &str) -> bool {
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(password.as_bytes()),
        &session_validation(),
    )
    .is_ok()
}

/// Middleware guarding `/api/*` routes when a password is configured.
pub async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(password) = state.password() {
        let authorized =
            cookie_value(request.headers(), TOKEN_COOKIE).is_some_and(|token| {
                verify_token(password, token)
            });
        if !authorized {
            warn!(
                "event=auth_check module=server status=rejected path={}",
                request.uri().path()
            );
            return Err(ApiError::Unauthorized("authentication required".to_string()));
        }
    }

    Ok(next.run(request).await)
}

fn session_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims = HashSet::new();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation
}

fn cookie_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}
