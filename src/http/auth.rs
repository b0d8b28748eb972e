//! HTTP Basic authentication gate.
//!
//! One static username/password pair guards every broker route. Both
//! halves are compared in constant time.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use subtle::ConstantTimeEq;

use crate::http::response::ApiError;

/// Challenge sent with every 401.
pub const BASIC_CHALLENGE: &str = r#"Basic realm="Authorization Required""#;

/// Error constructing the gate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("AUTH_USER and AUTH_PASS must be set")]
    MissingCredentials,
}

/// The accepted credential pair.
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    /// Build the gate. Both values must be non-empty.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, AuthError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        Ok(Self { username, password })
    }

    /// Check an `Authorization` header value.
    pub fn verify(&self, header_value: &str) -> bool {
        match parse_basic(header_value) {
            Some((user, pass)) => {
                let user_ok = user.as_bytes().ct_eq(self.username.as_bytes());
                let pass_ok = pass.as_bytes().ct_eq(self.password.as_bytes());
                (user_ok & pass_ok).into()
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Split `Basic <base64(user:pass)>` into its parts.
fn parse_basic(header_value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

/// Reject any request without matching Basic credentials.
pub async fn basic_auth_middleware(
    State(auth): State<Arc<BasicAuth>>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|value| auth.verify(value));

    if authorized {
        return next.run(request).await;
    }

    tracing::warn!(
        method = %request.method(),
        path = %request.uri().path(),
        "Rejected request without valid credentials"
    );
    ApiError::Unauthorized.into_response()
}
