//! Bearer token authentication extractor.
//!
//! The API is guarded by a single shared secret: the `Authorization`
//! header must be exactly `Bearer <configured token>`. Missing header,
//! wrong scheme, and wrong token all fail the same way, with a 403 and
//! `{"detail": "Could not validate credentials"}`.
//!
//! # Example
//!
//! ```ignore
//! async fn protected(_auth: RequireBearer) -> &'static str {
//!     "hello"
//! }
//! ```

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::ApiError;
use crate::state::AppState;

const CREDENTIALS_MESSAGE: &str = "Could not validate credentials";

/// Axum extractor that rejects requests without a valid bearer credential.
///
/// Add it as a handler argument to gate the route; the handler body only
/// runs after the token has been checked against the configured secret.
pub struct RequireBearer;

impl<S> FromRequestParts<S> for RequireBearer
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "));

        match token {
            Some(token) if !state.auth.bearer_token.is_empty() && token == state.auth.bearer_token => {
                Ok(RequireBearer)
            }
            _ => {
                tracing::debug!(path = %parts.uri.path(), "bearer credential rejected");
                Err(ApiError::authentication(CREDENTIALS_MESSAGE))
            }
        }
    }
}
