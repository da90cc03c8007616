//! Bearer token claims.
//!
//! Tokens are JWTs; only the payload's `exp` claim is read, the signature is
//! the server's business.

use base64::Engine;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use serde::Deserialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has no payload segment")]
    MissingPayload,
    #[error("token payload is not valid base64url")]
    InvalidEncoding,
    #[error("token payload is not valid JSON: {0}")]
    InvalidClaims(String),
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Expiry, seconds since the Unix epoch
    #[serde(default)]
    pub exp: Option<i64>,
}

pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|p| !p.is_empty())
        .ok_or(TokenError::MissingPayload)?;

    // Some issuers keep the `=` padding.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| URL_SAFE.decode(payload))
        .map_err(|_| TokenError::InvalidEncoding)?;

    serde_json::from_slice(&bytes).map_err(|e| TokenError::InvalidClaims(e.to_string()))
}

/// True only when the token carries an `exp` claim that lies in the past.
///
/// Tokens without a readable expiry are left to the server to reject.
pub fn is_expired(token: &str, now_secs: i64) -> bool {
    match decode_claims(token) {
        Ok(TokenClaims { exp: Some(exp) }) => exp < now_secs,
        _ => false,
    }
}
