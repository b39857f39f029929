// crates/studio-core/src/claims.rs
// ============================================================================
// Module: Studio Token Claims
// Description: Unverified decoding of the claims carried by session tokens.
// Purpose: Read server, username and expiry from a token without a round trip.
// Dependencies: base64, serde_json, time
// ============================================================================

//! ## Overview
//! Studio session tokens are JWT-shaped: `header.payload.signature`, with the
//! payload a base64url (unpadded) JSON object. The client reads the `server`,
//! `username` and `exp` claims locally to route requests and report session
//! details. No signature check happens here; the service remains the only
//! authority on whether a token is valid.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

use crate::errors::ClientError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header segment used when minting unsigned tokens.
const UNSIGNED_HEADER: &str = r#"{"alg":"none","typ":"JWT"}"#;

// ============================================================================
// SECTION: Claims
// ============================================================================

/// Claims read from a session token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Symbolic server name the token was issued for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    /// Account the token belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Expiry as unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Decodes the payload segment of a token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidParameters`] when the token is not
    /// three dot-separated segments or the payload is not base64url JSON.
    pub fn decode(token: &str) -> Result<Self, ClientError> {
        let mut segments = token.split('.');
        let (Some(_), Some(payload), Some(_), None) =
            (segments.next(), segments.next(), segments.next(), segments.next())
        else {
            return Err(ClientError::InvalidParameters("malformed token".to_string()));
        };
        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|err| ClientError::InvalidParameters(format!("token payload: {err}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|err| ClientError::InvalidParameters(format!("token claims: {err}")))
    }

    /// Encodes the claims into an unsigned token with the given signature segment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Internal`] when the claims cannot be serialized.
    pub fn encode_unsigned(&self, signature: &str) -> Result<String, ClientError> {
        let payload = serde_json::to_vec(self)
            .map_err(|err| ClientError::Internal(format!("token claims: {err}")))?;
        Ok(format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(UNSIGNED_HEADER),
            URL_SAFE_NO_PAD.encode(payload),
            signature
        ))
    }

    /// Returns the expiry as a timestamp, when present and representable.
    #[must_use]
    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        self.exp.and_then(|exp| OffsetDateTime::from_unix_timestamp(exp).ok())
    }
}
