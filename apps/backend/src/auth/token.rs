//! Compact HS256 bearer tokens.
//!
//! Wire format (standard compact JWS):
//!
//! ```text
//! b64url({"alg":"HS256","typ":"JWT"}) "." b64url(claims) "." b64url(HMAC-SHA256(secret, part1 "." part2))
//! ```
//!
//! Base64url is RFC 4648 §5 without padding. The signing algorithm is fixed;
//! the header is checked for well-formedness on verification but its `alg`
//! field is never consulted.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::OffsetDateTime;

type HmacSha256 = Hmac<Sha256>;

/// Claims carried by a token, in the order the caller supplied them.
pub type Claims = Map<String, Value>;

/// Serialized header. Kept as a literal so the first segment is byte-stable.
const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Claim interpreted by the codec itself (unix seconds).
pub const EXPIRY_CLAIM: &str = "exp";

/// Why a token was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is not three non-empty dot-separated segments")]
    MalformedToken,

    #[error("token header or payload is not base64url-encoded JSON")]
    MalformedPayload,

    #[error("token signature does not match")]
    InvalidSignature,

    #[error("token expired")]
    TokenExpired,
}

/// Sign `claims` with `secret` and return the compact token.
pub fn issue(claims: &Claims, secret: &[u8]) -> String {
    let header_b64 = URL_SAFE_NO_PAD.encode(HEADER_JSON);
    // A JSON map always serializes; Display on Value is compact.
    let payload_b64 = URL_SAFE_NO_PAD.encode(Value::Object(claims.clone()).to_string());

    let signature = sign(secret, &header_b64, &payload_b64);
    let signature_b64 = URL_SAFE_NO_PAD.encode(signature);

    format!("{header_b64}.{payload_b64}.{signature_b64}")
}

/// Verify `token` against `secret` using the current wall clock.
pub fn verify(token: &str, secret: &[u8]) -> Result<Claims, TokenError> {
    verify_at(token, secret, OffsetDateTime::now_utc().unix_timestamp())
}

/// Verify `token` against `secret` as of `now` (unix seconds).
///
/// Checks run in a fixed order: shape, signature, payload decoding, expiry.
pub fn verify_at(token: &str, secret: &[u8], now: i64) -> Result<Claims, TokenError> {
    let (header_b64, payload_b64, signature_b64) = split_segments(token)?;

    let provided = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| TokenError::InvalidSignature)?;
    let expected = sign(secret, header_b64, payload_b64);

    // Slices of different lengths compare unequal without early exit.
    if !bool::from(expected.as_slice().ct_eq(provided.as_slice())) {
        return Err(TokenError::InvalidSignature);
    }

    decode_object(header_b64)?;
    let claims = decode_object(payload_b64)?;

    if let Some(exp) = claims.get(EXPIRY_CLAIM) {
        let exp = expiry_seconds(exp).ok_or(TokenError::MalformedPayload)?;
        if now > exp {
            return Err(TokenError::TokenExpired);
        }
    }

    Ok(claims)
}

fn split_segments(token: &str) -> Result<(&str, &str, &str), TokenError> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None)
            if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
        {
            Ok((header, payload, signature))
        }
        _ => Err(TokenError::MalformedToken),
    }
}

fn sign(secret: &[u8], header_b64: &str, payload_b64: &str) -> [u8; 32] {
    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length");
    mac.update(header_b64.as_bytes());
    mac.update(b".");
    mac.update(payload_b64.as_bytes());

    let mut output = [0u8; 32];
    output.copy_from_slice(&mac.finalize().into_bytes());
    output
}

fn decode_object(segment: &str) -> Result<Claims, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::MalformedPayload)?;
    serde_json::from_slice::<Claims>(&bytes).map_err(|_| TokenError::MalformedPayload)
}

/// Integer seconds; fractional values are truncated.
fn expiry_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        _ => None,
    }
}
