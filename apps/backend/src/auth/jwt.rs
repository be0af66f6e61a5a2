//! Session tokens: the claims this service issues at login and reads back
//! from bearer credentials.

use serde_json::Value;
use time::{Duration, OffsetDateTime};

use crate::auth::claims::{Principal, Role, ROLE_CLAIM, USER_ID_CLAIM};
use crate::auth::token::{self, Claims, EXPIRY_CLAIM};
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Issue a session token with claims `{user_id, role, exp}` in that order,
/// `exp = now + ttl`.
pub fn issue_session(
    user_id: i64,
    role: Role,
    ttl: Duration,
    now: OffsetDateTime,
    secret: &[u8],
) -> String {
    let mut claims = Claims::new();
    claims.insert(USER_ID_CLAIM.to_string(), Value::from(user_id));
    claims.insert(ROLE_CLAIM.to_string(), Value::from(role.as_str()));
    claims.insert(
        EXPIRY_CLAIM.to_string(),
        Value::from((now + ttl).unix_timestamp()),
    );
    token::issue(&claims, secret)
}

/// Verify a bearer credential and resolve the caller.
pub fn verify_session(token: &str, security: &SecurityConfig) -> Result<Principal, AppError> {
    let claims = token::verify(token, &security.secret)?;
    Principal::from_claims(&claims)
}
