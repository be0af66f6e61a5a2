//! Typed view of a verified claims set.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::token::Claims;
use crate::error::AppError;

pub const USER_ID_CLAIM: &str = "user_id";
pub const ROLE_CLAIM: &str = "role";
pub const PREV_LOGIN_CLAIM: &str = "prev_login";

/// Account role. Lower-case on the wire and in tokens, upper-case in the
/// `users.role` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Donor,
    Ngo,
    Admin,
}

impl Role {
    /// Case-insensitive parse of `donor`, `ngo` or `admin`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "donor" => Some(Self::Donor),
            "ngo" => Some(Self::Ngo),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Donor => "donor",
            Self::Ngo => "ngo",
            Self::Admin => "admin",
        }
    }

    pub const fn as_db_str(&self) -> &'static str {
        match self {
            Self::Donor => "DONOR",
            Self::Ngo => "NGO",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    /// `None` when the token carries a role this service does not know.
    pub role: Option<Role>,
    /// Previous login instant (unix seconds), when the issuer recorded one.
    pub prev_login: Option<i64>,
}

impl Principal {
    /// Build from verified claims. A missing or non-integer `user_id` is
    /// an authentication failure.
    pub fn from_claims(claims: &Claims) -> Result<Self, AppError> {
        let user_id = claims
            .get(USER_ID_CLAIM)
            .and_then(integer_claim)
            .ok_or_else(AppError::unauthorized_missing_user_id)?;

        let role = claims
            .get(ROLE_CLAIM)
            .and_then(Value::as_str)
            .and_then(Role::parse);

        let prev_login = claims.get(PREV_LOGIN_CLAIM).and_then(integer_claim);

        Ok(Self {
            user_id,
            role,
            prev_login,
        })
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }
}

/// Integers, or strings holding one (some clients stringify ids).
fn integer_claim(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
