//! Error codes for the GiveTrack API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Every code is SCREAMING_SNAKE_CASE and maps 1:1 to the string that
//! appears in the `code` field of a problem-details response.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Token failed shape, signature or payload checks
    UnauthorizedInvalidJwt,
    /// Token `exp` is in the past
    UnauthorizedExpiredJwt,
    /// Verified token carries no usable `user_id`
    UnauthorizedMissingUserId,
    /// Email/password/role combination did not match
    InvalidCredentials,
    /// Caller's role cannot use this endpoint
    Forbidden,

    // Request validation
    InvalidEmail,
    InvalidRole,
    InvalidAmount,
    MissingField,
    ValidationError,
    BadRequest,

    // Not found
    DonorNotFound,
    NgoNotFound,
    NotFound,

    // Conflicts
    UniqueEmail,
    UniqueViolation,
    FkViolation,
    Conflict,

    // System
    DbError,
    DbUnavailable,
    Internal,
    ConfigError,
}

impl ErrorCode {
    /// The exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::UnauthorizedMissingUserId => "UNAUTHORIZED_MISSING_USER_ID",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",

            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidRole => "INVALID_ROLE",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::MissingField => "MISSING_FIELD",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::DonorNotFound => "DONOR_NOT_FOUND",
            Self::NgoNotFound => "NGO_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::UniqueEmail => "UNIQUE_EMAIL",
            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::FkViolation => "FK_VIOLATION",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(ErrorCode::NgoNotFound.to_string(), "NGO_NOT_FOUND");
        assert_eq!(
            ErrorCode::UnauthorizedExpiredJwt.to_string(),
            ErrorCode::UnauthorizedExpiredJwt.as_str()
        );
    }
}
