use time::Duration;

pub const DEFAULT_SESSION_TTL_DAYS: i64 = 7;
/// Upper bound for `TOKEN_TTL_DAYS`; keeps `now + ttl` well inside `OffsetDateTime`.
pub const MAX_SESSION_TTL_DAYS: i64 = 3650;

/// Token signing settings.
#[derive(Clone)]
pub struct SecurityConfig {
    /// Shared HMAC key used for both issuing and verifying.
    pub secret: Vec<u8>,
    /// Lifetime of tokens issued at login.
    pub session_ttl: Duration,
}

impl SecurityConfig {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            session_ttl: Duration::days(DEFAULT_SESSION_TTL_DAYS),
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }
}

// The key never appears in logs or panics.
impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("secret", &"<redacted>")
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}
