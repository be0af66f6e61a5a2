//! Process configuration, read once from the environment at startup.
//!
//! | Variable | Default |
//! |---|---|
//! | `BACKEND_HOST` | `0.0.0.0` |
//! | `BACKEND_PORT` | `5000` |
//! | `SECRET_KEY` | required, non-empty |
//! | `DATABASE_URL` | required |
//! | `TOKEN_TTL_DAYS` | `7`, between 1 and 3650 |
//! | `CORS_ALLOWED_ORIGINS` | comma-separated, empty means local dev origins |

use std::env;

use time::Duration;

use crate::error::AppError;
use crate::state::security_config::{
    SecurityConfig, DEFAULT_SESSION_TTL_DAYS, MAX_SESSION_TTL_DAYS,
};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub secret_key: String,
    pub database_url: String,
    pub token_ttl_days: i64,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let port = match env::var("BACKEND_PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AppError::config(format!("BACKEND_PORT must be a valid port number, got '{raw}'"))
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let secret_key = must_var("SECRET_KEY")?;
        if secret_key.is_empty() {
            return Err(AppError::config("SECRET_KEY must not be empty"));
        }

        let database_url = must_var("DATABASE_URL")?;

        let token_ttl_days = match env::var("TOKEN_TTL_DAYS") {
            Ok(raw) => match raw.trim().parse::<i64>() {
                Ok(days) if (1..=MAX_SESSION_TTL_DAYS).contains(&days) => days,
                _ => {
                    return Err(AppError::config(format!(
                        "TOKEN_TTL_DAYS must be a whole number of days between 1 and \
                         {MAX_SESSION_TTL_DAYS}, got '{raw}'"
                    )))
                }
            },
            Err(_) => DEFAULT_SESSION_TTL_DAYS,
        };

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "null")
            .map(str::to_string)
            .collect();

        Ok(Self {
            host,
            port,
            secret_key,
            database_url,
            token_ttl_days,
            cors_allowed_origins,
        })
    }

    pub fn security(&self) -> SecurityConfig {
        SecurityConfig::new(self.secret_key.as_bytes())
            .with_session_ttl(Duration::days(self.token_ttl_days))
    }
}

// Neither the signing key nor database credentials belong in logs.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secret_key", &"<redacted>")
            .field("database_url", &"<redacted>")
            .field("token_ttl_days", &self.token_ttl_days)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}

#[cfg(test)]
mod tests {
    use std::env;

    use serial_test::serial;

    use super::*;
    use crate::errors::ErrorCode;

    const VARS: [&str; 6] = [
        "BACKEND_HOST",
        "BACKEND_PORT",
        "SECRET_KEY",
        "DATABASE_URL",
        "TOKEN_TTL_DAYS",
        "CORS_ALLOWED_ORIGINS",
    ];

    fn clear_env() {
        for v in VARS {
            env::remove_var(v);
        }
    }

    fn set_required() {
        env::set_var("SECRET_KEY", "s3cret");
        env::set_var("DATABASE_URL", "postgresql://app:pw@localhost:5432/givetrack");
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        set_required();

        let cfg = AppConfig::from_env().unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.token_ttl_days, 7);
        assert!(cfg.cors_allowed_origins.is_empty());
        assert_eq!(cfg.security().session_ttl, Duration::days(7));
        assert_eq!(cfg.security().secret, b"s3cret".to_vec());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_missing_secret_is_config_error() {
        clear_env();
        env::set_var("DATABASE_URL", "postgresql://localhost/givetrack");

        let err = AppConfig::from_env().unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigError);

        env::set_var("SECRET_KEY", "");
        assert!(AppConfig::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_and_ttl() {
        clear_env();
        set_required();

        env::set_var("BACKEND_PORT", "not-a-port");
        assert!(AppConfig::from_env().is_err());
        env::remove_var("BACKEND_PORT");

        env::set_var("TOKEN_TTL_DAYS", "0");
        assert!(AppConfig::from_env().is_err());
        env::set_var("TOKEN_TTL_DAYS", "30");
        assert_eq!(AppConfig::from_env().unwrap().token_ttl_days, 30);

        for too_long in ["3651", "10000000", "1000000000000000"] {
            env::set_var("TOKEN_TTL_DAYS", too_long);
            let err = AppConfig::from_env().unwrap_err();
            assert_eq!(err.code(), ErrorCode::ConfigError, "ttl {too_long}");
        }

        env::set_var("TOKEN_TTL_DAYS", "3650");
        let cfg = AppConfig::from_env().unwrap();
        let token = crate::auth::issue_session(
            1,
            crate::auth::Role::Donor,
            cfg.security().session_ttl,
            time::OffsetDateTime::now_utc(),
            b"k",
        );
        assert_eq!(token.split('.').count(), 3);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_cors_origins_are_split_and_trimmed() {
        clear_env();
        set_required();
        env::set_var(
            "CORS_ALLOWED_ORIGINS",
            "http://localhost:3000, https://givetrack.app ,,null",
        );

        let cfg = AppConfig::from_env().unwrap();
        assert_eq!(
            cfg.cors_allowed_origins,
            vec!["http://localhost:3000", "https://givetrack.app"]
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_debug_redacts_secrets() {
        clear_env();
        set_required();

        let rendered = format!("{:?}", AppConfig::from_env().unwrap());
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("pw@"));

        clear_env();
    }
}
