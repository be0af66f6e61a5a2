use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::error::AppError;

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    /// `None` only in tests that never touch the store.
    pub db: Option<DatabaseConnection>,
    pub security: SecurityConfig,
    pub app_version: &'static str,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db: Some(db),
            security,
            app_version: env!("CARGO_PKG_VERSION"),
        }
    }

    pub fn without_db(security: SecurityConfig) -> Self {
        Self {
            db: None,
            security,
            app_version: env!("CARGO_PKG_VERSION"),
        }
    }

    pub fn require_db(&self) -> Result<&DatabaseConnection, AppError> {
        self.db.as_ref().ok_or_else(AppError::db_unavailable)
    }
}
