use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::infra::db::connect_db;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

enum DbSource {
    None,
    Url(String),
    Connection(DatabaseConnection),
}

/// Builder for `AppState`, shared by `main` and tests.
pub struct StateBuilder {
    security_config: SecurityConfig,
    db: DbSource,
}

impl StateBuilder {
    pub fn new(security_config: SecurityConfig) -> Self {
        Self {
            security_config,
            db: DbSource::None,
        }
    }

    /// Connect to `database_url` at build time.
    pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.db = DbSource::Url(database_url.into());
        self
    }

    /// Use an existing connection (e.g. a `MockDatabase` in tests).
    pub fn with_connection(mut self, conn: DatabaseConnection) -> Self {
        self.db = DbSource::Connection(conn);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        match self.db {
            DbSource::None => Ok(AppState::without_db(self.security_config)),
            DbSource::Url(url) => {
                let conn = connect_db(&url).await?;
                Ok(AppState::new(conn, self.security_config))
            }
            DbSource::Connection(conn) => Ok(AppState::new(conn, self.security_config)),
        }
    }
}

pub fn build_state(security_config: SecurityConfig) -> StateBuilder {
    StateBuilder::new(security_config)
}
