#![allow(dead_code)]

pub mod proptest_prelude;

use std::collections::BTreeMap;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use givetrack_backend::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use givetrack_backend::{issue_session, routes, AppState, Role, SecurityConfig};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};
use time::{Duration, OffsetDateTime};

pub const TEST_SECRET: &[u8] = b"test_secret_key_for_integration_tests";

// Logging is auto-installed for every test binary that includes this module.
#[ctor::ctor]
fn init_logging() {
    givetrack_test_support::logging::init();
}

pub fn security() -> SecurityConfig {
    SecurityConfig::new(TEST_SECRET)
}

pub fn state_without_db() -> AppState {
    AppState::without_db(security())
}

pub fn state_with(db: DatabaseConnection) -> AppState {
    AppState::new(db, security())
}

/// A mock Postgres connection that answers queries with `results` in order.
pub fn mock_db(results: Vec<Vec<BTreeMap<&'static str, Value>>>) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(results)
        .into_connection()
}

pub fn row<const N: usize>(pairs: [(&'static str, Value); N]) -> BTreeMap<&'static str, Value> {
    BTreeMap::from(pairs)
}

/// A fresh session token for `user_id`.
pub fn bearer(user_id: i64, role: Role) -> String {
    let token = issue_session(
        user_id,
        role,
        Duration::days(7),
        OffsetDateTime::now_utc(),
        TEST_SECRET,
    );
    format!("Bearer {token}")
}

/// The full route table behind the same middleware stack `main` installs.
pub async fn init_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await
}
