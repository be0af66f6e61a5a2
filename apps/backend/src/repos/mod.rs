//! Store access. Each function runs parameterized SQL against any
//! `ConnectionTrait` (pool or transaction) and decodes rows with
//! `FromQueryResult`.
//!
//! Numeric aggregates are cast to `float8`/`bigint` and timestamps to
//! `text` in SQL so row types stay independent of the column types the
//! external schema happens to use.

use sea_orm::{ConnectionTrait, DbBackend, FromQueryResult, Statement, Value};

use crate::error::AppError;

pub mod analytics;
pub mod dashboard;
pub mod donations;
pub mod donors;
pub mod ngos;
pub mod platform;
pub mod users;
pub mod utilizations;

pub(crate) fn pg(sql: &str, values: Vec<Value>) -> Statement {
    Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
}

#[derive(Debug, FromQueryResult)]
pub(crate) struct IdRow {
    pub id: i64,
}

#[derive(Debug, FromQueryResult)]
pub(crate) struct TotalRow {
    pub total: f64,
}

#[derive(Debug, FromQueryResult)]
pub(crate) struct CountRow {
    pub count: i64,
}

pub(crate) async fn fetch_id<C: ConnectionTrait>(
    conn: &C,
    stmt: Statement,
) -> Result<Option<i64>, AppError> {
    Ok(IdRow::find_by_statement(stmt)
        .one(conn)
        .await?
        .map(|r| r.id))
}

/// Single `total` column; no row reads as zero.
pub(crate) async fn fetch_total<C: ConnectionTrait>(
    conn: &C,
    stmt: Statement,
) -> Result<f64, AppError> {
    Ok(TotalRow::find_by_statement(stmt)
        .one(conn)
        .await?
        .map_or(0.0, |r| r.total))
}

/// Single `count` column; no row reads as zero.
pub(crate) async fn fetch_count<C: ConnectionTrait>(
    conn: &C,
    stmt: Statement,
) -> Result<i64, AppError> {
    Ok(CountRow::find_by_statement(stmt)
        .one(conn)
        .await?
        .map_or(0, |r| r.count))
}
