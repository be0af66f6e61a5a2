//! Queries behind the NGO dashboard.

use sea_orm::{ConnectionTrait, FromQueryResult};
use serde::Serialize;

use super::{fetch_count, fetch_total, pg};
use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NgoTotals {
    pub total_donations: f64,
    pub utilized_funds: f64,
    pub active_donors: i64,
    pub active_projects: i64,
    /// Sum utilized before the most recent utilization entry.
    pub utilized_before_latest: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SinceLastLogin {
    pub donations: i64,
    pub new_donors: i64,
}

#[derive(Debug, Clone, FromQueryResult, Serialize)]
pub struct RecentDonationRow {
    pub donation_id: i64,
    pub donor: Option<String>,
    pub amount: f64,
    pub date: Option<String>,
    pub purpose: Option<String>,
    pub project_id: Option<i64>,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct NotificationRow {
    pub notification_id: i64,
    pub kind: Option<String>,
    pub message: Option<String>,
    pub created_at: Option<String>,
    pub is_read: Option<bool>,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct ActiveProjectRow {
    pub project_id: i64,
    pub name: Option<String>,
    pub budget: f64,
    pub amount_utilized: f64,
    pub donors_count: i64,
}

pub async fn totals<C: ConnectionTrait>(conn: &C, ngo_id: i64) -> Result<NgoTotals, AppError> {
    let total_donations = fetch_total(
        conn,
        pg(
            "SELECT COALESCE(SUM(amount), 0)::float8 AS total FROM donations WHERE ngo_id = $1",
            vec![ngo_id.into()],
        ),
    )
    .await?;

    let utilized_funds = fetch_total(
        conn,
        pg(
            "SELECT COALESCE(SUM(amount_utilized), 0)::float8 AS total \
             FROM utilizations WHERE ngo_id = $1",
            vec![ngo_id.into()],
        ),
    )
    .await?;

    let active_donors = fetch_count(
        conn,
        pg(
            "SELECT COUNT(DISTINCT donor_id)::bigint AS count FROM donations WHERE ngo_id = $1",
            vec![ngo_id.into()],
        ),
    )
    .await?;

    let active_projects = fetch_count(
        conn,
        pg(
            "SELECT COUNT(*)::bigint AS count FROM projects \
             WHERE ngo_id = $1 AND status = 'ACTIVE'",
            vec![ngo_id.into()],
        ),
    )
    .await?;

    let utilized_before_latest = fetch_total(
        conn,
        pg(
            "SELECT COALESCE(SUM(amount_utilized), 0)::float8 AS total \
             FROM utilizations \
             WHERE ngo_id = $1 \
               AND utilized_at < (SELECT MAX(utilized_at) FROM utilizations WHERE ngo_id = $1)",
            vec![ngo_id.into()],
        ),
    )
    .await?;

    Ok(NgoTotals {
        total_donations,
        utilized_funds,
        active_donors,
        active_projects,
        utilized_before_latest,
    })
}

/// Activity after `prev_login` (unix seconds).
pub async fn since_last_login<C: ConnectionTrait>(
    conn: &C,
    ngo_id: i64,
    prev_login: i64,
) -> Result<SinceLastLogin, AppError> {
    let donations = fetch_count(
        conn,
        pg(
            "SELECT COUNT(*)::bigint AS count FROM donations \
             WHERE ngo_id = $1 AND donated_at > to_timestamp($2)",
            vec![ngo_id.into(), prev_login.into()],
        ),
    )
    .await?;

    let new_donors = fetch_count(
        conn,
        pg(
            "SELECT COUNT(DISTINCT donor_id)::bigint AS count FROM donations \
             WHERE ngo_id = $1 AND donated_at > to_timestamp($2)",
            vec![ngo_id.into(), prev_login.into()],
        ),
    )
    .await?;

    Ok(SinceLastLogin {
        donations,
        new_donors,
    })
}

pub async fn recent_donations<C: ConnectionTrait>(
    conn: &C,
    ngo_id: i64,
) -> Result<Vec<RecentDonationRow>, AppError> {
    let stmt = pg(
        "SELECT d.donation_id::bigint AS donation_id, dn.name AS donor, \
                COALESCE(d.amount, 0)::float8 AS amount, d.donated_at::text AS date, \
                d.purpose, pd.project_id::bigint AS project_id \
         FROM donations d \
         LEFT JOIN donors dn ON d.donor_id = dn.donor_id \
         LEFT JOIN project_donations pd ON d.donation_id = pd.donation_id \
         WHERE d.ngo_id = $1 \
         ORDER BY d.donated_at DESC \
         LIMIT 10",
        vec![ngo_id.into()],
    );
    Ok(RecentDonationRow::find_by_statement(stmt).all(conn).await?)
}

pub async fn notifications<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<NotificationRow>, AppError> {
    let stmt = pg(
        "SELECT notification_id::bigint AS notification_id, type AS kind, message, \
                created_at::text AS created_at, is_read \
         FROM notifications \
         WHERE user_id = $1 \
         ORDER BY created_at DESC \
         LIMIT 5",
        vec![user_id.into()],
    );
    Ok(NotificationRow::find_by_statement(stmt).all(conn).await?)
}

pub async fn active_projects<C: ConnectionTrait>(
    conn: &C,
    ngo_id: i64,
) -> Result<Vec<ActiveProjectRow>, AppError> {
    let stmt = pg(
        "SELECT p.project_id::bigint AS project_id, p.name, \
                COALESCE(p.budget, 0)::float8 AS budget, \
                COALESCE(SUM(u.amount_utilized), 0)::float8 AS amount_utilized, \
                COUNT(DISTINCT pd.donation_id)::bigint AS donors_count \
         FROM projects p \
         LEFT JOIN project_donations pd ON p.project_id = pd.project_id \
         LEFT JOIN utilizations u ON pd.donation_id = u.donation_id \
         WHERE p.ngo_id = $1 AND p.status = 'ACTIVE' \
         GROUP BY p.project_id, p.name, p.budget",
        vec![ngo_id.into()],
    );
    Ok(ActiveProjectRow::find_by_statement(stmt).all(conn).await?)
}
