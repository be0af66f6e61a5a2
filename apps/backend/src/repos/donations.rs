//! `donations` table, joined with utilization totals.

use sea_orm::{ConnectionTrait, FromQueryResult};

use super::pg;
use crate::error::AppError;

/// A donation with the sum utilized against it.
#[derive(Debug, Clone, FromQueryResult)]
pub struct DonationUtilizationRow {
    pub donation_id: i64,
    pub donor_name: Option<String>,
    pub ngo_name: Option<String>,
    pub amount: f64,
    pub amount_utilized: f64,
    pub purpose: Option<String>,
    pub donated_at: Option<String>,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct CreatedDonation {
    pub donation_id: i64,
    pub donated_at: String,
}

const UTILIZATION_COLUMNS: &str = "\
    SELECT d.donation_id::bigint AS donation_id, \
           COALESCE(dn.name, 'Anonymous') AS donor_name, \
           COALESCE(n.name, 'Unknown NGO') AS ngo_name, \
           COALESCE(d.amount, 0)::float8 AS amount, \
           COALESCE(SUM(u.amount_utilized), 0)::float8 AS amount_utilized, \
           d.purpose, d.donated_at::text AS donated_at \
    FROM donations d \
    LEFT JOIN donors dn ON d.donor_id = dn.donor_id \
    LEFT JOIN ngos n ON d.ngo_id = n.ngo_id \
    LEFT JOIN utilizations u ON d.donation_id = u.donation_id";

const UTILIZATION_GROUPING: &str = "\
    GROUP BY d.donation_id, dn.name, n.name, d.amount, d.donated_at, d.purpose \
    ORDER BY d.donated_at DESC";

/// Donations received by `ngo_id`, or by every NGO when `None`.
pub async fn list_with_utilization<C: ConnectionTrait>(
    conn: &C,
    ngo_id: Option<i64>,
) -> Result<Vec<DonationUtilizationRow>, AppError> {
    let stmt = match ngo_id {
        Some(id) => pg(
            &format!("{UTILIZATION_COLUMNS} WHERE d.ngo_id = $1 {UTILIZATION_GROUPING}"),
            vec![id.into()],
        ),
        None => pg(
            &format!("{UTILIZATION_COLUMNS} {UTILIZATION_GROUPING}"),
            vec![],
        ),
    };
    Ok(DonationUtilizationRow::find_by_statement(stmt)
        .all(conn)
        .await?)
}

/// Donations made by `donor_id`, optionally only those to `ngo_id`.
pub async fn list_for_donor<C: ConnectionTrait>(
    conn: &C,
    donor_id: i64,
    ngo_id: Option<i64>,
) -> Result<Vec<DonationUtilizationRow>, AppError> {
    let stmt = match ngo_id {
        Some(ngo_id) => pg(
            &format!(
                "{UTILIZATION_COLUMNS} WHERE d.donor_id = $1 AND d.ngo_id = $2 {UTILIZATION_GROUPING}"
            ),
            vec![donor_id.into(), ngo_id.into()],
        ),
        None => pg(
            &format!("{UTILIZATION_COLUMNS} WHERE d.donor_id = $1 {UTILIZATION_GROUPING}"),
            vec![donor_id.into()],
        ),
    };
    Ok(DonationUtilizationRow::find_by_statement(stmt)
        .all(conn)
        .await?)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    donor_id: i64,
    ngo_id: i64,
    amount: f64,
    purpose: &str,
) -> Result<CreatedDonation, AppError> {
    let stmt = pg(
        "INSERT INTO donations (donor_id, ngo_id, amount, purpose, donated_at) \
         VALUES ($1, $2, $3, $4, CURRENT_TIMESTAMP) \
         RETURNING donation_id::bigint AS donation_id, donated_at::text AS donated_at",
        vec![donor_id.into(), ngo_id.into(), amount.into(), purpose.into()],
    );
    CreatedDonation::find_by_statement(stmt)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::internal("INSERT INTO donations returned no row"))
}
