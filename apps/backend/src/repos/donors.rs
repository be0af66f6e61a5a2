//! `donors` table.

use sea_orm::{ConnectionTrait, FromQueryResult};

use super::{fetch_id, pg};
use crate::error::AppError;

#[derive(Debug, Clone, FromQueryResult)]
pub struct DonorRow {
    pub donor_id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<String>,
}

/// A donor giving to one NGO, with totals for that NGO only.
#[derive(Debug, Clone, FromQueryResult)]
pub struct DonorContributionRow {
    pub donor_id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<String>,
    pub donation_count: i64,
    pub total_contributions: f64,
    pub last_donation: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DonorProfileUpdate {
    pub name: String,
    pub phone: String,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub pan_number: Option<String>,
    pub aadhaar_number: Option<String>,
}

pub async fn find_id_by_user<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
) -> Result<Option<i64>, AppError> {
    fetch_id(
        conn,
        pg(
            "SELECT donor_id::bigint AS id FROM donors WHERE user_id = $1",
            vec![user_id.into()],
        ),
    )
    .await
}

pub async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    donor_id: i64,
) -> Result<Option<DonorRow>, AppError> {
    let stmt = pg(
        "SELECT donor_id::bigint AS donor_id, name, email, phone, created_at::text AS created_at \
         FROM donors WHERE donor_id = $1",
        vec![donor_id.into()],
    );
    Ok(DonorRow::find_by_statement(stmt).one(conn).await?)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    name: Option<&str>,
    email: &str,
) -> Result<(), AppError> {
    conn.execute(pg(
        "INSERT INTO donors (user_id, name, email) VALUES ($1, $2, $3)",
        vec![user_id.into(), name.map(str::to_string).into(), email.into()],
    ))
    .await?;
    Ok(())
}

/// Returns the number of rows touched (0 when the user has no donor row).
pub async fn update_profile<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    profile: &DonorProfileUpdate,
) -> Result<u64, AppError> {
    let result = conn
        .execute(pg(
            "UPDATE donors \
             SET name = $1, phone = $2, dob = $3::date, gender = $4, \
                 pan_number = $5, aadhaar_number = $6 \
             WHERE user_id = $7",
            vec![
                profile.name.as_str().into(),
                profile.phone.as_str().into(),
                profile.dob.clone().into(),
                profile.gender.clone().into(),
                profile.pan_number.clone().into(),
                profile.aadhaar_number.clone().into(),
                user_id.into(),
            ],
        ))
        .await?;
    Ok(result.rows_affected())
}

/// Donors with at least one donation to `ngo_id`, biggest contributors first.
pub async fn list_for_ngo<C: ConnectionTrait>(
    conn: &C,
    ngo_id: i64,
) -> Result<Vec<DonorContributionRow>, AppError> {
    let stmt = pg(
        "SELECT dn.donor_id::bigint AS donor_id, dn.name, dn.email, dn.phone, \
                dn.created_at::text AS created_at, \
                COUNT(d.donation_id)::bigint AS donation_count, \
                COALESCE(SUM(d.amount), 0)::float8 AS total_contributions, \
                MAX(d.donated_at)::text AS last_donation \
         FROM donors dn \
         JOIN donations d ON d.donor_id = dn.donor_id AND d.ngo_id = $1 \
         GROUP BY dn.donor_id, dn.name, dn.email, dn.phone, dn.created_at \
         ORDER BY total_contributions DESC",
        vec![ngo_id.into()],
    );
    Ok(DonorContributionRow::find_by_statement(stmt).all(conn).await?)
}
