//! `ngos` table.

use sea_orm::{ConnectionTrait, FromQueryResult};

use super::{fetch_id, pg};
use crate::error::AppError;

#[derive(Debug, Clone, FromQueryResult)]
pub struct NgoRef {
    pub ngo_id: i64,
    pub user_id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct NgoListingRow {
    pub ngo_id: i64,
    pub name: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub phone: Option<String>,
    pub registration_number: Option<String>,
    pub funds_received: f64,
    pub funds_utilized: f64,
    pub donor_count: i64,
    pub donation_count: i64,
}

#[derive(Debug, Clone, Default)]
pub struct NgoProfileUpdate {
    pub registration_number: String,
    pub registration_date: String,
    pub category: String,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub website: Option<String>,
}

const NGO_REF_COLUMNS: &str =
    "SELECT ngo_id::bigint AS ngo_id, user_id::bigint AS user_id, name FROM ngos";

pub async fn find_id_by_user<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
) -> Result<Option<i64>, AppError> {
    fetch_id(
        conn,
        pg(
            "SELECT ngo_id::bigint AS id FROM ngos WHERE user_id = $1",
            vec![user_id.into()],
        ),
    )
    .await
}

pub async fn find_id_by_name<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<Option<i64>, AppError> {
    fetch_id(
        conn,
        pg(
            "SELECT ngo_id::bigint AS id FROM ngos WHERE name = $1",
            vec![name.into()],
        ),
    )
    .await
}

pub async fn find_ref_by_user<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
) -> Result<Option<NgoRef>, AppError> {
    let stmt = pg(
        &format!("{NGO_REF_COLUMNS} WHERE user_id = $1"),
        vec![user_id.into()],
    );
    Ok(NgoRef::find_by_statement(stmt).one(conn).await?)
}

pub async fn find_ref_by_id<C: ConnectionTrait>(
    conn: &C,
    ngo_id: i64,
) -> Result<Option<NgoRef>, AppError> {
    let stmt = pg(
        &format!("{NGO_REF_COLUMNS} WHERE ngo_id = $1"),
        vec![ngo_id.into()],
    );
    Ok(NgoRef::find_by_statement(stmt).one(conn).await?)
}

/// Oldest registered NGO.
pub async fn first_ref<C: ConnectionTrait>(conn: &C) -> Result<Option<NgoRef>, AppError> {
    let stmt = pg(
        &format!("{NGO_REF_COLUMNS} ORDER BY created_at LIMIT 1"),
        vec![],
    );
    Ok(NgoRef::find_by_statement(stmt).one(conn).await?)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    name: Option<&str>,
    email: &str,
) -> Result<(), AppError> {
    conn.execute(pg(
        "INSERT INTO ngos (user_id, name, email) VALUES ($1, $2, $3)",
        vec![user_id.into(), name.map(str::to_string).into(), email.into()],
    ))
    .await?;
    Ok(())
}

/// Returns the number of rows touched (0 when the user has no NGO row).
pub async fn update_profile<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    profile: &NgoProfileUpdate,
) -> Result<u64, AppError> {
    let result = conn
        .execute(pg(
            "UPDATE ngos \
             SET registration_number = $1, registration_date = $2::date, category = $3, \
                 phone = $4, city = $5, state = $6, country = $7, \
                 mission = $8, vision = $9, website = $10 \
             WHERE user_id = $11",
            vec![
                profile.registration_number.as_str().into(),
                profile.registration_date.as_str().into(),
                profile.category.as_str().into(),
                profile.phone.as_str().into(),
                profile.city.as_str().into(),
                profile.state.as_str().into(),
                profile.country.as_str().into(),
                profile.mission.clone().into(),
                profile.vision.clone().into(),
                profile.website.clone().into(),
                user_id.into(),
            ],
        ))
        .await?;
    Ok(result.rows_affected())
}

/// Every NGO with funding totals, best funded first.
pub async fn list_with_stats<C: ConnectionTrait>(
    conn: &C,
) -> Result<Vec<NgoListingRow>, AppError> {
    let stmt = pg(
        "SELECT n.ngo_id::bigint AS ngo_id, n.name, n.category, n.city, n.state, \
                n.mission, n.vision, n.phone, n.registration_number, \
                COALESCE(SUM(d.amount), 0)::float8 AS funds_received, \
                COALESCE((SELECT SUM(u.amount_utilized) FROM utilizations u \
                          WHERE u.ngo_id = n.ngo_id), 0)::float8 AS funds_utilized, \
                COUNT(DISTINCT d.donor_id)::bigint AS donor_count, \
                COUNT(DISTINCT d.donation_id)::bigint AS donation_count \
         FROM ngos n \
         LEFT JOIN donations d ON n.ngo_id = d.ngo_id \
         GROUP BY n.ngo_id, n.name, n.category, n.city, n.state, n.mission, n.vision, \
                  n.phone, n.registration_number \
         ORDER BY funds_received DESC",
        vec![],
    );
    Ok(NgoListingRow::find_by_statement(stmt).all(conn).await?)
}
