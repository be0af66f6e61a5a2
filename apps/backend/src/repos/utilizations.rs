//! `projects` and `utilizations` tables.

use sea_orm::{ConnectionTrait, FromQueryResult};

use super::{fetch_id, pg};
use crate::error::AppError;

#[derive(Debug, Clone, FromQueryResult)]
pub struct ProjectRow {
    pub project_id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub budget: f64,
    pub amount_utilized: f64,
    pub status: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct UtilizationRecordRow {
    pub utilization_id: i64,
    pub donation_id: Option<i64>,
    pub project_id: Option<i64>,
    pub project_name: Option<String>,
    pub amount_utilized: f64,
    pub purpose: Option<String>,
    pub beneficiaries: i64,
    pub location: Option<String>,
    pub utilized_at: Option<String>,
    pub donor_name: Option<String>,
    pub ngo_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub budget: f64,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct NewUtilization {
    pub donation_id: i64,
    pub project_id: Option<i64>,
    pub amount_utilized: f64,
    pub purpose: Option<String>,
    pub beneficiaries: Option<i64>,
    pub location: Option<String>,
    /// Store default (now) when `None`.
    pub utilized_at: Option<String>,
}

/// Projects of `ngo_id`, newest first, with the amount utilized on each.
pub async fn list_projects<C: ConnectionTrait>(
    conn: &C,
    ngo_id: i64,
) -> Result<Vec<ProjectRow>, AppError> {
    let stmt = pg(
        "SELECT p.project_id::bigint AS project_id, p.name, p.description, \
                COALESCE(p.budget, 0)::float8 AS budget, \
                COALESCE((SELECT SUM(u.amount_utilized) FROM utilizations u \
                          WHERE u.ngo_id = p.ngo_id AND u.project_id = p.project_id), 0)::float8 \
                    AS amount_utilized, \
                p.status, p.created_at::text AS created_at \
         FROM projects p \
         WHERE p.ngo_id = $1 \
         ORDER BY p.created_at DESC",
        vec![ngo_id.into()],
    );
    Ok(ProjectRow::find_by_statement(stmt).all(conn).await?)
}

const RECORD_COLUMNS: &str = "\
    SELECT u.utilization_id::bigint AS utilization_id, \
           u.donation_id::bigint AS donation_id, \
           u.project_id::bigint AS project_id, \
           p.name AS project_name, \
           COALESCE(u.amount_utilized, 0)::float8 AS amount_utilized, \
           u.purpose, \
           COALESCE(u.beneficiaries, 0)::bigint AS beneficiaries, \
           u.location, u.utilized_at::text AS utilized_at, \
           COALESCE(dn.name, 'Anonymous') AS donor_name, \
           COALESCE(n.name, 'Unknown NGO') AS ngo_name \
    FROM utilizations u \
    LEFT JOIN donations d ON u.donation_id = d.donation_id \
    LEFT JOIN donors dn ON d.donor_id = dn.donor_id \
    LEFT JOIN ngos n ON u.ngo_id = n.ngo_id \
    LEFT JOIN projects p ON u.project_id = p.project_id";

/// Utilization records of `ngo_id`, or of every NGO when `None`, newest first.
pub async fn list_records<C: ConnectionTrait>(
    conn: &C,
    ngo_id: Option<i64>,
) -> Result<Vec<UtilizationRecordRow>, AppError> {
    let stmt = match ngo_id {
        Some(id) => pg(
            &format!("{RECORD_COLUMNS} WHERE u.ngo_id = $1 ORDER BY u.utilized_at DESC"),
            vec![id.into()],
        ),
        None => pg(
            &format!("{RECORD_COLUMNS} ORDER BY u.utilized_at DESC"),
            vec![],
        ),
    };
    Ok(UtilizationRecordRow::find_by_statement(stmt)
        .all(conn)
        .await?)
}

pub async fn create_project<C: ConnectionTrait>(
    conn: &C,
    ngo_id: i64,
    project: &NewProject,
) -> Result<i64, AppError> {
    let stmt = pg(
        "INSERT INTO projects (ngo_id, name, description, budget, status, created_at) \
         VALUES ($1, $2, $3, $4, $5, NOW()) \
         RETURNING project_id::bigint AS id",
        vec![
            ngo_id.into(),
            project.name.as_str().into(),
            project.description.clone().into(),
            project.budget.into(),
            project.status.as_str().into(),
        ],
    );
    fetch_id(conn, stmt)
        .await?
        .ok_or_else(|| AppError::internal("INSERT INTO projects returned no row"))
}

pub async fn create_utilization<C: ConnectionTrait>(
    conn: &C,
    ngo_id: i64,
    record: &NewUtilization,
) -> Result<i64, AppError> {
    let stmt = pg(
        "INSERT INTO utilizations (ngo_id, donation_id, project_id, amount_utilized, purpose, \
                                   beneficiaries, location, utilized_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8::timestamp, NOW())) \
         RETURNING utilization_id::bigint AS id",
        vec![
            ngo_id.into(),
            record.donation_id.into(),
            record.project_id.into(),
            record.amount_utilized.into(),
            record.purpose.clone().into(),
            record.beneficiaries.into(),
            record.location.clone().into(),
            record.utilized_at.clone().into(),
        ],
    );
    fetch_id(conn, stmt)
        .await?
        .ok_or_else(|| AppError::internal("INSERT INTO utilizations returned no row"))
}
