//! Projects and fund utilization: how an NGO spends what it received.

use std::collections::HashSet;

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::metrics::{utilization_percent_capped, utilization_status, STATUS_COMPLETED};
use crate::domain::validation::{positive_amount, required_text};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::donations::{self, DonationUtilizationRow};
use crate::repos::utilizations::{
    self, NewProject, NewUtilization, ProjectRow, UtilizationRecordRow,
};

const DEFAULT_PROJECT_STATUS: &str = "ACTIVE";

#[derive(Debug, Serialize, PartialEq)]
pub struct ProjectView {
    pub project_id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub budget: f64,
    pub amount_utilized: f64,
    pub completion_percent: i64,
    pub status: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectsResponse {
    pub projects: Vec<ProjectView>,
}

impl From<ProjectRow> for ProjectView {
    fn from(row: ProjectRow) -> Self {
        Self {
            project_id: row.project_id,
            name: row.name,
            description: row.description,
            budget: row.budget,
            amount_utilized: row.amount_utilized,
            completion_percent: utilization_percent_capped(row.amount_utilized, row.budget),
            status: row.status,
            created_at: row.created_at,
        }
    }
}

pub async fn projects<C: ConnectionTrait>(
    conn: &C,
    ngo_id: i64,
) -> Result<ProjectsResponse, AppError> {
    let rows = utilizations::list_projects(conn, ngo_id).await?;
    Ok(ProjectsResponse {
        projects: rows.into_iter().map(Into::into).collect(),
    })
}

#[derive(Debug, Serialize, PartialEq)]
pub struct UtilizableDonation {
    pub donation_id: i64,
    pub donor_name: String,
    pub amount: f64,
    pub amount_utilized: f64,
    pub utilization_percent: i64,
    pub purpose: Option<String>,
    pub donated_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UtilizableDonationsResponse {
    pub donations: Vec<UtilizableDonation>,
}

impl From<DonationUtilizationRow> for UtilizableDonation {
    fn from(row: DonationUtilizationRow) -> Self {
        Self {
            donation_id: row.donation_id,
            donor_name: row.donor_name.unwrap_or_else(|| "Unknown".to_string()),
            amount: row.amount,
            amount_utilized: row.amount_utilized,
            utilization_percent: utilization_percent_capped(row.amount_utilized, row.amount),
            purpose: row.purpose,
            donated_at: row.donated_at,
        }
    }
}

pub async fn donations<C: ConnectionTrait>(
    conn: &C,
    ngo_id: i64,
) -> Result<UtilizableDonationsResponse, AppError> {
    let rows = donations::list_with_utilization(conn, Some(ngo_id)).await?;
    Ok(UtilizableDonationsResponse {
        donations: rows.into_iter().map(Into::into).collect(),
    })
}

#[derive(Debug, Serialize, PartialEq)]
pub struct UtilizationRecordView {
    pub utilization_id: i64,
    pub donation_id: Option<i64>,
    pub project_id: Option<i64>,
    pub donor_name: String,
    pub project_name: String,
    pub amount_utilized: f64,
    pub purpose: String,
    pub beneficiaries: i64,
    pub location: String,
    pub utilized_at: Option<String>,
    pub ngo_name: String,
    pub status: &'static str,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RecordsSummary {
    pub total_utilized: f64,
    pub active_projects: usize,
    pub completed_projects: usize,
    pub total_beneficiaries: i64,
    pub total_count: usize,
}

#[derive(Debug, Serialize)]
pub struct UtilizationRecordsResponse {
    pub records: Vec<UtilizationRecordView>,
    pub summary: RecordsSummary,
}

pub fn records_response(rows: Vec<UtilizationRecordRow>) -> UtilizationRecordsResponse {
    let active_projects: HashSet<i64> = rows.iter().filter_map(|r| r.project_id).collect();

    let records: Vec<UtilizationRecordView> = rows
        .into_iter()
        .map(|r| UtilizationRecordView {
            utilization_id: r.utilization_id,
            donation_id: r.donation_id,
            project_id: r.project_id,
            donor_name: r.donor_name.unwrap_or_else(|| "Unknown".to_string()),
            project_name: r.project_name.unwrap_or_else(|| "Unknown".to_string()),
            amount_utilized: r.amount_utilized,
            purpose: r.purpose.unwrap_or_else(|| "General".to_string()),
            beneficiaries: r.beneficiaries,
            location: r.location.unwrap_or_else(|| "Unknown".to_string()),
            utilized_at: r.utilized_at,
            ngo_name: r.ngo_name.unwrap_or_else(|| "Unknown NGO".to_string()),
            status: utilization_status(r.amount_utilized),
        })
        .collect();

    UtilizationRecordsResponse {
        summary: RecordsSummary {
            total_utilized: records.iter().map(|r| r.amount_utilized).sum(),
            active_projects: active_projects.len(),
            completed_projects: records
                .iter()
                .filter(|r| r.status == STATUS_COMPLETED)
                .count(),
            total_beneficiaries: records.iter().map(|r| r.beneficiaries).sum(),
            total_count: records.len(),
        },
        records,
    }
}

/// Records of `ngo_id`, or of every NGO when `None`.
pub async fn records<C: ConnectionTrait>(
    conn: &C,
    ngo_id: Option<i64>,
) -> Result<UtilizationRecordsResponse, AppError> {
    let rows = utilizations::list_records(conn, ngo_id).await?;
    Ok(records_response(rows))
}

#[derive(Debug, Deserialize)]
pub struct AddProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddProjectResponse {
    pub message: &'static str,
    pub project_id: i64,
}

pub async fn add_project<C: ConnectionTrait>(
    conn: &C,
    ngo_id: i64,
    req: &AddProjectRequest,
) -> Result<AddProjectResponse, AppError> {
    let (Some(name), Some(budget)) = (
        req.name.as_deref().filter(|n| !n.trim().is_empty()),
        req.budget.filter(|b| *b != 0.0),
    ) else {
        return Err(AppError::invalid(
            ErrorCode::MissingField,
            "Name and budget are required",
        ));
    };
    let budget = positive_amount("budget", Some(budget))?;

    let project = NewProject {
        name: name.trim().to_string(),
        description: req.description.clone(),
        budget,
        status: req
            .status
            .clone()
            .unwrap_or_else(|| DEFAULT_PROJECT_STATUS.to_string()),
    };
    let project_id = utilizations::create_project(conn, ngo_id, &project).await?;
    info!(project_id, ngo_id, "Project added");

    Ok(AddProjectResponse {
        message: "Project added successfully",
        project_id,
    })
}

#[derive(Debug, Deserialize)]
pub struct AddUtilizationRequest {
    pub donation_id: Option<i64>,
    pub project_id: Option<i64>,
    pub amount_utilized: Option<f64>,
    pub purpose: Option<String>,
    pub beneficiaries: Option<i64>,
    pub location: Option<String>,
    pub utilized_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddUtilizationResponse {
    pub message: &'static str,
    pub utilization_id: i64,
}

pub async fn add_utilization<C: ConnectionTrait>(
    conn: &C,
    ngo_id: i64,
    req: &AddUtilizationRequest,
) -> Result<AddUtilizationResponse, AppError> {
    let (Some(donation_id), Some(amount)) = (req.donation_id, req.amount_utilized) else {
        return Err(AppError::invalid(
            ErrorCode::MissingField,
            "Donation ID and amount are required",
        ));
    };
    let amount_utilized = positive_amount("amount_utilized", Some(amount))?;
    let utilized_at = match req.utilized_at.as_deref() {
        Some(raw) => Some(required_text("utilized_at", Some(raw))?.to_string()),
        None => None,
    };

    let record = NewUtilization {
        donation_id,
        project_id: req.project_id,
        amount_utilized,
        purpose: req.purpose.clone(),
        beneficiaries: req.beneficiaries,
        location: req.location.clone(),
        utilized_at,
    };
    let utilization_id = utilizations::create_utilization(conn, ngo_id, &record).await?;
    info!(utilization_id, ngo_id, donation_id, "Utilization recorded");

    Ok(AddUtilizationResponse {
        message: "Utilization record added successfully",
        utilization_id,
    })
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    fn record(id: i64, project_id: Option<i64>, amount: f64, beneficiaries: i64) -> UtilizationRecordRow {
        UtilizationRecordRow {
            utilization_id: id,
            donation_id: Some(1),
            project_id,
            project_name: project_id.map(|p| format!("Project {p}")),
            amount_utilized: amount,
            purpose: None,
            beneficiaries,
            location: None,
            utilized_at: None,
            donor_name: Some("Asha".to_string()),
            ngo_name: None,
        }
    }

    #[test]
    fn test_records_summary() {
        let resp = records_response(vec![
            record(1, Some(10), 500.0, 20),
            record(2, Some(10), 0.0, 5),
            record(3, Some(11), 250.0, 0),
            record(4, None, 100.0, 1),
        ]);
        assert_eq!(resp.summary.total_utilized, 850.0);
        assert_eq!(resp.summary.active_projects, 2);
        assert_eq!(resp.summary.completed_projects, 3);
        assert_eq!(resp.summary.total_beneficiaries, 26);
        assert_eq!(resp.summary.total_count, 4);

        assert_eq!(resp.records[1].status, "Pending");
        assert_eq!(resp.records[3].project_name, "Unknown");
        assert_eq!(resp.records[0].location, "Unknown");
        assert_eq!(resp.records[0].ngo_name, "Unknown NGO");
    }

    #[test]
    fn test_project_completion_is_capped() {
        let view = ProjectView::from(ProjectRow {
            project_id: 1,
            name: None,
            description: None,
            budget: 1000.0,
            amount_utilized: 1500.0,
            status: Some("ACTIVE".to_string()),
            created_at: None,
        });
        assert_eq!(view.completion_percent, 100);
    }

    #[tokio::test]
    async fn test_add_project_requires_name_and_budget() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let req = AddProjectRequest {
            name: Some("  ".to_string()),
            description: None,
            budget: Some(100.0),
            status: None,
        };
        let err = add_project(&db, 1, &req).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingField);

        let req = AddProjectRequest {
            name: Some("Wells".to_string()),
            description: None,
            budget: Some(-5.0),
            status: None,
        };
        let err = add_project(&db, 1, &req).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidAmount);
    }

    #[tokio::test]
    async fn test_add_utilization_requires_donation_and_amount() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let req = AddUtilizationRequest {
            donation_id: None,
            project_id: None,
            amount_utilized: Some(10.0),
            purpose: None,
            beneficiaries: None,
            location: None,
            utilized_at: None,
        };
        let err = add_utilization(&db, 1, &req).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingField);
    }
}
