//! Donation records, a donor's own history, and new donations.

use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::metrics::{donation_status, ratio_percent, round_to, transaction_ref};
use crate::domain::validation::{positive_amount, required_text};
use crate::error::AppError;
use crate::repos::donations::{self, DonationUtilizationRow};
use crate::repos::ngos;

#[derive(Debug, Serialize, PartialEq)]
pub struct DonationRecord {
    pub donation_id: i64,
    pub donor_name: String,
    pub amount: f64,
    pub amount_utilized: f64,
    pub purpose: String,
    pub donated_at: Option<String>,
    pub status: &'static str,
    pub ngo_name: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RecordsSummary {
    pub total_donations: f64,
    pub total_utilized: f64,
    pub total_count: usize,
}

#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub donations: Vec<DonationRecord>,
    pub summary: RecordsSummary,
}

pub fn records_response(rows: Vec<DonationUtilizationRow>) -> RecordsResponse {
    let donations: Vec<DonationRecord> = rows
        .into_iter()
        .map(|d| DonationRecord {
            donation_id: d.donation_id,
            donor_name: d.donor_name.unwrap_or_else(|| "Unknown".to_string()),
            amount: d.amount,
            amount_utilized: d.amount_utilized,
            purpose: d.purpose.unwrap_or_else(|| "General".to_string()),
            donated_at: d.donated_at,
            status: "Received",
            ngo_name: d.ngo_name.unwrap_or_else(|| "Unknown NGO".to_string()),
        })
        .collect();

    RecordsResponse {
        summary: RecordsSummary {
            total_donations: donations.iter().map(|d| d.amount).sum(),
            total_utilized: donations.iter().map(|d| d.amount_utilized).sum(),
            total_count: donations.len(),
        },
        donations,
    }
}

/// Donations received by `ngo_id`, or all donations when `None`.
pub async fn records<C: ConnectionTrait>(
    conn: &C,
    ngo_id: Option<i64>,
) -> Result<RecordsResponse, AppError> {
    let rows = donations::list_with_utilization(conn, ngo_id).await?;
    Ok(records_response(rows))
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DonorDonation {
    pub id: i64,
    pub ngo: Option<String>,
    pub amount: f64,
    /// Date part of `donated_at`.
    pub date: Option<String>,
    pub purpose: String,
    pub status: &'static str,
    pub utilized: f64,
    pub amount_utilized: f64,
    #[serde(rename = "transactionId")]
    pub transaction_id: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DonorHistorySummary {
    pub total_donated: f64,
    pub total_utilized: f64,
    pub total_count: usize,
}

#[derive(Debug, Serialize)]
pub struct DonorDonationsResponse {
    pub donations: Vec<DonorDonation>,
    pub summary: DonorHistorySummary,
}

fn date_part(timestamp: &str) -> String {
    timestamp
        .split([' ', 'T'])
        .next()
        .unwrap_or(timestamp)
        .to_string()
}

pub fn donor_donations_response(rows: Vec<DonationUtilizationRow>) -> DonorDonationsResponse {
    let donations: Vec<DonorDonation> = rows
        .into_iter()
        .map(|d| {
            let percent = ratio_percent(d.amount_utilized, d.amount);
            DonorDonation {
                id: d.donation_id,
                ngo: d.ngo_name,
                amount: d.amount,
                date: d.donated_at.as_deref().map(date_part),
                purpose: d.purpose.unwrap_or_else(|| "General".to_string()),
                status: donation_status(percent),
                utilized: round_to(percent, 1),
                amount_utilized: d.amount_utilized,
                transaction_id: transaction_ref(d.donation_id),
            }
        })
        .collect();

    DonorDonationsResponse {
        summary: DonorHistorySummary {
            total_donated: donations.iter().map(|d| d.amount).sum(),
            total_utilized: donations.iter().map(|d| d.amount_utilized).sum(),
            total_count: donations.len(),
        },
        donations,
    }
}

pub async fn donor_donations<C: ConnectionTrait>(
    conn: &C,
    donor_id: i64,
) -> Result<DonorDonationsResponse, AppError> {
    let rows = donations::list_for_donor(conn, donor_id, None).await?;
    Ok(donor_donations_response(rows))
}

#[derive(Debug, Deserialize)]
pub struct CreateDonationRequest {
    pub ngo_name: Option<String>,
    pub amount: Option<f64>,
    pub purpose: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CreatedDonationView {
    pub donation_id: i64,
    pub transaction_id: String,
    pub amount: f64,
    pub ngo: String,
    pub purpose: String,
    pub donated_at: String,
}

#[derive(Debug, Serialize)]
pub struct CreateDonationResponse {
    pub success: bool,
    pub message: &'static str,
    pub donation: CreatedDonationView,
}

pub async fn create_donation<C: ConnectionTrait>(
    conn: &C,
    donor_id: i64,
    req: &CreateDonationRequest,
) -> Result<CreateDonationResponse, AppError> {
    let ngo_name = required_text("ngo_name", req.ngo_name.as_deref())?;
    let amount = positive_amount("amount", req.amount)?;
    let purpose = required_text("purpose", req.purpose.as_deref())?;

    let ngo_id = ngos::find_id_by_name(conn, ngo_name)
        .await?
        .ok_or_else(AppError::ngo_not_found)?;

    let created = donations::create(conn, donor_id, ngo_id, amount, purpose).await?;
    info!(
        donation_id = created.donation_id,
        donor_id, ngo_id, "Donation recorded"
    );

    Ok(CreateDonationResponse {
        success: true,
        message: "Donation created successfully",
        donation: CreatedDonationView {
            donation_id: created.donation_id,
            transaction_id: transaction_ref(created.donation_id),
            amount,
            ngo: ngo_name.to_string(),
            purpose: purpose.to_string(),
            donated_at: created.donated_at,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::{STATUS_FULLY_UTILIZED, STATUS_IN_PROGRESS, STATUS_PARTIALLY_UTILIZED};

    fn row(id: i64, amount: f64, utilized: f64) -> DonationUtilizationRow {
        DonationUtilizationRow {
            donation_id: id,
            donor_name: None,
            ngo_name: Some("Helping Hands".to_string()),
            amount,
            amount_utilized: utilized,
            purpose: None,
            donated_at: Some("2024-03-05 10:15:00+00".to_string()),
        }
    }

    #[test]
    fn test_records_defaults_and_summary() {
        let resp = records_response(vec![row(1, 100.0, 40.0), row(2, 50.0, 0.0)]);
        assert_eq!(resp.summary.total_donations, 150.0);
        assert_eq!(resp.summary.total_utilized, 40.0);
        assert_eq!(resp.summary.total_count, 2);
        assert_eq!(resp.donations[0].donor_name, "Unknown");
        assert_eq!(resp.donations[0].purpose, "General");
        assert_eq!(resp.donations[0].status, "Received");
    }

    #[test]
    fn test_donor_donations_status_and_reference() {
        let resp = donor_donations_response(vec![
            row(7, 300.0, 100.0),
            row(8, 200.0, 200.0),
            row(9, 100.0, 0.0),
        ]);

        let first = &resp.donations[0];
        assert_eq!(first.status, STATUS_PARTIALLY_UTILIZED);
        assert_eq!(first.utilized, 33.3);
        assert_eq!(first.transaction_id, "TXN000000007");
        assert_eq!(first.date.as_deref(), Some("2024-03-05"));

        assert_eq!(resp.donations[1].status, STATUS_FULLY_UTILIZED);
        assert_eq!(resp.donations[2].status, STATUS_IN_PROGRESS);
        assert_eq!(resp.summary.total_donated, 600.0);
        assert_eq!(resp.summary.total_utilized, 300.0);
    }

    #[test]
    fn test_donor_donation_wire_keys() {
        let resp = donor_donations_response(vec![row(1, 10.0, 0.0)]);
        let json = serde_json::to_value(&resp.donations[0]).unwrap();
        assert_eq!(json["transactionId"], "TXN000000001");
        assert_eq!(json["id"], 1);
    }

    #[test]
    fn test_date_part() {
        assert_eq!(date_part("2024-03-05 10:15:00"), "2024-03-05");
        assert_eq!(date_part("2024-03-05T10:15:00Z"), "2024-03-05");
        assert_eq!(date_part("2024-03-05"), "2024-03-05");
    }
}
