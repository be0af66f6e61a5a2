//! NGO listing, the NGO dashboard, and an NGO's view of its donors.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::debug;

use crate::auth::Principal;
use crate::domain::metrics::{
    growth_percent, notification_label, round_to, utilization_percent, utilization_percent_capped,
};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::dashboard::{
    self, ActiveProjectRow, NgoTotals, NotificationRow, RecentDonationRow, SinceLastLogin,
};
use crate::repos::donations::{self, DonationUtilizationRow};
use crate::repos::donors::{self, DonorContributionRow, DonorRow};
use crate::repos::ngos::{self, NgoListingRow, NgoRef};

#[derive(Debug, Serialize, PartialEq)]
pub struct NgoListItem {
    pub ngo_id: i64,
    pub name: Option<String>,
    pub sector: String,
    pub location: String,
    pub description: String,
    #[serde(rename = "fundsReceived")]
    pub funds_received: f64,
    /// Percent of funds received that has been utilized.
    pub utilized: i64,
    pub beneficiaries: i64,
    pub projects: i64,
    pub phone: Option<String>,
    pub registration_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NgoListResponse {
    pub ngos: Vec<NgoListItem>,
}

impl From<NgoListingRow> for NgoListItem {
    fn from(row: NgoListingRow) -> Self {
        Self {
            ngo_id: row.ngo_id,
            name: row.name,
            sector: row.category.unwrap_or_else(|| "General".to_string()),
            location: format!(
                "{}, {}",
                row.city.as_deref().unwrap_or("Unknown"),
                row.state.as_deref().unwrap_or("India")
            ),
            description: row
                .mission
                .unwrap_or_else(|| "Making a difference in the community".to_string()),
            funds_received: row.funds_received,
            utilized: utilization_percent_capped(row.funds_utilized, row.funds_received),
            beneficiaries: row.donor_count,
            projects: row.donation_count,
            phone: row.phone,
            registration_number: row.registration_number,
        }
    }
}

pub async fn list_ngos<C: ConnectionTrait>(conn: &C) -> Result<NgoListResponse, AppError> {
    let rows = ngos::list_with_stats(conn).await?;
    Ok(NgoListResponse {
        ngos: rows.into_iter().map(NgoListItem::from).collect(),
    })
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_donations_received: f64,
    pub utilized_funds: f64,
    pub active_donors: i64,
    pub active_projects: i64,
    pub additional_donations_since_last_login: i64,
    pub utilization_change_percent: Option<f64>,
    pub new_donors_since_last_login: i64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DashboardNotification {
    pub notification_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub created_at: Option<String>,
    pub is_read: Option<bool>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DashboardProject {
    pub project_id: i64,
    pub name: Option<String>,
    pub budget: f64,
    pub utilized: i64,
    pub donors: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub ngo_id: i64,
    pub ngo_name: Option<String>,
    pub summary: DashboardSummary,
    #[serde(rename = "recentDonations")]
    pub recent_donations: Vec<RecentDonationRow>,
    pub notifications: Vec<DashboardNotification>,
    #[serde(rename = "activeProjects")]
    pub active_projects: Vec<DashboardProject>,
}

pub fn dashboard_summary(totals: &NgoTotals, since: &SinceLastLogin) -> DashboardSummary {
    let utilization_change_percent = (totals.utilized_before_latest > 0.0).then(|| {
        round_to(
            growth_percent(totals.utilized_funds, totals.utilized_before_latest),
            1,
        )
    });

    DashboardSummary {
        total_donations_received: totals.total_donations,
        utilized_funds: totals.utilized_funds,
        active_donors: totals.active_donors,
        active_projects: totals.active_projects,
        additional_donations_since_last_login: since.donations,
        utilization_change_percent,
        new_donors_since_last_login: since.new_donors,
    }
}

impl From<NotificationRow> for DashboardNotification {
    fn from(row: NotificationRow) -> Self {
        let kind = row.kind.unwrap_or_default().to_lowercase();
        let message = notification_label(&kind, row.message.as_deref().unwrap_or_default());
        Self {
            notification_id: row.notification_id,
            kind,
            message,
            created_at: row.created_at,
            is_read: row.is_read,
        }
    }
}

impl From<ActiveProjectRow> for DashboardProject {
    fn from(row: ActiveProjectRow) -> Self {
        Self {
            project_id: row.project_id,
            name: row.name,
            budget: row.budget,
            utilized: utilization_percent(row.amount_utilized, row.budget),
            donors: row.donors_count,
        }
    }
}

/// Which NGO the dashboard shows: the `ngo_id` query parameter, else the
/// caller's own NGO, else the oldest NGO.
async fn resolve_dashboard_ngo<C: ConnectionTrait>(
    conn: &C,
    requested: Option<i64>,
    principal: Option<&Principal>,
) -> Result<NgoRef, AppError> {
    if let Some(ngo_id) = requested {
        return ngos::find_ref_by_id(conn, ngo_id)
            .await?
            .ok_or_else(AppError::ngo_not_found);
    }

    if let Some(p) = principal {
        if let Some(own) = ngos::find_ref_by_user(conn, p.user_id).await? {
            return Ok(own);
        }
    }

    ngos::first_ref(conn)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::NgoNotFound, "No NGOs found"))
}

pub async fn dashboard<C: ConnectionTrait>(
    conn: &C,
    requested: Option<i64>,
    principal: Option<&Principal>,
) -> Result<DashboardResponse, AppError> {
    let ngo = resolve_dashboard_ngo(conn, requested, principal).await?;
    debug!(ngo_id = ngo.ngo_id, "Building NGO dashboard");

    let totals = dashboard::totals(conn, ngo.ngo_id).await?;
    let since = match principal.and_then(|p| p.prev_login) {
        Some(prev_login) => dashboard::since_last_login(conn, ngo.ngo_id, prev_login).await?,
        None => SinceLastLogin::default(),
    };
    let recent_donations = dashboard::recent_donations(conn, ngo.ngo_id).await?;
    let notifications = match ngo.user_id {
        Some(user_id) => dashboard::notifications(conn, user_id).await?,
        None => Vec::new(),
    };
    let active_projects = dashboard::active_projects(conn, ngo.ngo_id).await?;

    Ok(DashboardResponse {
        ngo_id: ngo.ngo_id,
        ngo_name: ngo.name,
        summary: dashboard_summary(&totals, &since),
        recent_donations,
        notifications: notifications.into_iter().map(Into::into).collect(),
        active_projects: active_projects.into_iter().map(Into::into).collect(),
    })
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DonorListItem {
    pub donor_id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub total_contributions: f64,
    pub donation_count: i64,
    pub last_donation: Option<String>,
    pub joined_date: Option<String>,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DonorListResponse {
    pub donors: Vec<DonorListItem>,
}

impl From<DonorContributionRow> for DonorListItem {
    fn from(row: DonorContributionRow) -> Self {
        Self {
            donor_id: row.donor_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            total_contributions: row.total_contributions,
            donation_count: row.donation_count,
            last_donation: row.last_donation,
            joined_date: row.created_at,
            status: "Active",
        }
    }
}

pub async fn donors_of_ngo<C: ConnectionTrait>(
    conn: &C,
    ngo_id: i64,
) -> Result<DonorListResponse, AppError> {
    let rows = donors::list_for_ngo(conn, ngo_id).await?;
    Ok(DonorListResponse {
        donors: rows.into_iter().map(Into::into).collect(),
    })
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DonorDetail {
    pub donor_id: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub joined_date: Option<String>,
    pub total_contributions: f64,
    pub donation_count: usize,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DonorHistoryEntry {
    pub donation_id: i64,
    pub amount: f64,
    pub date: Option<String>,
    pub purpose: String,
    pub utilized: i64,
}

#[derive(Debug, Serialize)]
pub struct DonorHistoryResponse {
    pub donor: DonorDetail,
    pub history: Vec<DonorHistoryEntry>,
}

pub fn donor_history_response(
    donor: DonorRow,
    donations: Vec<DonationUtilizationRow>,
) -> DonorHistoryResponse {
    let history: Vec<DonorHistoryEntry> = donations
        .into_iter()
        .map(|d| DonorHistoryEntry {
            donation_id: d.donation_id,
            amount: d.amount,
            date: d.donated_at,
            purpose: d.purpose.unwrap_or_else(|| "General".to_string()),
            utilized: utilization_percent_capped(d.amount_utilized, d.amount),
        })
        .collect();

    DonorHistoryResponse {
        donor: DonorDetail {
            donor_id: donor.donor_id,
            name: donor.name,
            email: donor.email,
            phone: donor.phone,
            joined_date: donor.created_at,
            total_contributions: history.iter().map(|h| h.amount).sum(),
            donation_count: history.len(),
        },
        history,
    }
}

/// A donor's donations to `ngo_id` only.
pub async fn donor_history<C: ConnectionTrait>(
    conn: &C,
    ngo_id: i64,
    donor_id: i64,
) -> Result<DonorHistoryResponse, AppError> {
    let donor = donors::find_by_id(conn, donor_id)
        .await?
        .ok_or_else(AppError::donor_not_found)?;
    let donations = donations::list_for_donor(conn, donor_id, Some(ngo_id)).await?;
    Ok(donor_history_response(donor, donations))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(funds_received: f64, funds_utilized: f64) -> NgoListingRow {
        NgoListingRow {
            ngo_id: 3,
            name: Some("Helping Hands".to_string()),
            category: None,
            city: Some("Pune".to_string()),
            state: None,
            mission: None,
            vision: None,
            phone: None,
            registration_number: None,
            funds_received,
            funds_utilized,
            donor_count: 4,
            donation_count: 9,
        }
    }

    #[test]
    fn test_ngo_list_item_defaults_and_percent() {
        let item = NgoListItem::from(listing(2000.0, 500.0));
        assert_eq!(item.sector, "General");
        assert_eq!(item.location, "Pune, India");
        assert_eq!(item.description, "Making a difference in the community");
        assert_eq!(item.utilized, 25);
        assert_eq!(item.beneficiaries, 4);
        assert_eq!(item.projects, 9);

        assert_eq!(NgoListItem::from(listing(0.0, 0.0)).utilized, 0);
        assert_eq!(NgoListItem::from(listing(100.0, 300.0)).utilized, 100);
    }

    #[test]
    fn test_ngo_list_item_wire_keys() {
        let json = serde_json::to_value(NgoListItem::from(listing(10.0, 1.0))).unwrap();
        assert_eq!(json["fundsReceived"], 10.0);
        assert!(json.get("funds_received").is_none());
    }

    #[test]
    fn test_dashboard_summary_utilization_change() {
        let totals = NgoTotals {
            total_donations: 5000.0,
            utilized_funds: 1500.0,
            active_donors: 3,
            active_projects: 2,
            utilized_before_latest: 1000.0,
        };
        let summary = dashboard_summary(&totals, &SinceLastLogin::default());
        assert_eq!(summary.utilization_change_percent, Some(50.0));

        let first = NgoTotals {
            utilized_before_latest: 0.0,
            ..totals
        };
        assert_eq!(
            dashboard_summary(&first, &SinceLastLogin::default()).utilization_change_percent,
            None
        );
    }

    #[test]
    fn test_dashboard_summary_wire_keys() {
        let summary = dashboard_summary(
            &NgoTotals::default(),
            &SinceLastLogin {
                donations: 2,
                new_donors: 1,
            },
        );
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["additionalDonationsSinceLastLogin"], 2);
        assert_eq!(json["newDonorsSinceLastLogin"], 1);
        assert!(json["utilizationChangePercent"].is_null());
    }

    #[test]
    fn test_notification_is_labelled() {
        let n = DashboardNotification::from(NotificationRow {
            notification_id: 1,
            kind: Some("DONATION".to_string()),
            message: Some("New donation of ₹500".to_string()),
            created_at: None,
            is_read: Some(false),
        });
        assert_eq!(n.kind, "donation");
        assert_eq!(n.message, "🎁 New donation of ₹500");
    }

    #[test]
    fn test_donor_history_totals() {
        let donor = DonorRow {
            donor_id: 11,
            name: Some("Asha".to_string()),
            email: None,
            phone: None,
            created_at: None,
        };
        let row = |id, amount, utilized| DonationUtilizationRow {
            donation_id: id,
            donor_name: None,
            ngo_name: None,
            amount,
            amount_utilized: utilized,
            purpose: None,
            donated_at: None,
        };
        let resp = donor_history_response(donor, vec![row(1, 100.0, 150.0), row(2, 300.0, 30.0)]);
        assert_eq!(resp.donor.total_contributions, 400.0);
        assert_eq!(resp.donor.donation_count, 2);
        assert_eq!(resp.history[0].utilized, 100);
        assert_eq!(resp.history[1].utilized, 10);
        assert_eq!(resp.history[1].purpose, "General");
    }
}
