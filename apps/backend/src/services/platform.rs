//! Platform-wide views: the admin dashboard and the six-month report.

use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::domain::metrics::{format_rupees, growth_percent, ratio_percent, relative_time, round_to};
use crate::error::AppError;
use crate::repos::platform::{self, ActivityRow, AdminDashboardData, CategoryShareRow, OverallReportData};

const OTHER_CATEGORY: &str = "Other";

#[derive(Debug, Serialize, PartialEq)]
pub struct PlatformStats {
    pub total_donations: f64,
    pub total_utilized: f64,
    pub total_beneficiaries: i64,
    pub active_projects: i64,
    pub growth_percent: f64,
    pub utilization_percent: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct FundAllocation {
    pub utilized: f64,
    pub available: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ThisMonth {
    pub donations: f64,
    pub utilized: f64,
    pub beneficiaries: i64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TopCategory {
    pub category: String,
    pub percentage: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub amount: String,
    pub time: String,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboardResponse {
    pub stats: PlatformStats,
    pub fund_allocation: FundAllocation,
    pub this_month: ThisMonth,
    pub top_categories: Vec<TopCategory>,
    pub recent_activities: Vec<Activity>,
}

impl From<ActivityRow> for Activity {
    fn from(row: ActivityRow) -> Self {
        let amount = match row.amount {
            Some(a) if a != 0.0 => format_rupees(a),
            _ => "-".to_string(),
        };
        Self {
            kind: row.kind,
            description: row.description,
            amount,
            time: relative_time(row.age_secs),
        }
    }
}

pub fn admin_dashboard_response(data: AdminDashboardData) -> AdminDashboardResponse {
    let total = data.all_time.total_amount;
    let utilization = round_to(ratio_percent(data.total_utilized, total), 1);

    let top_categories = data
        .top_categories
        .into_iter()
        .map(|c| TopCategory {
            percentage: round_to(ratio_percent(c.total_amount, total), 1),
            category: c.category.unwrap_or_else(|| OTHER_CATEGORY.to_string()),
        })
        .collect();

    AdminDashboardResponse {
        stats: PlatformStats {
            total_donations: total,
            total_utilized: data.total_utilized,
            total_beneficiaries: data.all_time.donors,
            active_projects: data.all_time.ngos,
            growth_percent: round_to(
                growth_percent(data.this_month.total_amount, data.previous_month_total),
                1,
            ),
            utilization_percent: utilization,
        },
        fund_allocation: FundAllocation {
            utilized: utilization,
            available: round_to(100.0 - utilization, 1),
        },
        this_month: ThisMonth {
            donations: data.this_month.total_amount,
            utilized: data.this_month_utilized,
            beneficiaries: data.this_month.donors,
        },
        top_categories,
        recent_activities: data.recent_activities.into_iter().map(Into::into).collect(),
    }
}

pub async fn admin_dashboard<C: ConnectionTrait>(
    conn: &C,
) -> Result<AdminDashboardResponse, AppError> {
    let data = platform::admin_dashboard(conn).await?;
    Ok(admin_dashboard_response(data))
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TrendPoint {
    pub month: String,
    pub donations: f64,
    pub utilization: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CategoryDistribution {
    pub category: String,
    pub percentage: f64,
    pub amount: f64,
    pub count: i64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct WindowSummary {
    pub total_donations: f64,
    pub total_utilized: f64,
    pub active_donors: i64,
    pub total_donations_count: i64,
    pub total_utilizations: i64,
    pub growth_rate: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TopProject {
    pub project_name: String,
    pub amount_utilized: f64,
    pub beneficiaries: i64,
    pub utilization_count: i64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ImpactMetrics {
    pub total_beneficiaries: i64,
    pub active_projects: i64,
    pub completed_projects: i64,
    pub active_ngos: i64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct AllTimeStats {
    pub total_donations: f64,
    pub total_utilized: f64,
}

#[derive(Debug, Serialize)]
pub struct OverallReportResponse {
    pub monthly_trends: Vec<TrendPoint>,
    pub category_distribution: Vec<CategoryDistribution>,
    pub yearly_summary: WindowSummary,
    pub top_projects: Vec<TopProject>,
    pub impact_metrics: ImpactMetrics,
    pub all_time_stats: AllTimeStats,
}

impl From<CategoryShareRow> for CategoryDistribution {
    fn from(row: CategoryShareRow) -> Self {
        Self {
            percentage: round_to(ratio_percent(row.total_amount, row.window_total), 2),
            category: row.category.unwrap_or_else(|| OTHER_CATEGORY.to_string()),
            amount: row.total_amount,
            count: row.count,
        }
    }
}

pub fn overall_report_response(data: OverallReportData) -> OverallReportResponse {
    // Latest month against the one before it.
    let growth_rate = match data.monthly_trends.as_slice() {
        [.., previous, latest] if previous.donations > 0.0 => {
            round_to(growth_percent(latest.donations, previous.donations), 1)
        }
        _ => 0.0,
    };

    let summary = data.summary;
    let impact = data.impact;

    OverallReportResponse {
        monthly_trends: data
            .monthly_trends
            .into_iter()
            .map(|m| TrendPoint {
                month: m.month,
                donations: m.donations,
                utilization: m.utilization,
            })
            .collect(),
        category_distribution: data.categories.into_iter().map(Into::into).collect(),
        yearly_summary: WindowSummary {
            total_donations: summary.total_donations,
            total_utilized: summary.total_utilized,
            active_donors: summary.active_donors,
            total_donations_count: summary.total_donations_count,
            total_utilizations: summary.total_utilizations,
            growth_rate,
        },
        top_projects: data
            .top_projects
            .into_iter()
            .map(|p| TopProject {
                project_name: p.project_name.unwrap_or_else(|| "General".to_string()),
                amount_utilized: p.amount_utilized,
                beneficiaries: p.beneficiaries,
                utilization_count: p.utilization_count,
            })
            .collect(),
        impact_metrics: ImpactMetrics {
            total_beneficiaries: impact.total_beneficiaries,
            active_projects: impact.active_projects,
            completed_projects: impact.completed_projects,
            active_ngos: impact.active_ngos,
        },
        all_time_stats: AllTimeStats {
            total_donations: data.all_time_donations,
            total_utilized: data.all_time_utilized,
        },
    }
}

pub async fn overall_report<C: ConnectionTrait>(
    conn: &C,
) -> Result<OverallReportResponse, AppError> {
    let data = platform::overall_report(conn).await?;
    Ok(overall_report_response(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::platform::{DonationStatsRow, ImpactRow, MonthlyTrendRow, WindowSummaryRow};

    fn stats(total_amount: f64, donors: i64, ngos: i64) -> DonationStatsRow {
        DonationStatsRow {
            total_amount,
            donors,
            ngos,
            donations: 0,
        }
    }

    #[test]
    fn test_admin_dashboard_shaping() {
        let data = AdminDashboardData {
            all_time: stats(10_000.0, 12, 3),
            total_utilized: 2_500.0,
            this_month: stats(1_500.0, 4, 2),
            this_month_utilized: 300.0,
            previous_month_total: 1_000.0,
            top_categories: vec![CategoryShareRow {
                category: None,
                total_amount: 3_333.0,
                count: 7,
                window_total: 10_000.0,
            }],
            recent_activities: vec![
                ActivityRow {
                    kind: "donation".to_string(),
                    description: "New donation received from Asha".to_string(),
                    amount: Some(1234.6),
                    age_secs: 2 * 3600 + 5,
                },
                ActivityRow {
                    kind: "utilization".to_string(),
                    description: "Funds allocated to Project".to_string(),
                    amount: None,
                    age_secs: 60,
                },
            ],
        };

        let resp = admin_dashboard_response(data);
        assert_eq!(resp.stats.utilization_percent, 25.0);
        assert_eq!(resp.fund_allocation.available, 75.0);
        assert_eq!(resp.stats.growth_percent, 50.0);
        assert_eq!(resp.stats.total_beneficiaries, 12);
        assert_eq!(resp.stats.active_projects, 3);
        assert_eq!(resp.this_month.beneficiaries, 4);
        assert_eq!(resp.top_categories[0].category, "Other");
        assert_eq!(resp.top_categories[0].percentage, 33.3);
        assert_eq!(resp.recent_activities[0].amount, "₹1235");
        assert_eq!(resp.recent_activities[0].time, "2 hours ago");
        assert_eq!(resp.recent_activities[1].amount, "-");
        assert_eq!(resp.recent_activities[1].time, "1 minute ago");
    }

    fn trend(month: &str, donations: f64) -> MonthlyTrendRow {
        MonthlyTrendRow {
            month: month.to_string(),
            donations,
            utilization: 0.0,
        }
    }

    fn report(monthly_trends: Vec<MonthlyTrendRow>) -> OverallReportData {
        OverallReportData {
            monthly_trends,
            categories: vec![CategoryShareRow {
                category: Some("Education".to_string()),
                total_amount: 250.0,
                count: 2,
                window_total: 1000.0,
            }],
            summary: WindowSummaryRow::default(),
            top_projects: vec![],
            impact: ImpactRow::default(),
            all_time_donations: 5000.0,
            all_time_utilized: 1000.0,
        }
    }

    #[test]
    fn test_overall_growth_uses_last_two_months() {
        let resp = overall_report_response(report(vec![
            trend("Jan", 100.0),
            trend("Feb", 400.0),
            trend("Mar", 500.0),
        ]));
        assert_eq!(resp.yearly_summary.growth_rate, 25.0);
        assert_eq!(resp.monthly_trends[0].month, "Jan");
        assert_eq!(resp.category_distribution[0].percentage, 25.0);
        assert_eq!(resp.all_time_stats.total_donations, 5000.0);
    }

    #[test]
    fn test_overall_growth_needs_two_months() {
        let resp = overall_report_response(report(vec![trend("Mar", 500.0)]));
        assert_eq!(resp.yearly_summary.growth_rate, 0.0);

        let resp = overall_report_response(report(vec![trend("Feb", 0.0), trend("Mar", 500.0)]));
        assert_eq!(resp.yearly_summary.growth_rate, 0.0);
    }
}
