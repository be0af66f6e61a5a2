//! Report pages for an NGO and for a donor.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::domain::metrics::{chart_color, growth_percent, ratio_percent, round_to};
use crate::error::AppError;
use crate::repos::analytics::{self, DonorReportData, LabeledAmountRow, NgoReportData};

#[derive(Debug, Serialize, PartialEq)]
pub struct MonthlyPoint {
    pub month: String,
    pub donations: f64,
    pub utilized: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DonorShare {
    pub donor: Option<String>,
    pub amount: f64,
    pub percentage: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CategoryShare {
    pub category: Option<String>,
    pub amount: f64,
    pub utilized: f64,
    pub percentage: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct YearPoint {
    pub year: String,
    #[serde(rename = "totalDonations")]
    pub total_donations: f64,
    pub utilized: f64,
    pub donors: i64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct NgoStats {
    pub total_donations: f64,
    pub total_utilized: f64,
    pub active_donors: i64,
    pub avg_donation: f64,
    pub growth_percent: f64,
    pub utilization_percent: f64,
}

#[derive(Debug, Serialize)]
pub struct NgoReportResponse {
    pub monthly_data: Vec<MonthlyPoint>,
    pub donor_wise_data: Vec<DonorShare>,
    pub category_wise_data: Vec<CategoryShare>,
    pub yearly_comparison: Vec<YearPoint>,
    pub stats: NgoStats,
}

fn labeled_total(rows: &[LabeledAmountRow]) -> f64 {
    rows.iter().map(|r| r.amount).sum()
}

pub fn ngo_report_response(data: NgoReportData) -> NgoReportResponse {
    let utilized_by_month: HashMap<i64, f64> = data
        .monthly_utilized
        .iter()
        .map(|r| (r.month_num, r.amount))
        .collect();
    let monthly_data = data
        .monthly_donations
        .into_iter()
        .map(|r| MonthlyPoint {
            utilized: utilized_by_month.get(&r.month_num).copied().unwrap_or(0.0),
            month: r.month,
            donations: r.amount,
        })
        .collect();

    let donor_total = labeled_total(&data.top_donors);
    let donor_wise_data = data
        .top_donors
        .into_iter()
        .map(|r| DonorShare {
            percentage: round_to(ratio_percent(r.amount, donor_total), 0),
            donor: r.label,
            amount: r.amount,
        })
        .collect();

    let category_total: f64 = data.categories.iter().map(|c| c.amount).sum();
    let category_wise_data = data
        .categories
        .into_iter()
        .map(|c| CategoryShare {
            percentage: round_to(ratio_percent(c.amount, category_total), 0),
            category: c.category,
            amount: c.amount,
            utilized: c.utilized,
        })
        .collect();

    let utilized_by_year: HashMap<String, f64> = data
        .yearly_utilized
        .into_iter()
        .filter_map(|r| r.label.map(|year| (year, r.amount)))
        .collect();
    let yearly_comparison = data
        .yearly_donations
        .into_iter()
        .map(|r| YearPoint {
            utilized: utilized_by_year.get(&r.year).copied().unwrap_or(0.0),
            year: r.year,
            total_donations: r.total_donations,
            donors: r.donors,
        })
        .collect();

    let summary = data.summary;
    let avg_donation = if summary.donation_count > 0 {
        summary.total_donations / summary.donation_count as f64
    } else {
        0.0
    };

    NgoReportResponse {
        monthly_data,
        donor_wise_data,
        category_wise_data,
        yearly_comparison,
        stats: NgoStats {
            total_donations: summary.total_donations,
            total_utilized: data.total_utilized,
            active_donors: summary.distinct_count,
            avg_donation: round_to(avg_donation, 2),
            growth_percent: round_to(
                growth_percent(summary.total_donations, data.previous_year_total),
                1,
            ),
            utilization_percent: round_to(
                ratio_percent(data.total_utilized, summary.total_donations),
                0,
            ),
        },
    }
}

pub async fn ngo_report<C: ConnectionTrait>(
    conn: &C,
    ngo_id: i64,
) -> Result<NgoReportResponse, AppError> {
    let data = analytics::ngo_report(conn, ngo_id).await?;
    Ok(ngo_report_response(data))
}

#[derive(Debug, Serialize, PartialEq)]
pub struct MonthlyAmount {
    pub month: String,
    pub amount: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct NgoShare {
    pub ngo: Option<String>,
    pub amount: f64,
    pub percentage: f64,
    pub color: &'static str,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DonorStats {
    pub total_donated: f64,
    pub avg_monthly: f64,
    pub total_utilized: f64,
    pub ngos_supported: i64,
    pub growth_percent: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DonorInsights {
    pub top_ngo: Option<String>,
    pub top_ngo_amount: f64,
    pub top_ngo_percentage: f64,
    pub top_category: Option<String>,
    pub top_category_utilization: f64,
    pub growth_trend: f64,
}

#[derive(Debug, Serialize)]
pub struct DonorReportResponse {
    pub monthly_donations: Vec<MonthlyAmount>,
    pub donations_by_ngo: Vec<NgoShare>,
    pub utilization_by_category: Vec<CategoryShare>,
    pub stats: DonorStats,
    pub insights: DonorInsights,
}

const NOT_AVAILABLE: &str = "N/A";

pub fn donor_report_response(data: DonorReportData) -> DonorReportResponse {
    let monthly_donations = data
        .monthly_donations
        .into_iter()
        .map(|r| MonthlyAmount {
            month: r.month,
            amount: r.amount,
        })
        .collect();

    let ngo_total = labeled_total(&data.by_ngo);
    let donations_by_ngo: Vec<NgoShare> = data
        .by_ngo
        .into_iter()
        .enumerate()
        .map(|(rank, r)| NgoShare {
            percentage: round_to(ratio_percent(r.amount, ngo_total), 0),
            ngo: r.label,
            amount: r.amount,
            color: chart_color(rank),
        })
        .collect();

    // Share of each category that has been utilized, not share of total.
    let utilization_by_category: Vec<CategoryShare> = data
        .categories
        .into_iter()
        .map(|c| CategoryShare {
            percentage: round_to(ratio_percent(c.utilized, c.amount), 0),
            category: c.category,
            amount: c.amount,
            utilized: c.utilized,
        })
        .collect();

    let growth = growth_percent(data.last_six_months, data.previous_six_months);

    let insights = DonorInsights {
        top_ngo: donations_by_ngo
            .first()
            .map_or_else(|| Some(NOT_AVAILABLE.to_string()), |n| n.ngo.clone()),
        top_ngo_amount: donations_by_ngo.first().map_or(0.0, |n| n.amount),
        top_ngo_percentage: donations_by_ngo.first().map_or(0.0, |n| n.percentage),
        top_category: utilization_by_category
            .first()
            .map_or_else(|| Some(NOT_AVAILABLE.to_string()), |c| c.category.clone()),
        top_category_utilization: utilization_by_category.first().map_or(0.0, |c| c.percentage),
        growth_trend: round_to(growth, 0),
    };

    DonorReportResponse {
        monthly_donations,
        donations_by_ngo,
        utilization_by_category,
        stats: DonorStats {
            total_donated: data.summary.total_donations,
            avg_monthly: round_to(data.average_recent, 2),
            total_utilized: data.total_utilized,
            ngos_supported: data.summary.distinct_count,
            growth_percent: round_to(growth, 1),
        },
        insights,
    }
}

pub async fn donor_report<C: ConnectionTrait>(
    conn: &C,
    donor_id: i64,
) -> Result<DonorReportResponse, AppError> {
    let data = analytics::donor_report(conn, donor_id).await?;
    Ok(donor_report_response(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::analytics::{
        CategoryRow, DonationSummaryRow, MonthlyAmountRow, YearlyDonationRow,
    };

    fn month(name: &str, num: i64, amount: f64) -> MonthlyAmountRow {
        MonthlyAmountRow {
            month: name.to_string(),
            month_num: num,
            amount,
        }
    }

    fn labeled(label: &str, amount: f64) -> LabeledAmountRow {
        LabeledAmountRow {
            label: Some(label.to_string()),
            amount,
        }
    }

    #[test]
    fn test_ngo_report_joins_months_and_years() {
        let data = NgoReportData {
            monthly_donations: vec![month("Jan", 1, 1000.0), month("Mar", 3, 500.0)],
            monthly_utilized: vec![month("Mar", 3, 200.0), month("Apr", 4, 50.0)],
            top_donors: vec![labeled("Asha", 300.0), labeled("Ravi", 100.0)],
            categories: vec![CategoryRow {
                category: Some("Education".to_string()),
                amount: 1500.0,
                utilized: 250.0,
            }],
            yearly_donations: vec![YearlyDonationRow {
                year: "2024".to_string(),
                total_donations: 1500.0,
                donors: 2,
            }],
            yearly_utilized: vec![labeled("2024", 250.0)],
            summary: DonationSummaryRow {
                total_donations: 1500.0,
                donation_count: 4,
                distinct_count: 2,
            },
            total_utilized: 250.0,
            previous_year_total: 1000.0,
        };

        let resp = ngo_report_response(data);
        assert_eq!(resp.monthly_data.len(), 2);
        assert_eq!(resp.monthly_data[0].utilized, 0.0);
        assert_eq!(resp.monthly_data[1].utilized, 200.0);
        assert_eq!(resp.donor_wise_data[0].percentage, 75.0);
        assert_eq!(resp.category_wise_data[0].percentage, 100.0);
        assert_eq!(resp.yearly_comparison[0].utilized, 250.0);
        assert_eq!(resp.stats.avg_donation, 375.0);
        assert_eq!(resp.stats.growth_percent, 50.0);
        assert_eq!(resp.stats.utilization_percent, 17.0);
        assert_eq!(resp.stats.active_donors, 2);
    }

    fn empty_donor_data() -> DonorReportData {
        DonorReportData {
            monthly_donations: vec![],
            by_ngo: vec![],
            categories: vec![],
            summary: DonationSummaryRow::default(),
            total_utilized: 0.0,
            average_recent: 0.0,
            last_six_months: 0.0,
            previous_six_months: 0.0,
        }
    }

    #[test]
    fn test_donor_report_without_donations() {
        let resp = donor_report_response(empty_donor_data());
        assert_eq!(resp.insights.top_ngo.as_deref(), Some("N/A"));
        assert_eq!(resp.insights.top_category.as_deref(), Some("N/A"));
        assert_eq!(resp.stats.growth_percent, 0.0);
    }

    #[test]
    fn test_donor_report_shares_and_colors() {
        let data = DonorReportData {
            by_ngo: vec![
                labeled("A", 600.0),
                labeled("B", 200.0),
                labeled("C", 100.0),
                labeled("D", 50.0),
                labeled("E", 50.0),
            ],
            categories: vec![CategoryRow {
                category: Some("Health".to_string()),
                amount: 400.0,
                utilized: 100.0,
            }],
            last_six_months: 900.0,
            previous_six_months: 600.0,
            average_recent: 123.456,
            ..empty_donor_data()
        };

        let resp = donor_report_response(data);
        assert_eq!(resp.donations_by_ngo[0].percentage, 60.0);
        assert_eq!(resp.donations_by_ngo[0].color, chart_color(0));
        assert_eq!(resp.donations_by_ngo[4].color, chart_color(4));
        assert_eq!(resp.utilization_by_category[0].percentage, 25.0);
        assert_eq!(resp.insights.top_ngo.as_deref(), Some("A"));
        assert_eq!(resp.insights.top_category_utilization, 25.0);
        assert_eq!(resp.insights.growth_trend, 50.0);
        assert_eq!(resp.stats.avg_monthly, 123.46);
    }
}
