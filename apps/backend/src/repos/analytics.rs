//! Aggregates behind the NGO and donor report pages.

use sea_orm::{ConnectionTrait, FromQueryResult, Value};

use super::{fetch_total, pg};
use crate::error::AppError;

#[derive(Debug, Clone, FromQueryResult)]
pub struct MonthlyAmountRow {
    /// Short month name (`Jan`).
    pub month: String,
    pub month_num: i64,
    pub amount: f64,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct LabeledAmountRow {
    pub label: Option<String>,
    pub amount: f64,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct CategoryRow {
    pub category: Option<String>,
    pub amount: f64,
    pub utilized: f64,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct YearlyDonationRow {
    pub year: String,
    pub total_donations: f64,
    pub donors: i64,
}

#[derive(Debug, Clone, Default, FromQueryResult)]
pub struct DonationSummaryRow {
    pub total_donations: f64,
    pub donation_count: i64,
    pub distinct_count: i64,
}

#[derive(Debug, Clone)]
pub struct NgoReportData {
    pub monthly_donations: Vec<MonthlyAmountRow>,
    pub monthly_utilized: Vec<MonthlyAmountRow>,
    pub top_donors: Vec<LabeledAmountRow>,
    pub categories: Vec<CategoryRow>,
    pub yearly_donations: Vec<YearlyDonationRow>,
    pub yearly_utilized: Vec<LabeledAmountRow>,
    /// Current year; `distinct_count` is active donors.
    pub summary: DonationSummaryRow,
    pub total_utilized: f64,
    pub previous_year_total: f64,
}

#[derive(Debug, Clone)]
pub struct DonorReportData {
    pub monthly_donations: Vec<MonthlyAmountRow>,
    pub by_ngo: Vec<LabeledAmountRow>,
    pub categories: Vec<CategoryRow>,
    /// All time; `distinct_count` is NGOs supported.
    pub summary: DonationSummaryRow,
    pub total_utilized: f64,
    pub average_recent: f64,
    pub last_six_months: f64,
    pub previous_six_months: f64,
}

/// Per-donation utilization, so joining it never repeats donation amounts.
const UTILIZED_PER_DONATION: &str = "\
    LEFT JOIN (SELECT donation_id, SUM(amount_utilized) AS utilized \
               FROM utilizations GROUP BY donation_id) u \
    ON d.donation_id = u.donation_id";

pub async fn ngo_report<C: ConnectionTrait>(
    conn: &C,
    ngo_id: i64,
) -> Result<NgoReportData, AppError> {
    let id = || vec![Value::from(ngo_id)];

    let monthly_donations = MonthlyAmountRow::find_by_statement(pg(
        "SELECT TO_CHAR(donated_at, 'Mon') AS month, \
                EXTRACT(MONTH FROM donated_at)::bigint AS month_num, \
                COALESCE(SUM(amount), 0)::float8 AS amount \
         FROM donations \
         WHERE ngo_id = $1 AND EXTRACT(YEAR FROM donated_at) = EXTRACT(YEAR FROM CURRENT_DATE) \
         GROUP BY month_num, TO_CHAR(donated_at, 'Mon') \
         ORDER BY month_num",
        id(),
    ))
    .all(conn)
    .await?;

    let monthly_utilized = MonthlyAmountRow::find_by_statement(pg(
        "SELECT TO_CHAR(utilized_at, 'Mon') AS month, \
                EXTRACT(MONTH FROM utilized_at)::bigint AS month_num, \
                COALESCE(SUM(amount_utilized), 0)::float8 AS amount \
         FROM utilizations \
         WHERE ngo_id = $1 AND EXTRACT(YEAR FROM utilized_at) = EXTRACT(YEAR FROM CURRENT_DATE) \
         GROUP BY month_num, TO_CHAR(utilized_at, 'Mon') \
         ORDER BY month_num",
        id(),
    ))
    .all(conn)
    .await?;

    let top_donors = LabeledAmountRow::find_by_statement(pg(
        "SELECT dn.name AS label, COALESCE(SUM(d.amount), 0)::float8 AS amount \
         FROM donations d \
         JOIN donors dn ON d.donor_id = dn.donor_id \
         WHERE d.ngo_id = $1 \
         GROUP BY dn.name \
         ORDER BY amount DESC \
         LIMIT 6",
        id(),
    ))
    .all(conn)
    .await?;

    let categories = CategoryRow::find_by_statement(pg(
        &format!(
            "SELECT d.purpose AS category, \
                    COALESCE(SUM(d.amount), 0)::float8 AS amount, \
                    COALESCE(SUM(u.utilized), 0)::float8 AS utilized \
             FROM donations d {UTILIZED_PER_DONATION} \
             WHERE d.ngo_id = $1 \
             GROUP BY d.purpose \
             ORDER BY amount DESC \
             LIMIT 5"
        ),
        id(),
    ))
    .all(conn)
    .await?;

    let yearly_donations = YearlyDonationRow::find_by_statement(pg(
        "SELECT EXTRACT(YEAR FROM donated_at)::bigint::text AS year, \
                COALESCE(SUM(amount), 0)::float8 AS total_donations, \
                COUNT(DISTINCT donor_id)::bigint AS donors \
         FROM donations \
         WHERE ngo_id = $1 AND donated_at >= CURRENT_DATE - INTERVAL '3 years' \
         GROUP BY year \
         ORDER BY year",
        id(),
    ))
    .all(conn)
    .await?;

    let yearly_utilized = LabeledAmountRow::find_by_statement(pg(
        "SELECT EXTRACT(YEAR FROM utilized_at)::bigint::text AS label, \
                COALESCE(SUM(amount_utilized), 0)::float8 AS amount \
         FROM utilizations \
         WHERE ngo_id = $1 AND utilized_at >= CURRENT_DATE - INTERVAL '3 years' \
         GROUP BY label \
         ORDER BY label",
        id(),
    ))
    .all(conn)
    .await?;

    let summary = DonationSummaryRow::find_by_statement(pg(
        "SELECT COALESCE(SUM(amount), 0)::float8 AS total_donations, \
                COUNT(*)::bigint AS donation_count, \
                COUNT(DISTINCT donor_id)::bigint AS distinct_count \
         FROM donations \
         WHERE ngo_id = $1 AND EXTRACT(YEAR FROM donated_at) = EXTRACT(YEAR FROM CURRENT_DATE)",
        id(),
    ))
    .one(conn)
    .await?
    .unwrap_or_default();

    let total_utilized = fetch_total(
        conn,
        pg(
            "SELECT COALESCE(SUM(amount_utilized), 0)::float8 AS total \
             FROM utilizations \
             WHERE ngo_id = $1 \
               AND EXTRACT(YEAR FROM utilized_at) = EXTRACT(YEAR FROM CURRENT_DATE)",
            id(),
        ),
    )
    .await?;

    let previous_year_total = fetch_total(
        conn,
        pg(
            "SELECT COALESCE(SUM(amount), 0)::float8 AS total \
             FROM donations \
             WHERE ngo_id = $1 \
               AND EXTRACT(YEAR FROM donated_at) = EXTRACT(YEAR FROM CURRENT_DATE) - 1",
            id(),
        ),
    )
    .await?;

    Ok(NgoReportData {
        monthly_donations,
        monthly_utilized,
        top_donors,
        categories,
        yearly_donations,
        yearly_utilized,
        summary,
        total_utilized,
        previous_year_total,
    })
}

pub async fn donor_report<C: ConnectionTrait>(
    conn: &C,
    donor_id: i64,
) -> Result<DonorReportData, AppError> {
    let id = || vec![Value::from(donor_id)];

    let monthly_donations = MonthlyAmountRow::find_by_statement(pg(
        "SELECT TO_CHAR(donated_at, 'Mon') AS month, \
                EXTRACT(MONTH FROM donated_at)::bigint AS month_num, \
                COALESCE(SUM(amount), 0)::float8 AS amount \
         FROM donations \
         WHERE donor_id = $1 AND donated_at >= CURRENT_DATE - INTERVAL '6 months' \
         GROUP BY month_num, TO_CHAR(donated_at, 'Mon') \
         ORDER BY month_num",
        id(),
    ))
    .all(conn)
    .await?;

    let by_ngo = LabeledAmountRow::find_by_statement(pg(
        "SELECT n.name AS label, COALESCE(SUM(d.amount), 0)::float8 AS amount \
         FROM donations d \
         JOIN ngos n ON d.ngo_id = n.ngo_id \
         WHERE d.donor_id = $1 \
         GROUP BY n.name \
         ORDER BY amount DESC \
         LIMIT 5",
        id(),
    ))
    .all(conn)
    .await?;

    let categories = CategoryRow::find_by_statement(pg(
        &format!(
            "SELECT d.purpose AS category, \
                    COALESCE(SUM(d.amount), 0)::float8 AS amount, \
                    COALESCE(SUM(u.utilized), 0)::float8 AS utilized \
             FROM donations d {UTILIZED_PER_DONATION} \
             WHERE d.donor_id = $1 \
             GROUP BY d.purpose \
             ORDER BY amount DESC \
             LIMIT 5"
        ),
        id(),
    ))
    .all(conn)
    .await?;

    let summary = DonationSummaryRow::find_by_statement(pg(
        "SELECT COALESCE(SUM(amount), 0)::float8 AS total_donations, \
                COUNT(*)::bigint AS donation_count, \
                COUNT(DISTINCT ngo_id)::bigint AS distinct_count \
         FROM donations \
         WHERE donor_id = $1",
        id(),
    ))
    .one(conn)
    .await?
    .unwrap_or_default();

    let total_utilized = fetch_total(
        conn,
        pg(
            "SELECT COALESCE(SUM(u.amount_utilized), 0)::float8 AS total \
             FROM donations d \
             JOIN utilizations u ON d.donation_id = u.donation_id \
             WHERE d.donor_id = $1",
            id(),
        ),
    )
    .await?;

    let average_recent = fetch_total(
        conn,
        pg(
            "SELECT COALESCE(AVG(amount), 0)::float8 AS total \
             FROM donations \
             WHERE donor_id = $1 AND donated_at >= CURRENT_DATE - INTERVAL '6 months'",
            id(),
        ),
    )
    .await?;

    let last_six_months = fetch_total(
        conn,
        pg(
            "SELECT COALESCE(SUM(amount), 0)::float8 AS total \
             FROM donations \
             WHERE donor_id = $1 AND donated_at >= CURRENT_DATE - INTERVAL '6 months'",
            id(),
        ),
    )
    .await?;

    let previous_six_months = fetch_total(
        conn,
        pg(
            "SELECT COALESCE(SUM(amount), 0)::float8 AS total \
             FROM donations \
             WHERE donor_id = $1 \
               AND donated_at >= CURRENT_DATE - INTERVAL '12 months' \
               AND donated_at < CURRENT_DATE - INTERVAL '6 months'",
            id(),
        ),
    )
    .await?;

    Ok(DonorReportData {
        monthly_donations,
        by_ngo,
        categories,
        summary,
        total_utilized,
        average_recent,
        last_six_months,
        previous_six_months,
    })
}
