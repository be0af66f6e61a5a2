//! Platform-wide aggregates for the admin dashboard and overall report.

use sea_orm::{ConnectionTrait, FromQueryResult};

use super::{fetch_total, pg};
use crate::error::AppError;

/// Window used by the overall report.
const REPORT_WINDOW: &str = "NOW() - INTERVAL '180 days'";

#[derive(Debug, Clone, Default, FromQueryResult)]
pub struct DonationStatsRow {
    pub total_amount: f64,
    pub donors: i64,
    pub ngos: i64,
    pub donations: i64,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct CategoryShareRow {
    pub category: Option<String>,
    pub total_amount: f64,
    pub count: i64,
    /// Sum over every category, not just the rows returned.
    pub window_total: f64,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct ActivityRow {
    pub kind: String,
    pub description: String,
    pub amount: Option<f64>,
    pub age_secs: i64,
}

#[derive(Debug, Clone)]
pub struct AdminDashboardData {
    pub all_time: DonationStatsRow,
    pub total_utilized: f64,
    pub this_month: DonationStatsRow,
    pub this_month_utilized: f64,
    pub previous_month_total: f64,
    pub top_categories: Vec<CategoryShareRow>,
    pub recent_activities: Vec<ActivityRow>,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct MonthlyTrendRow {
    pub month: String,
    pub donations: f64,
    pub utilization: f64,
}

#[derive(Debug, Clone, Default, FromQueryResult)]
pub struct WindowSummaryRow {
    pub total_donations: f64,
    pub total_utilized: f64,
    pub active_donors: i64,
    pub total_donations_count: i64,
    pub total_utilizations: i64,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct TopProjectRow {
    pub project_name: Option<String>,
    pub amount_utilized: f64,
    pub beneficiaries: i64,
    pub utilization_count: i64,
}

#[derive(Debug, Clone, Default, FromQueryResult)]
pub struct ImpactRow {
    pub total_beneficiaries: i64,
    pub active_projects: i64,
    pub completed_projects: i64,
    pub active_ngos: i64,
}

#[derive(Debug, Clone)]
pub struct OverallReportData {
    /// Oldest month first.
    pub monthly_trends: Vec<MonthlyTrendRow>,
    pub categories: Vec<CategoryShareRow>,
    pub summary: WindowSummaryRow,
    pub top_projects: Vec<TopProjectRow>,
    pub impact: ImpactRow,
    pub all_time_donations: f64,
    pub all_time_utilized: f64,
}

const DONATION_STATS: &str = "\
    SELECT COALESCE(SUM(amount), 0)::float8 AS total_amount, \
           COUNT(DISTINCT donor_id)::bigint AS donors, \
           COUNT(DISTINCT ngo_id)::bigint AS ngos, \
           COUNT(DISTINCT donation_id)::bigint AS donations \
    FROM donations";

const IN_CURRENT_MONTH: &str = "\
    EXTRACT(MONTH FROM {col}) = EXTRACT(MONTH FROM CURRENT_DATE) \
    AND EXTRACT(YEAR FROM {col}) = EXTRACT(YEAR FROM CURRENT_DATE)";

fn in_current_month(col: &str) -> String {
    IN_CURRENT_MONTH.replace("{col}", col)
}

pub async fn admin_dashboard<C: ConnectionTrait>(
    conn: &C,
) -> Result<AdminDashboardData, AppError> {
    let all_time = DonationStatsRow::find_by_statement(pg(DONATION_STATS, vec![]))
        .one(conn)
        .await?
        .unwrap_or_default();

    let total_utilized = fetch_total(
        conn,
        pg(
            "SELECT COALESCE(SUM(amount_utilized), 0)::float8 AS total FROM utilizations",
            vec![],
        ),
    )
    .await?;

    let this_month = DonationStatsRow::find_by_statement(pg(
        &format!("{DONATION_STATS} WHERE {}", in_current_month("donated_at")),
        vec![],
    ))
    .one(conn)
    .await?
    .unwrap_or_default();

    let this_month_utilized = fetch_total(
        conn,
        pg(
            &format!(
                "SELECT COALESCE(SUM(amount_utilized), 0)::float8 AS total \
                 FROM utilizations WHERE {}",
                in_current_month("utilized_at")
            ),
            vec![],
        ),
    )
    .await?;

    let previous_month_total = fetch_total(
        conn,
        pg(
            "SELECT COALESCE(SUM(amount), 0)::float8 AS total \
             FROM donations \
             WHERE donated_at >= DATE_TRUNC('month', CURRENT_DATE - INTERVAL '1 month') \
               AND donated_at < DATE_TRUNC('month', CURRENT_DATE)",
            vec![],
        ),
    )
    .await?;

    let top_categories = CategoryShareRow::find_by_statement(pg(
        "SELECT purpose AS category, \
                COALESCE(SUM(amount), 0)::float8 AS total_amount, \
                COUNT(*)::bigint AS count, \
                COALESCE(SUM(SUM(amount)) OVER (), 0)::float8 AS window_total \
         FROM donations \
         GROUP BY purpose \
         ORDER BY total_amount DESC \
         LIMIT 3",
        vec![],
    ))
    .all(conn)
    .await?;

    let recent_activities = ActivityRow::find_by_statement(pg(
        "SELECT kind, description, amount, \
                EXTRACT(EPOCH FROM (NOW() - at))::bigint AS age_secs \
         FROM ( \
             (SELECT 'donation' AS kind, \
                     CONCAT('New donation received from ', COALESCE(dn.name, 'Anonymous')) AS description, \
                     d.amount::float8 AS amount, \
                     d.donated_at AS at \
              FROM donations d \
              LEFT JOIN donors dn ON d.donor_id = dn.donor_id \
              ORDER BY d.donated_at DESC \
              LIMIT 3) \
             UNION ALL \
             (SELECT 'utilization' AS kind, \
                     CONCAT('Funds allocated to ', COALESCE(u.purpose, 'Project')) AS description, \
                     u.amount_utilized::float8 AS amount, \
                     u.utilized_at AS at \
              FROM utilizations u \
              ORDER BY u.utilized_at DESC \
              LIMIT 2) \
         ) activity \
         ORDER BY at DESC \
         LIMIT 5",
        vec![],
    ))
    .all(conn)
    .await?;

    Ok(AdminDashboardData {
        all_time,
        total_utilized,
        this_month,
        this_month_utilized,
        previous_month_total,
        top_categories,
        recent_activities,
    })
}

pub async fn overall_report<C: ConnectionTrait>(
    conn: &C,
) -> Result<OverallReportData, AppError> {
    let monthly_trends = MonthlyTrendRow::find_by_statement(pg(
        &format!(
            "WITH monthly AS ( \
                 SELECT DATE_TRUNC('month', d.donated_at) AS month_start, \
                        COALESCE(SUM(d.amount), 0)::float8 AS donations, \
                        COALESCE(SUM(u.utilized), 0)::float8 AS utilization \
                 FROM donations d \
                 LEFT JOIN (SELECT donation_id, SUM(amount_utilized) AS utilized \
                            FROM utilizations GROUP BY donation_id) u \
                   ON d.donation_id = u.donation_id \
                 WHERE d.donated_at >= {REPORT_WINDOW} \
                 GROUP BY month_start \
                 ORDER BY month_start DESC \
                 LIMIT 6 \
             ) \
             SELECT TO_CHAR(month_start, 'Mon') AS month, donations, utilization \
             FROM monthly \
             ORDER BY month_start ASC"
        ),
        vec![],
    ))
    .all(conn)
    .await?;

    let categories = CategoryShareRow::find_by_statement(pg(
        &format!(
            "SELECT purpose AS category, \
                    COALESCE(SUM(amount), 0)::float8 AS total_amount, \
                    COUNT(*)::bigint AS count, \
                    COALESCE(SUM(SUM(amount)) OVER (), 0)::float8 AS window_total \
             FROM donations \
             WHERE donated_at >= {REPORT_WINDOW} \
             GROUP BY purpose \
             ORDER BY total_amount DESC \
             LIMIT 10"
        ),
        vec![],
    ))
    .all(conn)
    .await?;

    let summary = WindowSummaryRow::find_by_statement(pg(
        &format!(
            "SELECT COALESCE(SUM(d.amount), 0)::float8 AS total_donations, \
                    COALESCE(SUM(u.utilized), 0)::float8 AS total_utilized, \
                    COUNT(DISTINCT d.donor_id)::bigint AS active_donors, \
                    COUNT(*)::bigint AS total_donations_count, \
                    COALESCE(SUM(u.entries), 0)::bigint AS total_utilizations \
             FROM donations d \
             LEFT JOIN (SELECT donation_id, SUM(amount_utilized) AS utilized, COUNT(*) AS entries \
                        FROM utilizations GROUP BY donation_id) u \
               ON d.donation_id = u.donation_id \
             WHERE d.donated_at >= {REPORT_WINDOW}"
        ),
        vec![],
    ))
    .one(conn)
    .await?
    .unwrap_or_default();

    let top_projects = TopProjectRow::find_by_statement(pg(
        &format!(
            "SELECT COALESCE(p.name, u.purpose, 'General Project') AS project_name, \
                    COALESCE(SUM(u.amount_utilized), 0)::float8 AS amount_utilized, \
                    COALESCE(SUM(u.beneficiaries), 0)::bigint AS beneficiaries, \
                    COUNT(DISTINCT u.utilization_id)::bigint AS utilization_count \
             FROM utilizations u \
             LEFT JOIN projects p ON u.project_id = p.project_id \
             WHERE u.utilized_at >= {REPORT_WINDOW} \
             GROUP BY p.project_id, p.name, u.purpose \
             ORDER BY amount_utilized DESC \
             LIMIT 5"
        ),
        vec![],
    ))
    .all(conn)
    .await?;

    let impact = ImpactRow::find_by_statement(pg(
        &format!(
            "SELECT COALESCE(SUM(u.beneficiaries), 0)::bigint AS total_beneficiaries, \
                    COUNT(DISTINCT u.project_id)::bigint AS active_projects, \
                    COUNT(DISTINCT CASE WHEN u.amount_utilized > 0 THEN u.utilization_id END)::bigint \
                        AS completed_projects, \
                    COUNT(DISTINCT u.ngo_id)::bigint AS active_ngos \
             FROM utilizations u \
             WHERE u.utilized_at >= {REPORT_WINDOW}"
        ),
        vec![],
    ))
    .one(conn)
    .await?
    .unwrap_or_default();

    let all_time_donations = fetch_total(
        conn,
        pg(
            "SELECT COALESCE(SUM(amount), 0)::float8 AS total FROM donations",
            vec![],
        ),
    )
    .await?;

    let all_time_utilized = fetch_total(
        conn,
        pg(
            "SELECT COALESCE(SUM(amount_utilized), 0)::float8 AS total FROM utilizations",
            vec![],
        ),
    )
    .await?;

    Ok(OverallReportData {
        monthly_trends,
        categories,
        summary,
        top_projects,
        impact,
        all_time_donations,
        all_time_utilized,
    })
}
