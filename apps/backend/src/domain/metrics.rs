//! Derived figures shown on dashboards and reports.
//!
//! Amounts arrive from the store as `f64` (SQL casts them to `float8`).
//! Every division guards its denominator so an empty store renders zeros.

pub const STATUS_FULLY_UTILIZED: &str = "Fully Utilized";
pub const STATUS_PARTIALLY_UTILIZED: &str = "Partially Utilized";
pub const STATUS_IN_PROGRESS: &str = "In Progress";

pub const STATUS_COMPLETED: &str = "Completed";
pub const STATUS_PENDING: &str = "Pending";

/// Colour classes for the donor "by NGO" chart, assigned by rank.
pub const CHART_COLORS: [&str; 5] = [
    "bg-blue-500",
    "bg-green-500",
    "bg-purple-500",
    "bg-orange-500",
    "bg-gray-500",
];

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;

/// Whole percent of `amount` that has been utilized, truncated and capped
/// at 100. Zero when `amount <= 0`.
pub fn utilization_percent_capped(utilized: f64, amount: f64) -> i64 {
    utilization_percent(utilized, amount).min(100)
}

/// Whole percent, truncated, not capped (projects may be over budget).
pub fn utilization_percent(utilized: f64, amount: f64) -> i64 {
    if amount <= 0.0 {
        return 0;
    }
    (utilized / amount * 100.0).trunc() as i64
}

/// `part / whole * 100`, or 0 when `whole <= 0`.
pub fn ratio_percent(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// Relative change from `previous` to `current`, or 0 when `previous <= 0`.
pub fn growth_percent(current: f64, previous: f64) -> f64 {
    if previous <= 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

/// Round half away from zero at `places` decimals.
pub fn round_to(x: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (x * factor).round() / factor
}

pub fn donation_status(utilized_percent: f64) -> &'static str {
    if utilized_percent >= 100.0 {
        STATUS_FULLY_UTILIZED
    } else if utilized_percent > 0.0 {
        STATUS_PARTIALLY_UTILIZED
    } else {
        STATUS_IN_PROGRESS
    }
}

pub fn utilization_status(amount_utilized: f64) -> &'static str {
    if amount_utilized > 0.0 {
        STATUS_COMPLETED
    } else {
        STATUS_PENDING
    }
}

/// Display reference for a donation; not stored.
pub fn transaction_ref(donation_id: i64) -> String {
    format!("TXN{donation_id:09}")
}

/// "3 days ago", "1 hour ago", "0 minutes ago". Future instants count as now.
pub fn relative_time(age_secs: i64) -> String {
    let age = age_secs.max(0);
    let (n, unit) = if age >= SECS_PER_DAY {
        (age / SECS_PER_DAY, "day")
    } else if age >= SECS_PER_HOUR {
        (age / SECS_PER_HOUR, "hour")
    } else {
        (age / SECS_PER_MINUTE, "minute")
    };
    let plural = if n == 1 { "" } else { "s" };
    format!("{n} {unit}{plural} ago")
}

/// Prefix a notification message with an icon for its type.
pub fn notification_label(kind: &str, message: &str) -> String {
    let icon = match kind.to_ascii_lowercase().as_str() {
        "donation" => "🎁",
        "project_creation" => "📋",
        "fund_utilization" => "💰",
        _ => "📢",
    };
    format!("{icon} {message}")
}

/// `₹1235` for 1234.6.
pub fn format_rupees(amount: f64) -> String {
    format!("₹{}", amount.round() as i64)
}

pub fn chart_color(rank: usize) -> &'static str {
    CHART_COLORS[rank % CHART_COLORS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utilization_percent_capped() {
        assert_eq!(utilization_percent_capped(0.0, 0.0), 0);
        assert_eq!(utilization_percent_capped(50.0, -10.0), 0);
        assert_eq!(utilization_percent_capped(333.0, 1000.0), 33);
        assert_eq!(utilization_percent_capped(999.99, 1000.0), 99);
        assert_eq!(utilization_percent_capped(1500.0, 1000.0), 100);
        assert_eq!(utilization_percent(1500.0, 1000.0), 150);
    }

    #[test]
    fn test_ratio_and_growth_guard_zero() {
        assert_eq!(ratio_percent(5.0, 0.0), 0.0);
        assert_eq!(ratio_percent(25.0, 200.0), 12.5);
        assert_eq!(growth_percent(100.0, 0.0), 0.0);
        assert_eq!(growth_percent(150.0, 100.0), 50.0);
        assert_eq!(growth_percent(50.0, 100.0), -50.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(33.333, 1), 33.3);
        assert_eq!(round_to(66.666, 0), 67.0);
        assert_eq!(round_to(12.345_678, 2), 12.35);
        assert_eq!(round_to(-2.5, 0), -3.0);
    }

    #[test]
    fn test_donation_status_thresholds() {
        assert_eq!(donation_status(0.0), "In Progress");
        assert_eq!(donation_status(0.1), "Partially Utilized");
        assert_eq!(donation_status(99.9), "Partially Utilized");
        assert_eq!(donation_status(100.0), "Fully Utilized");
        assert_eq!(donation_status(140.0), "Fully Utilized");
    }

    #[test]
    fn test_utilization_status() {
        assert_eq!(utilization_status(0.0), "Pending");
        assert_eq!(utilization_status(10.0), "Completed");
    }

    #[test]
    fn test_transaction_ref_is_zero_padded() {
        assert_eq!(transaction_ref(42), "TXN000000042");
        assert_eq!(transaction_ref(1_234_567_890), "TXN1234567890");
    }

    #[test]
    fn test_relative_time() {
        assert_eq!(relative_time(-30), "0 minutes ago");
        assert_eq!(relative_time(59), "0 minutes ago");
        assert_eq!(relative_time(60), "1 minute ago");
        assert_eq!(relative_time(45 * 60), "45 minutes ago");
        assert_eq!(relative_time(3600), "1 hour ago");
        assert_eq!(relative_time(5 * 3600 + 59), "5 hours ago");
        assert_eq!(relative_time(86_400), "1 day ago");
        assert_eq!(relative_time(3 * 86_400 + 7200), "3 days ago");
    }

    #[test]
    fn test_notification_label() {
        assert_eq!(notification_label("DONATION", "New gift"), "🎁 New gift");
        assert_eq!(notification_label("project_creation", "p"), "📋 p");
        assert_eq!(notification_label("fund_utilization", "f"), "💰 f");
        assert_eq!(notification_label("", "hello"), "📢 hello");
    }

    #[test]
    fn test_format_rupees() {
        assert_eq!(format_rupees(1234.6), "₹1235");
        assert_eq!(format_rupees(500.0), "₹500");
    }

    #[test]
    fn test_chart_color_rotates() {
        assert_eq!(chart_color(0), "bg-blue-500");
        assert_eq!(chart_color(4), "bg-gray-500");
        assert_eq!(chart_color(5), "bg-blue-500");
    }
}
