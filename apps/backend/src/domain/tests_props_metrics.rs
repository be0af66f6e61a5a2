//! Property tests for derived metrics.

use proptest::prelude::*;

use crate::domain::metrics::{
    donation_status, relative_time, transaction_ref, utilization_percent_capped,
};

proptest! {
    #[test]
    fn prop_capped_percent_stays_in_range(
        utilized in 0.0f64..1e9,
        amount in -1e6f64..1e9,
    ) {
        let p = utilization_percent_capped(utilized, amount);
        prop_assert!((0..=100).contains(&p), "got {p}");
        if amount <= 0.0 {
            prop_assert_eq!(p, 0);
        }
    }

    #[test]
    fn prop_status_agrees_with_percent(pct in -10.0f64..500.0) {
        let status = donation_status(pct);
        if pct >= 100.0 {
            prop_assert_eq!(status, "Fully Utilized");
        } else if pct > 0.0 {
            prop_assert_eq!(status, "Partially Utilized");
        } else {
            prop_assert_eq!(status, "In Progress");
        }
    }

    #[test]
    fn prop_transaction_ref_shape(id in 0i64..1_000_000_000) {
        let r = transaction_ref(id);
        prop_assert_eq!(r.len(), 12);
        prop_assert!(r.starts_with("TXN"));
        prop_assert_eq!(r[3..].parse::<i64>().unwrap(), id);
    }

    #[test]
    fn prop_relative_time_ends_with_ago(age in any::<i64>()) {
        prop_assert!(relative_time(age).ends_with(" ago"));
    }
}
