//! Rollover status display

use crate::services::detector::{MarkerState, RolloverCheck};
use crate::services::period::format_period_range;

/// Describe the current period and whether a rollover is pending
pub fn format_status(check: &RolloverCheck, user: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("User:           {}\n", user));
    output.push_str(&format!(
        "Current period: {} ({})\n",
        check.current_period.id,
        format_period_range(&check.current_period)
    ));

    let marker = match &check.marker {
        MarkerState::Absent => "(none)".to_string(),
        MarkerState::Stale(id) => id.to_string(),
        MarkerState::Current => check.current_period.id.to_string(),
        MarkerState::Ahead(id) => format!("{} (ahead of the clock)", id),
        MarkerState::Corrupt(raw) => format!("{:?} (unreadable)", raw),
    };
    output.push_str(&format!("Acknowledged:   {}\n", marker));

    if check.is_new {
        output.push_str("\nA new period has started. Run 'rollover archive' or 'rollover continue'.\n");
    } else {
        output.push_str("\nNo rollover pending.\n");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::detector::check_for_new_period;
    use chrono::NaiveDate;

    fn june_3rd() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_pending_rollover() {
        let check = check_for_new_period(Some("2024-05"), june_3rd(), 1);
        let output = format_status(&check, "alice");
        assert!(output.contains("Current period: 2024-06"));
        assert!(output.contains("Acknowledged:   2024-05"));
        assert!(output.contains("A new period has started"));
    }

    #[test]
    fn test_corrupt_marker() {
        let check = check_for_new_period(Some("garbage"), june_3rd(), 1);
        let output = format_status(&check, "alice");
        assert!(output.contains("\"garbage\" (unreadable)"));
        assert!(output.contains("No rollover pending."));
    }
}
