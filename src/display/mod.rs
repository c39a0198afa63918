//! Display formatting for terminal output
//!
//! Formatters return `String`s so command handlers stay thin and the output
//! can be tested without a terminal.

pub mod archive;
pub mod category;
pub mod expense;
pub mod status;

pub use archive::{format_archive_details, format_archive_list, format_archive_summary};
pub use category::format_category_list;
pub use expense::format_expense_list;
pub use status::format_status;

/// Truncate to `max` characters, marking the cut with "..."
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
