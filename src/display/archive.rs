//! Archive record display formatting

use super::expense::format_expense_list;
use crate::models::ArchiveRecord;
use crate::services::archive::ArchiveSummary;
use crate::services::period::{format_period_range, period_with_id};

/// One line per archived period
pub fn format_archive_list(records: &[ArchiveRecord], start_day: u32, currency_symbol: &str) -> String {
    if records.is_empty() {
        return "No archived periods.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:8} {:30} {:>8} {:>12}  {}\n",
        "Period", "Range", "Expenses", "Total", "Archived"
    ));
    output.push_str(&"-".repeat(80));
    output.push('\n');

    for record in records {
        let period = period_with_id(record.period_id, start_day);
        output.push_str(&format!(
            "{:8} {:30} {:>8} {:>12}  {}\n",
            record.period_id.to_string(),
            format_period_range(&period),
            record.snapshot.len(),
            record.total().format_with_symbol(currency_symbol),
            record.archived_at.format("%Y-%m-%d %H:%M UTC")
        ));
    }

    output
}

/// Header plus the snapshot register
pub fn format_archive_details(record: &ArchiveRecord, start_day: u32, currency_symbol: &str) -> String {
    let period = period_with_id(record.period_id, start_day);
    let mut output = String::new();
    output.push_str(&format!("Archive:  {}\n", record.period_id));
    output.push_str(&format!("Range:    {}\n", format_period_range(&period)));
    output.push_str(&format!(
        "Archived: {}\n\n",
        record.archived_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format_expense_list(&record.snapshot, currency_symbol));
    output
}

/// Result of an archive run
pub fn format_archive_summary(summary: &ArchiveSummary) -> String {
    let mut output = String::new();

    if summary.archived.is_empty() {
        output.push_str("No new archive records written.\n");
    } else {
        let ids: Vec<String> = summary.archived.iter().map(|id| id.to_string()).collect();
        output.push_str(&format!("Archived period(s): {}\n", ids.join(", ")));
    }

    if !summary.already_archived.is_empty() {
        let ids: Vec<String> = summary
            .already_archived
            .iter()
            .map(|id| id.to_string())
            .collect();
        output.push_str(&format!("Already archived:   {}\n", ids.join(", ")));
    }

    output.push_str(&format!(
        "Moved {} expense(s) out of the working set.\n",
        summary.expenses_removed
    ));
    if summary.stranded > 0 {
        output.push_str(&format!(
            "Left {} expense(s) in the working set: their period was archived without them.\n",
            summary.stranded
        ));
    }
    output.push_str(&format!(
        "Current period: {} ({})\n",
        summary.current_period.id,
        format_period_range(&summary.current_period)
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expense, ExpenseId, Money, PeriodId};
    use chrono::NaiveDate;

    fn record() -> ArchiveRecord {
        ArchiveRecord::new(
            PeriodId::new(2024, 5),
            vec![Expense {
                id: ExpenseId::new(),
                date: NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
                category: "Fuel".into(),
                amount: Money::from_cents(4000),
                note: String::new(),
            }],
        )
    }

    #[test]
    fn test_archive_list() {
        let output = format_archive_list(&[record()], 15, "$");
        assert!(output.contains("2024-05"));
        assert!(output.contains("May 15, 2024 - Jun 14, 2024"));
        assert!(output.contains("$40.00"));
    }

    #[test]
    fn test_archive_details() {
        let output = format_archive_details(&record(), 1, "$");
        assert!(output.starts_with("Archive:  2024-05\n"));
        assert!(output.contains("Fuel"));
    }

    #[test]
    fn test_summary() {
        let summary = ArchiveSummary {
            current_period: period_with_id(PeriodId::new(2024, 6), 1),
            archived: vec![PeriodId::new(2024, 5)],
            already_archived: Vec::new(),
            expenses_removed: 3,
            stranded: 0,
            marker: PeriodId::new(2024, 6),
        };
        let output = format_archive_summary(&summary);
        assert!(output.contains("Archived period(s): 2024-05"));
        assert!(output.contains("Moved 3 expense(s)"));
        assert!(!output.contains("Already archived"));
        assert!(!output.contains("Left"));
    }

    #[test]
    fn test_summary_reports_stranded_expenses() {
        let summary = ArchiveSummary {
            current_period: period_with_id(PeriodId::new(2024, 7), 1),
            archived: Vec::new(),
            already_archived: vec![PeriodId::new(2024, 5)],
            expenses_removed: 0,
            stranded: 2,
            marker: PeriodId::new(2024, 7),
        };
        let output = format_archive_summary(&summary);
        assert!(output.contains("Already archived:   2024-05"));
        assert!(output.contains("Left 2 expense(s) in the working set"));
    }
}
