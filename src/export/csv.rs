//! CSV export of an archive record

use std::io::Write;

use crate::error::{RolloverError, RolloverResult};
use crate::models::ArchiveRecord;

const HEADER: [&str; 6] = ["Period", "ID", "Date", "Category", "Amount", "Note"];

/// Write one row per archived expense
pub fn export_archive_csv<W: Write>(record: &ArchiveRecord, writer: W) -> RolloverResult<()> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);
    let export_err = |e: ::csv::Error| RolloverError::Export(e.to_string());

    csv_writer.write_record(HEADER).map_err(export_err)?;

    let period = record.period_id.to_string();
    for expense in &record.snapshot {
        let id = expense.id.as_uuid().to_string();
        let date = expense.date.to_string();
        let amount = expense.amount.to_decimal_string();
        csv_writer
            .write_record([
                period.as_str(),
                id.as_str(),
                date.as_str(),
                expense.category.as_str(),
                amount.as_str(),
                expense.note.as_str(),
            ])
            .map_err(export_err)?;
    }

    csv_writer
        .flush()
        .map_err(|e| RolloverError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expense, ExpenseId, Money, PeriodId};
    use chrono::NaiveDate;

    fn expense(day: u32, category: &str, cents: i64, note: &str) -> Expense {
        Expense {
            id: ExpenseId::new(),
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            category: category.to_string(),
            amount: Money::from_cents(cents),
            note: note.to_string(),
        }
    }

    #[test]
    fn test_export_rows() {
        let record = ArchiveRecord::new(
            PeriodId::new(2024, 5),
            vec![
                expense(20, "Fuel", 4000, ""),
                expense(2, "Groceries", 1250, "milk, eggs"),
            ],
        );

        let mut output = Vec::new();
        export_archive_csv(&record, &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Period,ID,Date,Category,Amount,Note");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2024-05,"));
        assert!(lines[1].ends_with(",2024-05-02,Groceries,12.50,\"milk, eggs\""));
        assert!(lines[2].ends_with(",2024-05-20,Fuel,40.00,"));
    }

    #[test]
    fn test_empty_record_has_header_only() {
        let record = ArchiveRecord::new(PeriodId::new(2024, 4), Vec::new());
        let mut output = Vec::new();
        export_archive_csv(&record, &mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Period,ID,Date,Category,Amount,Note\n"
        );
    }
}
