//! Expense display formatting

use super::truncate;
use crate::models::{Expense, Money};

/// Format expenses as a register with a total line
pub fn format_expense_list(expenses: &[Expense], currency_symbol: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:10} {:20} {:>12}  {}\n",
        "ID", "Date", "Category", "Amount", "Note"
    ));
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for expense in expenses {
        output.push_str(&format!(
            "{:12} {:10} {:20} {:>12}  {}\n",
            expense.id.to_string(),
            expense.date.format("%Y-%m-%d"),
            truncate(&expense.category, 20),
            expense.amount.format_with_symbol(currency_symbol),
            truncate(&expense.note, 30)
        ));
    }

    let total: Money = expenses.iter().map(|e| e.amount).sum();
    output.push_str(&"-".repeat(70));
    output.push('\n');
    output.push_str(&format!(
        "{:12} {:10} {:20} {:>12}\n",
        "",
        "",
        format!("Total ({})", expenses.len()),
        total.format_with_symbol(currency_symbol)
    ));

    output
}
