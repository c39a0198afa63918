//! Expense CLI commands

use clap::Subcommand;

use super::{parse_date, parse_money, CliContext};
use crate::display::format_expense_list;
use crate::error::RolloverResult;
use crate::models::NewExpense;
use crate::services::{ExpenseService, PeriodService};

/// Expense subcommands
#[derive(Subcommand, Debug)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Amount (e.g., "12.50" or "$12.50")
        amount: String,
        /// Category name
        #[arg(short, long)]
        category: String,
        /// Expense date (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Free-form note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// List expenses in the working set
    List {
        /// Period to show: current, last, YYYY-MM, or all
        #[arg(short, long, default_value = "current")]
        period: String,
    },
}

/// Handle an expense command
pub async fn handle_expense_command(ctx: &CliContext, cmd: ExpenseCommands) -> RolloverResult<()> {
    let service = ExpenseService::new(&ctx.store).with_audit(&ctx.audit);
    let symbol = ctx.settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            amount,
            category,
            date,
            note,
        } => {
            let amount = parse_money(&amount, "amount")?;
            let date = match date {
                Some(d) => parse_date(&d, &ctx.settings.date_format)?,
                None => ctx.clock.now().date(),
            };

            let mut input = NewExpense::new(date, category, amount);
            if let Some(note) = note {
                input = input.with_note(note);
            }

            let expense = service.add(&ctx.user, input).await?;
            println!(
                "Added expense: {} {} on {}",
                expense.category,
                expense.amount.format_with_symbol(symbol),
                expense.date.format(&ctx.settings.date_format)
            );
            println!("  ID: {}", expense.id);
        }

        ExpenseCommands::List { period } => {
            let expenses = if period.trim().eq_ignore_ascii_case("all") {
                service.list(&ctx.user).await?
            } else {
                let period_service = PeriodService::new(&ctx.settings);
                let period = period_service.parse(&period, ctx.clock.as_ref())?;
                println!("{}\n", period_service.format_period_friendly(&period));
                service.list_for_period(&ctx.user, &period).await?
            };
            print!("{}", format_expense_list(&expenses, symbol));
        }
    }

    Ok(())
}
