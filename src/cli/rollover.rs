//! Rollover commands: status, interactive check, archive and continue

use tracing::warn;

use super::CliContext;
use crate::display::{format_archive_summary, format_status};
use crate::error::RolloverResult;
use crate::prompt::{PromptController, PromptOutcome, RolloverChoice, TerminalPrompt};
use crate::services::detector::load_check;
use crate::services::period::format_period_range;

fn controller(ctx: &CliContext) -> PromptController<'_, crate::storage::JsonStore> {
    PromptController::new(&ctx.store, ctx.clock.as_ref(), ctx.start_day()).with_audit(&ctx.audit)
}

/// Show the current period and the marker
pub async fn handle_status(ctx: &CliContext) -> RolloverResult<()> {
    let check = load_check(&ctx.store, &ctx.user, ctx.clock.now(), ctx.start_day()).await?;
    print!("{}", format_status(&check, ctx.user.as_str()));
    Ok(())
}

/// Run the rollover check and ask the user what to do
pub async fn handle_check(ctx: &CliContext) -> RolloverResult<()> {
    let mut prompt = TerminalPrompt::new();
    let outcome = controller(ctx).run(&ctx.user, &mut prompt).await?;
    print_outcome(&outcome);
    Ok(())
}

/// Archive the previous period without prompting
pub async fn handle_archive(ctx: &CliContext) -> RolloverResult<()> {
    let outcome = controller(ctx)
        .execute(&ctx.user, RolloverChoice::Archive)
        .await?;
    print_outcome(&outcome);
    Ok(())
}

/// Accept the current period without moving any data
pub async fn handle_continue(ctx: &CliContext) -> RolloverResult<()> {
    let outcome = controller(ctx)
        .execute(&ctx.user, RolloverChoice::Continue)
        .await?;
    print_outcome(&outcome);
    Ok(())
}

/// Print a hint on stderr when a rollover is waiting
///
/// Failures are only logged; the hint never blocks the command it precedes.
pub async fn print_pending_notice(ctx: &CliContext) {
    match load_check(&ctx.store, &ctx.user, ctx.clock.now(), ctx.start_day()).await {
        Ok(check) if check.is_new => eprintln!(
            "Note: a new budget period started ({}). Run 'rollover check' to archive or continue.",
            format_period_range(&check.current_period)
        ),
        Ok(_) => {}
        Err(e) => warn!(error = %e, "could not check for a new period"),
    }
}

fn print_outcome(outcome: &PromptOutcome) {
    match outcome {
        PromptOutcome::NoRollover { current_period } => {
            println!(
                "No rollover pending. Current period: {} ({})",
                current_period.id,
                format_period_range(current_period)
            );
        }
        PromptOutcome::Dismissed { .. } => {
            println!("Decision postponed. You will be asked again next time.");
        }
        PromptOutcome::Archived(summary) => {
            print!("{}", format_archive_summary(summary));
        }
        PromptOutcome::Continued { current_period } => {
            println!(
                "Continuing with current data. Current period: {} ({})",
                current_period.id,
                format_period_range(current_period)
            );
        }
    }
}
