use anyhow::Result;
use clap::{Parser, Subcommand};

use envelope_rollover::cli::{
    handle_archive, handle_archives_command, handle_category_command, handle_check,
    handle_config_command, handle_continue, handle_expense_command, handle_status,
    print_pending_notice, ArchiveCommands, CategoryCommands, CliContext, ConfigCommands,
    ExpenseCommands,
};
use envelope_rollover::clock::SystemClock;
use envelope_rollover::config::{RolloverPaths, Settings};
use envelope_rollover::logging::init_tracing;

#[derive(Parser)]
#[command(
    name = "rollover",
    version,
    about = "Budget period tracking with archive-or-continue rollover",
    long_about = "Tracks expenses within recurring monthly budget periods. When a new \
                  period begins you choose to archive the previous period's expenses \
                  or continue with the current data."
)]
struct Cli {
    /// User whose data to work with (defaults to the configured user)
    #[arg(short, long, global = true, env = "ROLLOVER_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current period and whether a rollover is pending
    Status,

    /// Check for a new period and choose to archive or continue
    Check,

    /// Archive the previous period without prompting
    Archive,

    /// Accept the new period and keep all expenses
    Continue,

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Browse and export archived periods
    #[command(subcommand)]
    Archives(ArchiveCommands),

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = RolloverPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let mut ctx = CliContext::new(paths, settings, Box::new(SystemClock), cli.user.as_deref())?;

    match cli.command {
        None | Some(Commands::Status) => handle_status(&ctx).await?,
        Some(Commands::Check) => handle_check(&ctx).await?,
        Some(Commands::Archive) => handle_archive(&ctx).await?,
        Some(Commands::Continue) => handle_continue(&ctx).await?,
        Some(Commands::Expense(cmd)) => {
            print_pending_notice(&ctx).await;
            handle_expense_command(&ctx, cmd).await?;
        }
        Some(Commands::Category(cmd)) => handle_category_command(&ctx, cmd).await?,
        Some(Commands::Archives(cmd)) => handle_archives_command(&ctx, cmd).await?,
        Some(Commands::Config { command }) => handle_config_command(&mut ctx, command).await?,
    }

    Ok(())
}
