//! Configuration commands

use clap::Subcommand;
use tracing::info;

use super::CliContext;
use crate::error::RolloverResult;
use crate::models::UserId;
use crate::services::{ArchiveManager, PeriodService};

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Set the day of month on which budget periods begin (1-28)
    #[command(name = "start-day")]
    StartDay {
        day: u32,
    },

    /// Set the currency symbol used for display
    Currency {
        symbol: String,
    },

    /// Set the user selected when --user is not given
    #[command(name = "default-user")]
    DefaultUser {
        user: String,
    },
}

/// Show or change configuration
pub async fn handle_config_command(
    ctx: &mut CliContext,
    cmd: Option<ConfigCommands>,
) -> RolloverResult<()> {
    match cmd {
        None => {
            let period_service = PeriodService::new(&ctx.settings);
            let current = period_service.current_period(ctx.clock.as_ref());

            println!("envelope-rollover configuration");
            println!("===============================");
            println!();
            println!("Base directory:   {}", ctx.paths.base_dir().display());
            println!("Data directory:   {}", ctx.paths.data_dir().display());
            println!("Settings file:    {}", ctx.paths.settings_file().display());
            println!("Audit log:        {}", ctx.paths.audit_log().display());
            println!();
            println!("Period start day: {}", period_service.start_day());
            println!("Currency symbol:  {}", ctx.settings.currency_symbol);
            println!("Date format:      {}", ctx.settings.date_format);
            println!("Default user:     {}", ctx.settings.default_user);
            println!("Active user:      {}", ctx.user);
            println!();
            println!(
                "Current period:   {} ({})",
                current.id,
                period_service.format_period_friendly(&current)
            );
            return Ok(());
        }

        Some(ConfigCommands::StartDay { day }) => {
            let previous_start_day = ctx.start_day();
            ctx.settings.set_period_start_day(day)?;
            ctx.settings.save(&ctx.paths)?;
            info!(path = %ctx.paths.settings_file().display(), "saved settings");
            println!("Period start day set to {}", day);

            if previous_start_day != ctx.start_day() {
                realign_markers(ctx, previous_start_day).await?;
            }
            return Ok(());
        }

        Some(ConfigCommands::Currency { symbol }) => {
            ctx.settings.currency_symbol = symbol.trim().to_string();
            println!("Currency symbol set to {}", ctx.settings.currency_symbol);
        }

        Some(ConfigCommands::DefaultUser { user }) => {
            let user = UserId::parse(&user)?;
            ctx.settings.default_user = user.to_string();
            println!("Default user set to {}", user);
        }
    }

    ctx.settings.save(&ctx.paths)?;
    info!(path = %ctx.paths.settings_file().display(), "saved settings");
    Ok(())
}

/// Rewrite every stored marker in the new period numbering
async fn realign_markers(ctx: &CliContext, previous_start_day: u32) -> RolloverResult<()> {
    let manager = ArchiveManager::new(&ctx.store, ctx.clock.as_ref(), ctx.start_day())
        .with_audit(&ctx.audit);

    for uid in ctx.paths.user_ids()? {
        if let Some(marker) = manager.realign_marker(&uid, previous_start_day).await? {
            println!("Last acknowledged period for {} is now {}", uid, marker);
        }
    }
    Ok(())
}
