//! Category CLI commands

use clap::Subcommand;

use super::{parse_money, CliContext};
use crate::display::format_category_list;
use crate::error::RolloverResult;
use crate::models::NewCategory;
use crate::services::CategoryService;

/// Category subcommands
#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Create a category
    Add {
        /// Category name
        name: String,
        /// Planned amount per period (e.g., "400" or "400.00")
        #[arg(default_value = "0")]
        planned: String,
    },

    /// List all categories
    List,
}

/// Handle a category command
pub async fn handle_category_command(ctx: &CliContext, cmd: CategoryCommands) -> RolloverResult<()> {
    let service = CategoryService::new(&ctx.store).with_audit(&ctx.audit);

    match cmd {
        CategoryCommands::Add { name, planned } => {
            let planned = parse_money(&planned, "planned amount")?;
            let category = service.add(&ctx.user, NewCategory::new(name, planned)).await?;
            println!("Created category: {}", category.name);
            println!(
                "  Planned: {}",
                category
                    .planned_amount
                    .format_with_symbol(&ctx.settings.currency_symbol)
            );
            println!("  ID: {}", category.id);
        }

        CategoryCommands::List => {
            let categories = service.list(&ctx.user).await?;
            print!(
                "{}",
                format_category_list(&categories, &ctx.settings.currency_symbol)
            );
        }
    }

    Ok(())
}
