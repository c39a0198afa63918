//! Archive browsing and export commands

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use super::CliContext;
use crate::display::{format_archive_details, format_archive_list};
use crate::error::{RolloverError, RolloverResult};
use crate::export::{export_archive_csv, export_archive_json, export_archive_yaml};
use crate::models::ArchiveRecord;
use crate::services::PeriodService;
use crate::storage::PersistenceGateway;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// One row per archived expense
    Csv,
    /// Full record with metadata
    Json,
    /// Full record, human-readable
    Yaml,
}

/// Archive subcommands
#[derive(Subcommand, Debug)]
pub enum ArchiveCommands {
    /// List archived periods
    List,

    /// Show the expenses of an archived period
    Show {
        /// Period: last, or YYYY-MM
        period: String,
    },

    /// Export an archived period
    Export {
        /// Period: last, or YYYY-MM
        period: String,

        /// Export format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

async fn find_record(ctx: &CliContext, period: &str) -> RolloverResult<ArchiveRecord> {
    let period = PeriodService::new(&ctx.settings).parse(period, ctx.clock.as_ref())?;
    ctx.store
        .get_archive_record(&ctx.user, period.id)
        .await?
        .ok_or_else(|| RolloverError::archive_not_found(period.id.to_string()))
}

fn write_export<W: Write>(record: &ArchiveRecord, format: ExportFormat, mut writer: W) -> RolloverResult<()> {
    match format {
        ExportFormat::Csv => export_archive_csv(record, &mut writer)?,
        ExportFormat::Json => export_archive_json(record, &mut writer)?,
        ExportFormat::Yaml => export_archive_yaml(record, &mut writer)?,
    }
    writer
        .flush()
        .map_err(|e| RolloverError::Export(e.to_string()))
}

/// Handle an archives command
pub async fn handle_archives_command(ctx: &CliContext, cmd: ArchiveCommands) -> RolloverResult<()> {
    let symbol = ctx.settings.currency_symbol.as_str();

    match cmd {
        ArchiveCommands::List => {
            let records = ctx.store.list_archive_records(&ctx.user).await?;
            print!("{}", format_archive_list(&records, ctx.start_day(), symbol));
        }

        ArchiveCommands::Show { period } => {
            let record = find_record(ctx, &period).await?;
            print!("{}", format_archive_details(&record, ctx.start_day(), symbol));
        }

        ArchiveCommands::Export {
            period,
            format,
            output,
        } => {
            let record = find_record(ctx, &period).await?;
            match output {
                Some(path) => {
                    let file = File::create(&path).map_err(|e| {
                        RolloverError::Export(format!("Failed to create {}: {}", path.display(), e))
                    })?;
                    write_export(&record, format, BufWriter::new(file))?;
                    eprintln!(
                        "Exported {} expense(s) from {} to {}",
                        record.snapshot.len(),
                        record.period_id,
                        path.display()
                    );
                }
                None => write_export(&record, format, io::stdout().lock())?,
            }
        }
    }

    Ok(())
}
