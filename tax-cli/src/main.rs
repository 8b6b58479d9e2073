use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use tax_cli::app::{self, OutputFormat};
use tax_cli::logging;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Federal, state and self-employment tax liability calculator.
///
/// Evaluates taxpayer-year inputs against the built-in 2024 tables or a
/// TOML tables file.
#[derive(Debug, Parser)]
#[command(name = "tax-calc", version, about)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). Overrides RUST_LOG.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct TableArgs {
    /// TOML tables file. Defaults to the built-in 2024 tables.
    #[arg(long)]
    tables: Option<PathBuf>,

    /// CSV of bracket schedules that replace those in the tables.
    #[arg(long)]
    brackets: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate the liability for one taxpayer-year.
    Calculate {
        /// JSON tax input, or `-` for stdin.
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        tables: TableArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Calculate every row of a CSV file, printing one JSON result per line.
    Batch {
        /// CSV with one taxpayer-year per row.
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        tables: TableArgs,
    },

    /// Print the active tax tables as TOML.
    Tables {
        #[command(flatten)]
        tables: TableArgs,

        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.log_file.as_deref())?;
    debug!(?cli, "parsed arguments");

    match cli.command {
        Command::Calculate {
            input,
            tables,
            format,
        } => {
            let tables = app::load_tables(tables.tables.as_deref(), tables.brackets.as_deref())?;
            let input = app::read_input(&input)?;
            println!("{}", app::calculate(&tables, &input, format)?);
        }
        Command::Batch { file, tables } => {
            let tables = app::load_tables(tables.tables.as_deref(), tables.brackets.as_deref())?;
            let inputs = tax_data::load_inputs_from_file(&file)
                .with_context(|| format!("Failed to load tax inputs: {}", file.display()))?;
            for line in app::calculate_batch(&tables, &inputs)? {
                println!("{line}");
            }
        }
        Command::Tables { tables, output } => {
            let tables = app::load_tables(tables.tables.as_deref(), tables.brackets.as_deref())?;
            let toml = app::dump_tables(&tables)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, toml)
                        .with_context(|| format!("Failed to write: {}", path.display()))?;
                    info!(path = %path.display(), "wrote tax tables");
                }
                None => print!("{toml}"),
            }
        }
    }

    Ok(())
}
