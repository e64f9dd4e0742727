//! AR Trace Studio CLI
//!
//! Rebuilds span trees from rule engine log entries and reports the
//! critical path and trace statistics.

use anyhow::Result;
use ar_trace_studio::commands::{
    display_schema, display_version, execute_analyze, validate_args, validate_report_file,
    AnalyzeArgs,
};
use ar_trace_studio::utils::config::DEFAULT_REPORT_PATH;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

/// AR Trace Studio - critical path analysis for rule engine logs
#[derive(Parser, Debug)]
#[command(name = "ar-trace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze the entries of one trace
    Analyze {
        /// JSON file holding log entries
        #[arg(short, long, conflicts_with = "url")]
        input: Option<PathBuf>,

        /// HTTP endpoint returning log entries
        #[arg(short, long, env = "AR_TRACE_URL")]
        url: Option<String>,

        /// Correlation key of the trace to analyze
        #[arg(short, long)]
        trace: Option<String>,

        /// Output path for JSON report
        #[arg(short, long, default_value = DEFAULT_REPORT_PATH)]
        output: PathBuf,

        /// TOML analysis config
        #[arg(short, long, env = "AR_TRACE_CONFIG")]
        config: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Analyze {
            input,
            url,
            trace,
            output,
            config,
            summary,
        } => {
            let args = AnalyzeArgs {
                input,
                url,
                trace,
                output_json: output,
                config_path: config,
                print_summary: summary,
            };

            validate_args(&args)?;
            execute_analyze(&args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
