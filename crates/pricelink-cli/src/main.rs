mod aggregate;
mod codes;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pricelink_core::{config, MatchMode};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pricelink")]
#[command(about = "Marketplace listing linkage and price comparison")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Aggregate every enabled source's listing batch into one catalog
    Aggregate {
        /// Matching strategy: `code` (exact JAN) or `name` (fuzzy)
        #[arg(long)]
        mode: Option<MatchMode>,
        /// Minimum name similarity in [0.0, 1.0] for NAME mode
        #[arg(long, value_parser = pricelink_core::config::parse_threshold)]
        threshold: Option<f64>,
        /// Source roster file (overrides PRICELINK_SOURCES_PATH)
        #[arg(long)]
        sources: Option<PathBuf>,
        /// Catalog output file (overrides PRICELINK_OUTPUT_PATH)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print the catalog to stdout instead of writing the output file
        #[arg(long)]
        stdout: bool,
    },
    /// Check a 13-digit code against the JAN/EAN-13 checksum
    CheckCode {
        code: String,
    },
    /// Find the product code in one or more text fields, in priority order
    Extract {
        #[arg(required = true)]
        fields: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Aggregate {
            mode,
            threshold,
            sources,
            output,
            stdout,
        } => {
            let mut config =
                pricelink_core::load_app_config(&aggregate_overrides(mode, threshold))?;
            init_tracing(&config.log_level)?;
            if let Some(sources) = sources {
                config.sources_path = sources;
            }
            if let Some(output) = output {
                config.output_path = output;
            }
            aggregate::run_aggregate(&config, stdout).await?;
        }
        Commands::CheckCode { code } => {
            dotenvy::dotenv().ok();
            init_tracing(&env_log_level())?;
            codes::run_check_code(&code);
        }
        Commands::Extract { fields } => {
            let verify_short_codes =
                pricelink_core::load_env_flag(config::VERIFY_SHORT_CODES_VAR, false)?;
            init_tracing(&env_log_level())?;
            codes::run_extract(verify_short_codes, &fields);
        }
    }

    Ok(())
}

/// Flag values that must win over (possibly invalid) environment values.
fn aggregate_overrides(
    mode: Option<MatchMode>,
    threshold: Option<f64>,
) -> Vec<(&'static str, String)> {
    let mut overrides = Vec::new();
    if let Some(mode) = mode {
        overrides.push((config::MATCH_MODE_VAR, mode.to_string()));
    }
    if let Some(threshold) = threshold {
        overrides.push((config::SIMILARITY_THRESHOLD_VAR, threshold.to_string()));
    }
    overrides
}

fn env_log_level() -> String {
    std::env::var(config::LOG_LEVEL_VAR).unwrap_or_else(|_| config::DEFAULT_LOG_LEVEL.to_string())
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
