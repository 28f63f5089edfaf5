//! CLI entry point for plaatcheck.
//!
//! Looks up Dutch license plates in the RDW open-data API and prints the
//! vehicle details, either once per invocation or interactively.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use plaatcheck::{
    aggregator::{FailurePolicy, lookup},
    endpoints::{DEFAULT_BASE_URL, Endpoints},
    infra::rdw::RdwClient,
    output::{render_json, render_lookup},
    plate::{clean_plate, format_license_plate},
};
use std::ffi::OsStr;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "plaatcheck")]
#[command(about = "Look up vehicle details by license plate", long_about = None)]
struct Cli {
    /// JSON file with endpoint templates (defaults to the RDW datasets)
    #[arg(long, global = true, value_name = "FILE")]
    endpoints: Option<String>,

    /// Treat a failed dataset request as empty instead of failing the lookup
    #[arg(long, global = true, default_value_t = false)]
    partial: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a single plate
    Lookup {
        /// License plate, with or without dashes
        #[arg(value_name = "PLATE")]
        plate: String,

        /// Print the raw aggregate as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print a plate in its dashed form without looking it up
    Format {
        #[arg(value_name = "PLATE")]
        plate: String,
    },
    /// Read plates from stdin, one per line, and look each up
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/plaatcheck.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("plaatcheck.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let policy = if cli.partial {
        FailurePolicy::PerCategory
    } else {
        FailurePolicy::AllOrNothing
    };

    match cli.command {
        Commands::Format { plate } => {
            println!("{}", format_license_plate(&plate));
        }
        Commands::Lookup { plate, json } => {
            let client = RdwClient::new(load_endpoints(cli.endpoints.as_deref())?)?;
            let plate = validate_plate(&plate)?;

            let data = lookup(&client, &plate, policy).await;
            if json {
                println!("{}", render_json(data.as_ref())?);
            } else {
                println!("{}", render_lookup(&plate, data.as_ref()));
            }
        }
        Commands::Interactive => {
            let client = RdwClient::new(load_endpoints(cli.endpoints.as_deref())?)?;
            interactive(&client, policy).await?;
        }
    }

    Ok(())
}

/// Resolves endpoint templates: `--endpoints`, then `PLAATCHECK_ENDPOINTS`,
/// then the RDW datasets under `RDW_BASE_URL`.
fn load_endpoints(path: Option<&str>) -> Result<Endpoints> {
    let path = path
        .map(str::to_string)
        .or_else(|| std::env::var("PLAATCHECK_ENDPOINTS").ok());

    match path {
        Some(path) => {
            info!(path = %path, "Loading endpoint templates");
            Endpoints::load(&path)
        }
        None => {
            let base_url =
                std::env::var("RDW_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
            Ok(Endpoints::rdw(&base_url))
        }
    }
}

/// Normalises `input`, refusing a plate with no letters or digits at all.
fn validate_plate(input: &str) -> Result<String> {
    let cleaned = clean_plate(input);
    if cleaned.is_empty() {
        bail!("a license plate is required");
    }
    if cleaned.len() != 6 {
        warn!(plate = %cleaned, "Dutch plates have six characters");
    }
    Ok(format_license_plate(&cleaned))
}

/// Looks up one plate per stdin line until EOF.
///
/// Lookups run one at a time, so each result fully replaces the previous
/// one before the next line is read.
#[tracing::instrument(skip_all)]
async fn interactive(client: &RdwClient, policy: FailurePolicy) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let plate = match validate_plate(&line) {
            Ok(plate) => plate,
            Err(e) => {
                warn!(error = %e, "Skipping input");
                continue;
            }
        };

        println!("{plate}");
        let current = lookup(client, &plate, policy).await;
        println!("{}\n", render_lookup(&plate, current.as_ref()));
    }

    info!("End of input");
    Ok(())
}
