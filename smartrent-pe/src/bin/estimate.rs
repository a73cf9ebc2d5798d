//! One-shot estimate from the command line
//!
//! Reads a property JSON object (same shape the web form posts) from stdin
//! or `--input`, prints the estimate JSON to stdout. Logs go to stderr.
//!
//! ```text
//! echo '{"area":"80","bedrooms":"2",...}' | estimate
//! estimate --input property.json --remote http://127.0.0.1:8000/predict
//! ```

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use smartrent_common::api::{EstimateResponse, PropertyAttributes, PropertyRequest};
use smartrent_common::config::{ExternalApiConfig, DEFAULT_EXTERNAL_API_TIMEOUT_MS};
use tracing::info;

use smartrent_pe::engine;
use smartrent_pe::services::{Estimate, Estimator};

#[derive(Parser, Debug)]
#[command(name = "estimate")]
#[command(about = "Estimate monthly rent for a single property")]
#[command(version)]
struct Args {
    /// Property JSON file (default: read stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Try this scoring service first, falling back to the local formula.
    /// Without it only the local formula runs, whatever the environment says.
    #[arg(long)]
    remote: Option<String>,

    /// Scoring service timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_EXTERNAL_API_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Estimate one property from its JSON text
///
/// `remote` is the scoring service to try first; `None` runs the local
/// formula alone and leaves `fallback_used` out of the response.
async fn run(input: &str, remote: Option<&str>, timeout_ms: u64) -> Result<EstimateResponse> {
    let request: PropertyRequest =
        serde_json::from_str(input).context("Input is not a property JSON object")?;
    let attrs = PropertyAttributes::try_from(request)?;

    let Some(url) = remote else {
        return Ok(EstimateResponse {
            report: engine::estimate_locally(&attrs),
            fallback_used: None,
        });
    };

    let config = ExternalApiConfig {
        url: url.to_string(),
        timeout_ms,
    };
    config.validate()?;

    let estimator = Estimator::new(&config)?;
    let estimate = estimator.obtain_prediction(&attrs).await;
    if let Estimate::LocalFallback { reason, .. } = &estimate {
        info!("Scoring service failed: {}", reason);
    }
    Ok(estimate.into_response())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smartrent_pe=warn,smartrent_common=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let input = read_input(args.input.as_ref())?;
    let response = run(&input, args.remote.as_deref(), args.timeout_ms).await?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", output);

    Ok(())
}
