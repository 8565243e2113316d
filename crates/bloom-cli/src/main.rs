//! Command-line runner for BloomWatch flows.
//!
//! Invokes a flow against the configured generation service (or the built-in
//! mock with `--mock`) and prints the typed result as pretty JSON.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bloom_flows::{FlowExecutor, GenerativeBackend, HttpBackend, MockBackend};
use bloom_types::BloomQuery;

/// Query and forecast plant-bloom events from the command line.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Answer from the built-in mock backend instead of the network.
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect and monitor blooming events for a location and period.
    Detect(QueryArgs),
    /// Forecast bloom events for a location and period.
    Forecast(QueryArgs),
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Geographic location, e.g. "California, USA".
    #[arg(long)]
    location: String,
    /// Start of the period (YYYY-MM-DD).
    #[arg(long)]
    start_date: String,
    /// End of the period (YYYY-MM-DD).
    #[arg(long)]
    end_date: String,
}

impl QueryArgs {
    fn into_query(self) -> BloomQuery {
        BloomQuery::new(self.location, self.start_date, self.end_date)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let backend: Arc<dyn GenerativeBackend> = if cli.mock {
        info!("[bloom-cli] using the built-in mock backend");
        Arc::new(MockBackend::canned())
    } else {
        Arc::new(HttpBackend::from_env())
    };
    let executor = FlowExecutor::builtin(backend).context("failed to build flow registry")?;

    match cli.command {
        Command::Detect(args) => {
            let detection = executor
                .detect_and_monitor_blooms(&args.into_query())
                .await?;
            println!("{}", serde_json::to_string_pretty(&detection)?);
        }
        Command::Forecast(args) => {
            let forecast = executor.generate_bloom_forecast(&args.into_query()).await?;
            println!("{}", serde_json::to_string_pretty(&forecast)?);
        }
    }

    Ok(())
}
