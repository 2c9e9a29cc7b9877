//! P2P listing tracker daemon

mod config;
mod pipeline;

use std::path::PathBuf;

use clap::Parser;
use dotenv::dotenv;
use market_feed::client::FeedClient;
use recorder::create_sink;
use tokio::signal;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use config::{FailureMode, RunMode, TrackerConfig};
use pipeline::Pipeline;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Asset ticker symbol (overrides P2P_ASSET)
    #[clap(long)]
    asset: Option<String>,

    /// Fiat currency code (overrides P2P_FIAT)
    #[clap(long)]
    fiat: Option<String>,

    /// Seconds between polling cycles (overrides POLL_INTERVAL_SECS)
    #[clap(long)]
    interval: Option<u64>,

    /// Sink kind, "table" or "file" (overrides SINK)
    #[clap(long)]
    sink: Option<String>,

    /// Output path for the file sink (overrides CSV_PATH)
    #[clap(long)]
    csv_path: Option<PathBuf>,

    /// Run a single cycle and exit
    #[clap(long)]
    once: bool,

    /// Abort on the first fetch failure instead of degrading to partial data
    #[clap(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing with debug level if DEBUG=1 in .env
    let env_debug = std::env::var("DEBUG").unwrap_or_else(|_| "0".to_string());
    let log_level = if env_debug == "1" { Level::DEBUG } else { Level::INFO };

    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    // Only set the global subscriber if it hasn't been set already
    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        info!("Tracing initialized");
        if env_debug == "1" {
            debug!("Debug logging enabled");
        }
    }

    // Build configuration from env, then apply CLI overrides
    let mut config = TrackerConfig::from_env();
    if let Some(asset) = args.asset {
        config.asset = asset;
    }
    if let Some(fiat) = args.fiat {
        config.fiat = fiat;
    }
    if let Some(interval) = args.interval {
        config.poll_interval_secs = interval;
    }
    if let Some(sink) = args.sink {
        config.sink = sink.parse()?;
    }
    if let Some(csv_path) = args.csv_path {
        config.csv_path = csv_path;
    }
    if args.once {
        config.run_mode = RunMode::Once;
    }
    if args.strict {
        config.failure_mode = FailureMode::Strict;
    }

    info!(
        "Starting p2p listing tracker for {}/{} ({:?} sink, {:?} mode)",
        config.asset, config.fiat, config.sink, config.run_mode
    );

    // Construct the feed client and the sink; failures here are fatal
    let feed = FeedClient::new(config.feed_config())?;
    let sink = create_sink(&config.sink_spec()?).await?;
    let pipeline = Pipeline::new(feed, sink, &config);

    match config.run_mode {
        RunMode::Once => {
            let report = pipeline.run_cycle().await?;
            info!(
                "Cycle complete: {} records appended ({} buy / {} sell listings)",
                report.records_appended, report.buy_listings, report.sell_listings
            );
        }
        RunMode::Loop => {
            let interval = Duration::from_secs(config.poll_interval_secs);
            loop {
                match pipeline.run_cycle().await {
                    Ok(report) => info!(
                        "Cycle complete: {} records appended ({} buy / {} sell listings)",
                        report.records_appended, report.buy_listings, report.sell_listings
                    ),
                    // Strict mode surfaces fetch failures; they terminate the process
                    Err(err @ common::Error::Fetch(_)) => return Err(err.into()),
                    Err(err) => error!("Cycle failed: {}", err),
                }

                debug!("Sleeping {}s until the next cycle", config.poll_interval_secs);
                tokio::select! {
                    _ = sleep(interval) => {}
                    _ = shutdown_signal() => break,
                }
            }
        }
    }

    info!("Shutting down");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
