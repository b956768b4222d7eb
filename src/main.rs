//! RansomWatch feed generator: binary entrypoint.
//! Runs the pipeline once and exits; schedule it externally (cron, CI).

use std::process::ExitCode;

use ransomwatch_feed::ingest::providers::ransomwhat::RansomwhatProvider;
use ransomwatch_feed::{run_once, FeedConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default; `LOG_FORMAT=json` switches to JSON lines.
/// `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("ransomwatch=info,ransomwatch_feed=info,feed=info,ingest=info,warn")
    });

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = FeedConfig::load_default()?;
    tracing::debug!(?cfg, "config loaded");

    let source = RansomwhatProvider::from_url(cfg.source_url.clone(), cfg.fetch_timeout())?;
    run_once(&source, &cfg).await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
