//! One run: fetch → transform → merge → write `feed.xml` and `index.html`.

use anyhow::{Context, Result};
use metrics::{counter, gauge};

use crate::config::FeedConfig;
use crate::feed::store::{self, PriorFeed};
use crate::feed::{merge, writer};
use crate::ingest::{self, types::PostSource};
use crate::render::render_html;

/// What a run did, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub fetched: usize,
    pub skipped: usize,
    /// Posts in the normalized batch (also the HTML rows).
    pub batch: usize,
    pub duplicates: usize,
    pub added: usize,
    pub feed_items: usize,
    pub first_run: bool,
    pub fetch_degraded: bool,
    pub feed_degraded: bool,
}

pub async fn run_once(source: &dyn PostSource, cfg: &FeedConfig) -> Result<RunReport> {
    ingest::ensure_metrics_described();

    let fetched = ingest::fetch(source).await;
    let fetch_degraded = fetched.is_degraded();
    let raw = fetched.resolve(cfg.on_fetch_error, "fetch", Vec::new)?;

    let (posts, skipped) = ingest::transform(&raw, cfg.max_items);

    let loaded = store::load_existing(&cfg.feed_path);
    let feed_degraded = loaded.is_degraded();
    let prior = loaded.resolve(cfg.on_corrupt_feed, "load feed", || PriorFeed::FirstRun)?;
    let first_run = prior == PriorFeed::FirstRun;

    let merged = merge(&posts, prior.into_items(), cfg.max_items);
    let rss = writer::to_rss(&cfg.channel, &merged.items).context("serializing feed")?;

    // Both files are attempted even if the first write fails.
    let feed_written = store::write_atomic(&cfg.feed_path, &rss);
    let html_written = store::write_atomic(&cfg.html_path, &render_html(&posts));
    feed_written.context("writing feed")?;
    html_written.context("writing html")?;

    counter!("ransomwatch_feed_duplicates_total").increment(merged.duplicates as u64);
    gauge!("ransomwatch_feed_items").set(merged.items.len() as f64);
    gauge!("ransomwatch_last_run_ts").set(chrono::Utc::now().timestamp() as f64);

    let report = RunReport {
        fetched: raw.len(),
        skipped,
        batch: posts.len(),
        duplicates: merged.duplicates,
        added: merged.added,
        feed_items: merged.items.len(),
        first_run,
        fetch_degraded,
        feed_degraded,
    };

    tracing::info!(
        target: "feed",
        fetched = report.fetched,
        kept = report.batch,
        added = report.added,
        dropped_duplicates = report.duplicates,
        merged = report.feed_items,
        feed = %cfg.feed_path.display(),
        html = %cfg.html_path.display(),
        "files generated"
    );

    Ok(report)
}
