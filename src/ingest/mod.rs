// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::dates::parse_discovered;
use crate::ingest::types::{DisclosurePost, PostSource, RawPost};
use crate::outcome::Outcome;
use metrics::{counter, describe_counter, describe_gauge};
use once_cell::sync::OnceCell;

/// Default size of the per-run window and of the feed.
pub const DEFAULT_MAX_ITEMS: usize = 20;

/// One-time metrics registration.
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "ransomwatch_posts_fetched_total",
            "Raw posts returned by the source."
        );
        describe_counter!(
            "ransomwatch_posts_skipped_total",
            "Posts dropped because a field could not be normalized."
        );
        describe_counter!(
            "ransomwatch_fetch_errors_total",
            "Source fetch/decode failures."
        );
        describe_counter!(
            "ransomwatch_feed_duplicates_total",
            "New posts dropped because the feed already had their title."
        );
        describe_gauge!("ransomwatch_feed_items", "Items in the last written feed.");
        describe_gauge!(
            "ransomwatch_last_run_ts",
            "Unix ts when the pipeline last completed."
        );
    });
}

/// Replace every space with an underscore.
pub fn normalize_name(s: &str) -> String {
    s.replace(' ', "_")
}

/// Normalize one record. `None` when `discovered` cannot be parsed.
pub fn normalize_post(raw: &RawPost) -> Option<DisclosurePost> {
    let discovered = parse_discovered(&raw.discovered)?;
    Some(DisclosurePost {
        group_name: normalize_name(&raw.group_name),
        post_title: normalize_name(&raw.post_title),
        discovered,
    })
}

/// Normalize a batch and keep its last `max_items` entries.
///
/// Input order is taken as chronological ascending, so the tail is the most
/// recent. Records with an unparseable timestamp are skipped before the
/// window is applied. Returns (posts, skipped_count).
pub fn transform(raw: &[RawPost], max_items: usize) -> (Vec<DisclosurePost>, usize) {
    let mut skipped = 0usize;
    let mut posts = Vec::with_capacity(raw.len());
    for r in raw {
        match normalize_post(r) {
            Some(p) => posts.push(p),
            None => {
                skipped += 1;
                tracing::warn!(
                    target: "ingest",
                    group = %r.group_name,
                    title = %r.post_title,
                    discovered = %r.discovered,
                    "skipping post with unparseable timestamp"
                );
            }
        }
    }
    if skipped > 0 {
        counter!("ransomwatch_posts_skipped_total").increment(skipped as u64);
    }

    let start = posts.len().saturating_sub(max_items);
    posts.drain(..start);
    (posts, skipped)
}

/// Fetch once. Any provider error is reported as `Degraded`.
pub async fn fetch(source: &dyn PostSource) -> Outcome<Vec<RawPost>> {
    ensure_metrics_described();

    match source.fetch_latest().await {
        Ok(v) => {
            counter!("ransomwatch_posts_fetched_total").increment(v.len() as u64);
            tracing::debug!(target: "ingest", provider = source.name(), count = v.len(), "fetched");
            Outcome::Ok(v)
        }
        Err(e) => {
            tracing::warn!(target: "ingest", error = ?e, provider = source.name(), "provider error");
            counter!("ransomwatch_fetch_errors_total").increment(1);
            Outcome::degraded(format!("{}: {e:#}", source.name()))
        }
    }
}
