//! # Feed
//!
//! The persisted RSS feed and the merge that keeps it current.
//!
//! - [`FeedItem`] is the unit stored in `feed.xml`; its title is the dedup key.
//! - [`merge`] reconciles a fresh batch with the items carried over from the
//!   previous run: drop already-known titles, newest first, bounded length.
//! - [`parser`] / [`writer`] convert between items and RSS 2.0 XML.
//! - [`store`] owns the on-disk file (scoped read, scoped atomic rewrite).

pub mod parser;
pub mod store;
pub mod writer;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::cmp::Reverse;
use std::collections::HashSet;

use crate::dates::{parse_pub_date, to_rfc1123};
use crate::ingest::types::DisclosurePost;

pub const DEFAULT_CHANNEL_TITLE: &str = "RansomWatch Feed";
pub const DEFAULT_CHANNEL_DESCRIPTION: &str = "Latest ransomware posts";
pub const DEFAULT_CHANNEL_LINK: &str = "https://thestateofcybersecurity.github.io/ransomwareRSS/";
pub const DEFAULT_SELF_LINK: &str =
    "https://thestateofcybersecurity.github.io/ransomwareRSS/feed.xml";

/// Deduplication key for a post. Every title in the feed goes through here.
///
/// The key is in the form a title takes after a write/read cycle of the
/// feed file, so a post matches its own prior copy.
pub fn title_key(group_name: &str, post_title: &str) -> String {
    xml_text(&format!("{group_name}: {post_title}"))
}

/// Text as it survives `feed.xml`: XML-illegal control characters removed
/// (tab and LF kept), CR/CRLF folded to LF, XML whitespace trimmed at both
/// ends. The writer emits every text node through this.
pub fn xml_text(input: &str) -> String {
    let folded = input.replace("\r\n", "\n").replace('\r', "\n");
    let kept: String = folded
        .chars()
        .filter(|&c| matches!(c, '\t' | '\n') || c as u32 >= 0x20)
        .collect();
    kept.trim_matches(|c| matches!(c, ' ' | '\t' | '\n'))
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub pub_date: String,
    pub description: String,
}

impl FeedItem {
    pub fn from_post(p: &DisclosurePost) -> Self {
        let pub_date = to_rfc1123(&p.discovered);
        Self {
            title: title_key(&p.group_name, &p.post_title),
            description: format!(
                "Group: {}, Title: {}, Discovered: {}",
                p.group_name, p.post_title, pub_date
            ),
            pub_date,
        }
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_pub_date(&self.pub_date)
    }

    /// True when all three fields carry text.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.pub_date.trim().is_empty()
            && !self.description.trim().is_empty()
    }
}

/// Fixed `<channel>` metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChannelMeta {
    pub title: String,
    pub description: String,
    pub link: String,
    pub self_link: String,
}

impl Default for ChannelMeta {
    fn default() -> Self {
        Self {
            title: DEFAULT_CHANNEL_TITLE.to_string(),
            description: DEFAULT_CHANNEL_DESCRIPTION.to_string(),
            link: DEFAULT_CHANNEL_LINK.to_string(),
            self_link: DEFAULT_SELF_LINK.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    pub items: Vec<FeedItem>,
    /// New posts whose title was already in the prior feed.
    pub duplicates: usize,
    /// New posts that made it into the combined list before truncation.
    pub added: usize,
}

/// Merge a fresh batch into the prior feed.
///
/// New items whose title is already known are dropped; the prior copy wins.
/// Survivors go first, then prior items; the list is stably sorted by
/// `pub_date` descending (unparseable dates last) and cut to `max_items`.
pub fn merge(new_posts: &[DisclosurePost], prior: Vec<FeedItem>, max_items: usize) -> MergeResult {
    let prior_titles: HashSet<&str> = prior.iter().map(|it| it.title.as_str()).collect();

    let mut combined = Vec::with_capacity(new_posts.len() + prior.len());
    let mut batch_titles = HashSet::with_capacity(new_posts.len());
    let mut duplicates = 0usize;
    for post in new_posts {
        let item = FeedItem::from_post(post);
        if prior_titles.contains(item.title.as_str()) {
            duplicates += 1;
            continue;
        }
        // first occurrence within the batch stays
        if !batch_titles.insert(item.title.clone()) {
            continue;
        }
        combined.push(item);
    }
    let added = combined.len();
    combined.extend(prior);

    // A hand-edited prior feed may repeat a title.
    let mut seen = HashSet::with_capacity(combined.len());
    combined.retain(|it| seen.insert(it.title.clone()));

    sort_newest_first(&mut combined);
    combined.truncate(max_items);

    MergeResult {
        items: combined,
        duplicates,
        added,
    }
}

/// Stable sort by parsed `pub_date`, newest first; unparseable dates sink.
pub fn sort_newest_first(items: &mut [FeedItem]) {
    items.sort_by_key(|it| Reverse(it.published_at()));
}
