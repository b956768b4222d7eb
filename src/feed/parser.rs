use anyhow::{Context, Result};
use quick_xml::de::from_str;
use serde::Deserialize;

use super::{xml_text, FeedItem};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

/// Parse a previously written feed and return its items verbatim.
///
/// Items missing a title, pubDate or description are dropped. Titles are
/// brought to key form so hand-edited files still dedup.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedItem>> {
    let rss: Rss = from_str(xml).context("parsing feed xml")?;

    let mut out = Vec::with_capacity(rss.channel.item.len());
    for it in rss.channel.item {
        let item = FeedItem {
            title: xml_text(&it.title.unwrap_or_default()),
            pub_date: it.pub_date.unwrap_or_default(),
            description: it.description.unwrap_or_default(),
        };
        if !item.is_complete() {
            tracing::debug!(target: "feed", title = %item.title, "dropping incomplete prior item");
            continue;
        }
        out.push(item);
    }
    Ok(out)
}
