// src/feed/store.rs
//! The feed file is the only state carried between runs. It is read in one
//! scoped acquisition and replaced in another (temp file + rename).

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::parser::parse_feed;
use super::FeedItem;
use crate::outcome::Outcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriorFeed {
    /// No feed file yet.
    FirstRun,
    Existing(Vec<FeedItem>),
}

impl PriorFeed {
    pub fn into_items(self) -> Vec<FeedItem> {
        match self {
            PriorFeed::FirstRun => Vec::new(),
            PriorFeed::Existing(v) => v,
        }
    }
}

/// Load the previous run's feed.
///
/// - missing file → `Ok(FirstRun)`
/// - unparseable content → `Degraded`
/// - any other read failure → `Fatal`
pub fn load_existing(path: &Path) -> Outcome<PriorFeed> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(target: "feed", path = %path.display(), "no prior feed; starting fresh");
            return Outcome::Ok(PriorFeed::FirstRun);
        }
        Err(e) => {
            return Outcome::Fatal(
                anyhow::Error::new(e).context(format!("reading prior feed {}", path.display())),
            );
        }
    };

    let parsed = std::str::from_utf8(&bytes)
        .context("feed is not utf-8")
        .and_then(parse_feed);

    match parsed {
        Ok(items) => {
            tracing::debug!(target: "feed", count = items.len(), "loaded prior feed");
            Outcome::Ok(PriorFeed::Existing(items))
        }
        Err(e) => {
            tracing::warn!(
                target: "feed",
                path = %path.display(),
                error = %format!("{e:#}"),
                "prior feed is corrupt; its history will be discarded"
            );
            Outcome::degraded(format!("corrupt feed {}: {e:#}", path.display()))
        }
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace `path` with `contents` via a sibling temp file and a rename.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let tmp = temp_path_for(path);
    fs::write(&tmp, contents).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| {
        format!("renaming {} to {}", tmp.display(), path.display())
    })?;
    Ok(())
}
