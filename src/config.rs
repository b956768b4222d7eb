// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::feed::ChannelMeta;
use crate::ingest::providers::ransomwhat::DEFAULT_SOURCE_URL;
use crate::ingest::DEFAULT_MAX_ITEMS;
use crate::outcome::DegradePolicy;

pub const ENV_CONFIG_PATH: &str = "RANSOMWATCH_CONFIG_PATH";
pub const ENV_SOURCE_URL: &str = "RANSOMWATCH_SOURCE_URL";
pub const ENV_FEED_PATH: &str = "RANSOMWATCH_FEED_PATH";
pub const ENV_HTML_PATH: &str = "RANSOMWATCH_HTML_PATH";

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}
fn default_feed_path() -> PathBuf {
    PathBuf::from("feed.xml")
}
fn default_html_path() -> PathBuf {
    PathBuf::from("index.html")
}
fn default_max_items() -> usize {
    DEFAULT_MAX_ITEMS
}
fn default_fetch_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_source_url")]
    pub source_url: String,
    #[serde(default = "default_feed_path")]
    pub feed_path: PathBuf,
    #[serde(default = "default_html_path")]
    pub html_path: PathBuf,
    /// Size of the per-run window and of the written feed.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default)]
    pub on_fetch_error: DegradePolicy,
    #[serde(default)]
    pub on_corrupt_feed: DegradePolicy,
    #[serde(default)]
    pub channel: ChannelMeta,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            feed_path: default_feed_path(),
            html_path: default_html_path(),
            max_items: default_max_items(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            on_fetch_error: DegradePolicy::default(),
            on_corrupt_feed: DegradePolicy::default(),
            channel: ChannelMeta::default(),
        }
    }
}

impl FeedConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Load from an explicit path. TOML or JSON, chosen by extension.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Load using env var + fallbacks, then apply env overrides:
    /// 1) $RANSOMWATCH_CONFIG_PATH
    /// 2) config/ransomwatch.toml
    /// 3) config/ransomwatch.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        let base = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else if Path::new("config/ransomwatch.toml").exists() {
            Self::load_from(Path::new("config/ransomwatch.toml"))?
        } else if Path::new("config/ransomwatch.json").exists() {
            Self::load_from(Path::new("config/ransomwatch.json"))?
        } else {
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(v) = non_empty_env(ENV_SOURCE_URL) {
            self.source_url = v;
        }
        if let Some(v) = non_empty_env(ENV_FEED_PATH) {
            self.feed_path = PathBuf::from(v);
        }
        if let Some(v) = non_empty_env(ENV_HTML_PATH) {
            self.html_path = PathBuf::from(v);
        }
        self
    }

    fn sanitized(mut self) -> Self {
        if self.max_items == 0 {
            self.max_items = default_max_items();
        }
        if self.fetch_timeout_secs == 0 {
            self.fetch_timeout_secs = default_fetch_timeout_secs();
        }
        self.source_url = self.source_url.trim().to_string();
        if self.source_url.is_empty() {
            self.source_url = default_source_url();
        }
        self
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<FeedConfig> {
    match hint_ext {
        "json" => serde_json::from_str(s).map_err(Into::into),
        "toml" => toml::from_str(s).map_err(Into::into),
        // No usable extension: TOML first, then JSON.
        _ => {
            if let Ok(cfg) = toml::from_str::<FeedConfig>(s) {
                return Ok(cfg);
            }
            serde_json::from_str::<FeedConfig>(s)
                .map_err(|e| anyhow!("unsupported config format: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = parse_config("", "toml").unwrap();
        assert_eq!(cfg, FeedConfig::default());
        assert_eq!(cfg.max_items, 20);
        assert_eq!(cfg.channel.title, "RansomWatch Feed");
    }

    #[test]
    fn toml_and_json_fields_are_read() {
        let toml = r#"
            feed_path = "public/feed.xml"
            max_items = 5
            on_corrupt_feed = "abort"

            [channel]
            link = "https://example.test/"
        "#;
        let cfg = parse_config(toml, "toml").unwrap();
        assert_eq!(cfg.feed_path, PathBuf::from("public/feed.xml"));
        assert_eq!(cfg.max_items, 5);
        assert_eq!(cfg.on_corrupt_feed, DegradePolicy::Abort);
        assert_eq!(cfg.on_fetch_error, DegradePolicy::Degrade);
        assert_eq!(cfg.channel.link, "https://example.test/");
        assert_eq!(cfg.channel.title, "RansomWatch Feed");

        let json = r#"{"html_path": "out/index.html", "fetch_timeout_secs": 5}"#;
        let cfg = parse_config(json, "json").unwrap();
        assert_eq!(cfg.html_path, PathBuf::from("out/index.html"));
        assert_eq!(cfg.fetch_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn unknown_extension_tries_both() {
        assert!(parse_config(r#"{"max_items": 3}"#, "").is_ok());
        assert!(parse_config("max_items = 3", "").is_ok());
        assert!(parse_config("max_items = [", "").is_err());
    }

    #[test]
    fn zero_values_are_sanitized() {
        let cfg = parse_config("max_items = 0\nfetch_timeout_secs = 0\nsource_url = \"  \"", "toml")
            .unwrap()
            .sanitized();
        assert_eq!(cfg.max_items, 20);
        assert_eq!(cfg.fetch_timeout_secs, 30);
        assert_eq!(cfg.source_url, DEFAULT_SOURCE_URL);
    }

    #[serial_test::serial]
    #[test]
    fn env_overrides_apply() {
        env::set_var(ENV_FEED_PATH, "x/feed.xml");
        env::set_var(ENV_HTML_PATH, "   ");
        let cfg = FeedConfig::default().with_env_overrides();
        env::remove_var(ENV_FEED_PATH);
        env::remove_var(ENV_HTML_PATH);
        assert_eq!(cfg.feed_path, PathBuf::from("x/feed.xml"));
        assert_eq!(cfg.html_path, PathBuf::from("index.html"));
    }
}
