use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use std::time::Duration;

use crate::ingest::types::{PostSource, RawPost};

pub const DEFAULT_SOURCE_URL: &str = "https://ransomwhat.telemetry.ltd/posts";

/// JSON post-list provider. Either fetches over HTTP or serves a fixture.
pub struct RansomwhatProvider {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl RansomwhatProvider {
    pub fn from_fixture(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    /// HTTP mode with a bounded request timeout.
    pub fn from_url(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ransomwatch-feed/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building http client")?;
        Ok(Self {
            mode: Mode::Http {
                url: url.into(),
                client,
            },
        })
    }

    /// Decode a JSON array of posts. Entries that are not objects with the
    /// three string fields are skipped, not fatal.
    pub fn parse_posts_from_str(s: &str) -> Result<Vec<RawPost>> {
        let values: Vec<serde_json::Value> =
            serde_json::from_str(s).context("parsing post list json")?;

        let mut out = Vec::with_capacity(values.len());
        for (idx, v) in values.into_iter().enumerate() {
            match serde_json::from_value::<RawPost>(v) {
                Ok(p) => out.push(p),
                Err(e) => {
                    tracing::warn!(target: "ingest", index = idx, error = %e, "skipping malformed post");
                    counter!("ransomwatch_posts_skipped_total").increment(1);
                }
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl PostSource for RansomwhatProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawPost>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_posts_from_str(s),
            Mode::Http { url, client } => {
                let resp = client
                    .get(url.as_str())
                    .send()
                    .await
                    .with_context(|| format!("GET {url}"))?
                    .error_for_status()
                    .context("post list non-2xx")?;
                let body = resp.text().await.context("post list .text()")?;
                Self::parse_posts_from_str(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "ransomwhat"
    }
}
