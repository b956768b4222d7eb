// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One record as served by the remote post list. Unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawPost {
    pub group_name: String,
    pub post_title: String,
    pub discovered: String,
}

/// A normalized disclosure post (underscored names, UTC discovery time).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisclosurePost {
    pub group_name: String,
    pub post_title: String,
    pub discovered: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait PostSource {
    async fn fetch_latest(&self) -> Result<Vec<RawPost>>;
    fn name(&self) -> &'static str;
}
