// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod dates;
pub mod feed;
pub mod ingest;
pub mod outcome;
pub mod pipeline;
pub mod render;

// ---- Re-exports for stable public API ----
pub use crate::config::FeedConfig;
pub use crate::feed::{merge, title_key, FeedItem};
pub use crate::ingest::types::{DisclosurePost, PostSource, RawPost};
pub use crate::outcome::{DegradePolicy, Outcome};
pub use crate::pipeline::{run_once, RunReport};
