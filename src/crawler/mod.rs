//! Crawler module for catalog fetching and pipeline orchestration
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with status and Content-Type validation
//! - The bounded worker pool shared by both pipeline phases
//! - Provider → product URL resolution
//! - Overall harvest coordination

mod coordinator;
mod fetcher;
mod pool;
mod resolver;

pub use coordinator::{harvest, Harvester};
pub use fetcher::{build_http_client, Document, FetchResult, Fetcher};
pub use pool::WorkerPool;
pub use resolver::{fetch_listing, merge_fragments, resolve_provider};
