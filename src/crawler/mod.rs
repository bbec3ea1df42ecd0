//! Crawler module for forum fetching and orchestration
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with a throttling retry policy
//! - Paginated post listings and keyword searches
//! - Per-post comment retrieval
//! - Overall harvest coordination

mod comments;
mod coordinator;
mod fetcher;
mod listing;
pub mod models;

pub use comments::AUTOMODERATOR;
pub use coordinator::{run_harvest, work_items, Coordinator, WorkItem};
pub use fetcher::{build_http_client, FetchResult, ForumClient, ThrottlePolicy};
pub use listing::{Listing, ListingMode, StopReason};
