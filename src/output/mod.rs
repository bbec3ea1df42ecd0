//! Output module for harvested rows
//!
//! This module handles:
//! - Writing rows to CSV tables (one per work item plus a combined one)
//! - Reading tables back
//! - Per-category statistics and the end-of-run report

mod csv_output;
pub mod stats;
mod types;

pub use csv_output::{read_table, write_table};
pub use stats::{category_breakdown, print_summary};
pub use types::{OutputError, OutputResult, RunSummary};
