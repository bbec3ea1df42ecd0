//! Output error and summary types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unexpected table header: {0}")]
    Header(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Outcome of a complete harvest run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Rows accumulated across all work items
    pub total_rows: usize,

    /// Combined table, if any rows were collected and it was written
    pub combined_path: Option<PathBuf>,

    /// Row count per category, largest first
    pub categories: Vec<(String, usize)>,

    /// Number of work items that failed and were skipped
    pub items_failed: usize,

    pub items_total: usize,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items_succeeded(&self) -> usize {
        self.items_total.saturating_sub(self.items_failed)
    }
}
