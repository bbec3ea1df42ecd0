//! Harvest coordinator - main orchestration logic
//!
//! This module drives the worklist:
//! - Fetching each listing or search
//! - Pulling comments for every post and flattening them into rows
//! - Writing one table per work item and a combined table at the end
//! - Keeping one failed item from stopping the run

use crate::config::{validate, Config};
use crate::crawler::fetcher::ForumClient;
use crate::crawler::listing::ListingMode;
use crate::output::{category_breakdown, write_table, RunSummary};
use crate::records::{flatten, Post, Row};
use crate::SieveError;
use std::path::PathBuf;

/// One unit of the worklist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub community: String,
    pub mode: ListingMode,
    pub target: usize,
    pub category: String,
}

impl WorkItem {
    /// File name of this item's table
    ///
    /// Listings are named `{community}_general.csv`; searches use the keyword
    /// with spaces and path separators replaced by underscores, so the table
    /// always lands directly in the output directory.
    pub fn file_name(&self) -> String {
        match &self.mode {
            ListingMode::Hot => format!("{}_general.csv", self.community),
            ListingMode::Search { query } => {
                let keyword = query.replace([' ', '/', '\\'], "_");
                format!("{}_{}.csv", self.community, keyword)
            }
        }
    }

    fn label(&self) -> String {
        match &self.mode {
            ListingMode::Hot => format!("r/{}", self.community),
            ListingMode::Search { query } => format!("r/{} - '{}'", self.community, query),
        }
    }
}

/// The worklist: every listing item, then every search item
pub fn work_items(config: &Config) -> Vec<WorkItem> {
    let listings = config.listings.iter().map(|item| WorkItem {
        community: item.community.clone(),
        mode: ListingMode::Hot,
        target: item.target,
        category: item.category.clone(),
    });
    let searches = config.searches.iter().map(|item| WorkItem {
        community: item.community.clone(),
        mode: ListingMode::Search {
            query: item.keyword.clone(),
        },
        target: item.target,
        category: item.category.clone(),
    });
    listings.chain(searches).collect()
}

/// Main harvest coordinator structure
pub struct Coordinator {
    config: Config,
    client: ForumClient,
    output_dir: PathBuf,
}

impl Coordinator {
    /// Creates a coordinator, building the HTTP client and the output directory
    pub fn new(config: Config) -> Result<Self, SieveError> {
        validate(&config)?;

        let client = ForumClient::new(&config)?;
        let output_dir = PathBuf::from(&config.output.directory);
        std::fs::create_dir_all(&output_dir)?;

        Ok(Self {
            config,
            client,
            output_dir,
        })
    }

    /// The worklist of this coordinator's config
    pub fn work_items(&self) -> Vec<WorkItem> {
        work_items(&self.config)
    }

    /// Runs every work item in order and writes the combined table
    ///
    /// Item failures are logged and skipped. Only a failure to write the
    /// combined table fails the run.
    pub async fn run(&self) -> Result<RunSummary, SieveError> {
        let items = self.work_items();
        let mut all_rows: Vec<Row> = Vec::new();
        let mut summary = RunSummary::new();
        summary.items_total = items.len();

        tracing::info!("Starting harvest of {} work items", items.len());

        for (idx, item) in items.iter().enumerate() {
            tracing::info!("[{}/{}] {}", idx + 1, items.len(), item.label());

            match self.run_item(item, &mut all_rows).await {
                Ok(rows) => tracing::info!("{}: collected {} rows", item.label(), rows),
                Err(e) => {
                    summary.items_failed += 1;
                    tracing::error!("Error processing {}: {}", item.label(), e);
                }
            }

            tokio::time::sleep(self.config.pacing.item_pause()).await;
        }

        summary.total_rows = all_rows.len();
        summary.categories = category_breakdown(&all_rows);

        let combined = self.output_dir.join(&self.config.output.combined_file);
        if write_table(&all_rows, &combined)?.is_some() {
            summary.combined_path = Some(combined);
        }

        tracing::info!(
            "Harvest finished: {} rows, {} of {} items failed",
            summary.total_rows,
            summary.items_failed,
            summary.items_total
        );

        Ok(summary)
    }

    /// Fetches, flattens and writes one work item
    ///
    /// Rows join `all_rows` even when this item's own table cannot be written.
    async fn run_item(&self, item: &WorkItem, all_rows: &mut Vec<Row>) -> Result<usize, SieveError> {
        let listing = self
            .client
            .fetch_listing(&item.community, &item.mode, item.target)
            .await;

        if listing.posts.is_empty() {
            return Ok(0);
        }

        let rows = self
            .process_posts(&listing.posts, &item.community, &item.category)
            .await;
        let count = rows.len();

        let written = write_table(&rows, &self.item_path(item));
        all_rows.extend(rows);
        written?;

        Ok(count)
    }

    /// Fetches comments for each post and flattens them into rows
    ///
    /// Posts are processed back to back, with a pause after every
    /// `batch-size` posts.
    pub async fn process_posts(&self, posts: &[Post], community: &str, category: &str) -> Vec<Row> {
        let pacing = &self.config.pacing;
        let mut rows = Vec::new();

        tracing::info!("Processing {} posts", posts.len());

        for (idx, post) in posts.iter().enumerate() {
            let position = idx + 1;
            tracing::debug!("[{}/{}] {}", position, posts.len(), post.title);

            let comments = self.client.fetch_comments(&post.permalink).await;
            rows.extend(flatten(post, &comments, community, category));

            if pacing.batch_size > 0 && position % pacing.batch_size == 0 {
                tokio::time::sleep(pacing.batch_pause()).await;
            }
        }

        rows
    }

    fn item_path(&self, item: &WorkItem) -> PathBuf {
        self.output_dir.join(item.file_name())
    }
}

/// Runs a complete harvest with the given configuration
pub async fn run_harvest(config: Config) -> Result<RunSummary, SieveError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
