use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Thread-Sieve
///
/// Every section is optional. A missing file section falls back to the
/// built-in defaults, and a config with no `[[listing]]` or `[[search]]`
/// entries at all runs the built-in worklist.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default, rename = "listing")]
    pub listings: Vec<ListingItem>,
    #[serde(default, rename = "search")]
    pub searches: Vec<SearchItem>,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme and host of the forum, without a trailing slash
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Value of the `User-Agent` header; the source blocks library defaults
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Overall per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

/// Delays applied between requests. All values are milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Pause after each accepted hot-listing page
    #[serde(rename = "listing-delay")]
    pub listing_delay: u64,

    /// Pause after each accepted search page
    #[serde(rename = "search-delay")]
    pub search_delay: u64,

    /// Wait after a 429 before retrying the same request
    #[serde(rename = "rate-limit-cooldown")]
    pub rate_limit_cooldown: u64,

    /// Number of posts processed before a batch pause
    #[serde(rename = "batch-size")]
    pub batch_size: usize,

    #[serde(rename = "batch-pause")]
    pub batch_pause: u64,

    /// Pause between work items, taken whether or not the item succeeded
    #[serde(rename = "item-pause")]
    pub item_pause: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Items requested per page (the source caps this at 100)
    #[serde(rename = "page-size")]
    pub page_size: u32,

    /// Maximum number of accepted pages in search mode
    #[serde(rename = "max-search-pages")]
    pub max_search_pages: u32,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving every CSV file
    pub directory: String,

    /// File name of the table aggregating all work items
    #[serde(rename = "combined-file")]
    pub combined_file: String,
}

/// A full hot listing of one community
#[derive(Debug, Clone, Deserialize)]
pub struct ListingItem {
    pub community: String,

    /// Soft cap on the number of posts fetched
    pub target: usize,

    #[serde(default = "default_listing_category")]
    pub category: String,
}

/// A keyword search restricted to one community
#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub community: String,
    pub keyword: String,
    pub target: usize,
    pub category: String,
}

fn default_listing_category() -> String {
    "general_uk".to_string()
}

impl Config {
    /// Returns true when the file named no work items of its own
    pub fn has_worklist(&self) -> bool {
        !self.listings.is_empty() || !self.searches.is_empty()
    }

    /// Fills an empty worklist with the built-in one
    pub fn with_default_worklist(mut self) -> Self {
        if !self.has_worklist() {
            self.listings = default_listings();
            self.searches = default_searches();
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            pacing: PacingConfig::default(),
            limits: LimitsConfig::default(),
            output: OutputConfig::default(),
            listings: default_listings(),
            searches: default_searches(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://old.reddit.com".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            listing_delay: 500,
            search_delay: 1000,
            rate_limit_cooldown: 60_000,
            batch_size: 50,
            batch_pause: 2000,
            item_pause: 5000,
        }
    }
}

impl PacingConfig {
    /// Pacing with every delay set to zero
    pub fn immediate() -> Self {
        Self {
            listing_delay: 0,
            search_delay: 0,
            rate_limit_cooldown: 0,
            batch_size: 50,
            batch_pause: 0,
            item_pause: 0,
        }
    }

    pub fn listing_delay(&self) -> Duration {
        Duration::from_millis(self.listing_delay)
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.rate_limit_cooldown)
    }

    pub fn batch_pause(&self) -> Duration {
        Duration::from_millis(self.batch_pause)
    }

    pub fn item_pause(&self) -> Duration {
        Duration::from_millis(self.item_pause)
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            max_search_pages: 20,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            combined_file: "UK_INTERNET_RETAIL_ALL.csv".to_string(),
        }
    }
}

/// Large UK communities scraped as full hot listings
fn default_listings() -> Vec<ListingItem> {
    [("AskUK", 2000), ("CasualUK", 2000), ("UKPersonalFinance", 1500)]
        .into_iter()
        .map(|(community, target)| ListingItem {
            community: community.to_string(),
            target,
            category: default_listing_category(),
        })
        .collect()
}

/// Online retail keyword searches
fn default_searches() -> Vec<SearchItem> {
    [
        ("AskUK", "online shopping", 800, "online_shopping"),
        ("AskUK", "Amazon UK", 800, "amazon"),
        ("AskUK", "delivery", 800, "delivery"),
        ("CasualUK", "online order", 800, "online_shopping"),
        ("CasualUK", "parcel", 800, "delivery"),
        ("AskUK", "ASOS", 600, "fashion_ecommerce"),
        ("AskUK", "eBay UK", 600, "marketplace"),
        ("AskUK", "Tesco delivery", 600, "online_grocery"),
        ("AskUK", "Ocado", 600, "online_grocery"),
        ("CasualUK", "supermarket delivery", 600, "online_grocery"),
        ("AskUK", "Deliveroo", 600, "food_delivery"),
        ("AskUK", "Just Eat", 600, "food_delivery"),
        ("CasualUK", "takeaway delivery", 600, "food_delivery"),
        ("UKPersonalFinance", "online purchase", 600, "online_shopping"),
        ("unitedkingdom", "e-commerce", 600, "ecommerce"),
    ]
    .into_iter()
    .map(|(community, keyword, target, category)| SearchItem {
        community: community.to_string(),
        keyword: keyword.to_string(),
        target,
        category: category.to_string(),
    })
    .collect()
}
