//! Paginated post listings
//!
//! A listing is read page by page, carrying the `after` cursor of each page
//! into the next request, until the target is met or the source runs dry.

use crate::crawler::fetcher::{FetchResult, ForumClient, ThrottlePolicy};
use crate::crawler::models::ListingResponse;
use crate::records::Post;
use std::fmt;
use url::Url;

/// Which feed of a community to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingMode {
    /// The community's hot listing
    Hot,

    /// A relevance-sorted keyword search restricted to the community
    Search { query: String },
}

/// Why a listing stopped
///
/// Every variant ends the fetch with whatever was accumulated; the
/// distinction only tells a finished listing from a failed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    EmptyPage,
    CursorExhausted,
    CursorRepeated,
    PageCap,
    UpstreamStatus(u16),
    Transport,
    Malformed,
}

impl StopReason {
    /// True when the stop was caused by a failure rather than end-of-data
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            StopReason::UpstreamStatus(_) | StopReason::Transport | StopReason::Malformed
        )
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::TargetReached => write!(f, "target reached"),
            StopReason::EmptyPage => write!(f, "empty page"),
            StopReason::CursorExhausted => write!(f, "no next cursor"),
            StopReason::CursorRepeated => write!(f, "cursor repeated"),
            StopReason::PageCap => write!(f, "page cap reached"),
            StopReason::UpstreamStatus(code) => write!(f, "HTTP {}", code),
            StopReason::Transport => write!(f, "network failure"),
            StopReason::Malformed => write!(f, "malformed response"),
        }
    }
}

/// Posts collected from one listing
#[derive(Debug, Clone)]
pub struct Listing {
    pub posts: Vec<Post>,

    /// Number of pages whose items were kept
    pub pages: u32,
    pub stop: StopReason,
}

impl ForumClient {
    /// Reads a community listing until `target` posts are collected
    ///
    /// `target` is a soft cap: the last page is kept whole, so the result may
    /// overshoot by up to one page. A page with no items or no next cursor ends
    /// the listing and is itself discarded. Search mode additionally stops
    /// after `max-search-pages` kept pages.
    ///
    /// Throttling is waited out indefinitely with the cursor unchanged. Any
    /// other failure ends the listing early; it is never returned as an error.
    ///
    /// # Arguments
    ///
    /// * `community` - Community whose listing is read
    /// * `mode` - Hot listing or keyword search
    /// * `target` - Number of posts wanted
    ///
    /// # Returns
    ///
    /// A [`Listing`] with the kept posts, the number of kept pages, and the
    /// [`StopReason`] that ended the fetch
    pub async fn fetch_listing(
        &self,
        community: &str,
        mode: &ListingMode,
        target: usize,
    ) -> Listing {
        let policy = ThrottlePolicy::unbounded(self.pacing.cooldown());
        let delay = match mode {
            ListingMode::Hot => self.pacing.listing_delay(),
            ListingMode::Search { .. } => self.pacing.search_delay(),
        };

        let mut posts = Vec::new();
        let mut after: Option<String> = None;
        let mut pages = 0u32;

        let stop = loop {
            if posts.len() >= target {
                break StopReason::TargetReached;
            }
            if matches!(mode, ListingMode::Search { .. }) && pages >= self.limits.max_search_pages
            {
                break StopReason::PageCap;
            }

            let url = match self.listing_url(community, mode, after.as_deref()) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Cannot build listing URL for {}: {}", community, e);
                    break StopReason::Malformed;
                }
            };

            let page = match self.get_json::<ListingResponse>(&url, &policy).await {
                FetchResult::Success(page) => page,
                FetchResult::HttpError { status_code } => {
                    break StopReason::UpstreamStatus(status_code)
                }
                FetchResult::NetworkError { error } => {
                    tracing::warn!("Listing request failed for {}: {}", community, error);
                    break StopReason::Transport;
                }
                FetchResult::Malformed { error } => {
                    tracing::warn!("Unexpected listing body for {}: {}", community, error);
                    break StopReason::Malformed;
                }
            };

            let children = page.data.children;
            if children.is_empty() {
                break StopReason::EmptyPage;
            }

            let next = match page.data.after.filter(|cursor| !cursor.is_empty()) {
                Some(next) => next,
                None => break StopReason::CursorExhausted,
            };
            if after.as_deref() == Some(next.as_str()) {
                break StopReason::CursorRepeated;
            }

            posts.extend(children.into_iter().map(|child| Post::from(child.data)));
            pages += 1;
            after = Some(next);

            tracing::info!("r/{}: {}/{} posts", community, posts.len(), target);
            tokio::time::sleep(delay).await;
        };

        if stop.is_failure() {
            tracing::warn!(
                "r/{}: listing ended early ({}) with {} posts",
                community,
                stop,
                posts.len()
            );
        } else {
            tracing::info!("r/{}: got {} posts ({})", community, posts.len(), stop);
        }

        Listing { posts, pages, stop }
    }

    /// Builds the URL of one listing page
    pub fn listing_url(
        &self,
        community: &str,
        mode: &ListingMode,
        after: Option<&str>,
    ) -> Result<Url, url::ParseError> {
        let path = match mode {
            ListingMode::Hot => format!("r/{}/hot/.json", community),
            ListingMode::Search { .. } => format!("r/{}/search.json", community),
        };
        let mut url = self.base_url.join(&path)?;

        {
            let mut query = url.query_pairs_mut();
            if let ListingMode::Search { query: q } = mode {
                query
                    .append_pair("q", q)
                    .append_pair("restrict_sr", "1")
                    .append_pair("sort", "relevance");
            }
            query.append_pair("limit", &self.limits.page_size.to_string());
            if let Some(after) = after {
                query.append_pair("after", after);
            }
        }

        Ok(url)
    }
}
