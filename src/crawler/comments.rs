//! Top-level comments of a single post

use crate::crawler::fetcher::{FetchResult, ForumClient, ThrottlePolicy};
use crate::crawler::models::{CommentData, CommentPageResponse, COMMENT_KIND};
use crate::records::Comment;
use url::Url;

/// Account whose comments are never recorded
pub const AUTOMODERATOR: &str = "AutoModerator";

impl ForumClient {
    /// Fetches the top-level comments of the post at `permalink`
    ///
    /// One request, retried once after a cool-down if throttled. Any failure
    /// yields an empty list. Comments by [`AUTOMODERATOR`] are dropped; the
    /// rest keep source order.
    ///
    /// # Arguments
    ///
    /// * `permalink` - Path-like locator of the post, e.g. `/r/AskUK/comments/abc/title/`
    ///
    /// # Returns
    ///
    /// The eligible top-level comments, empty on any failure or for an empty
    /// permalink
    pub async fn fetch_comments(&self, permalink: &str) -> Vec<Comment> {
        if permalink.is_empty() {
            return Vec::new();
        }

        let url = match self.comments_url(permalink) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Bad permalink {}: {}", permalink, e);
                return Vec::new();
            }
        };

        let policy = ThrottlePolicy::retry_once(self.pacing.cooldown());
        match self.get_json::<CommentPageResponse>(&url, &policy).await {
            FetchResult::Success(page) => extract_comments(page),
            FetchResult::HttpError { status_code } => {
                tracing::debug!("Comments for {} returned HTTP {}", permalink, status_code);
                Vec::new()
            }
            FetchResult::NetworkError { error } | FetchResult::Malformed { error } => {
                tracing::debug!("Comments for {} unavailable: {}", permalink, error);
                Vec::new()
            }
        }
    }

    /// `{base}{permalink}.json`
    pub fn comments_url(&self, permalink: &str) -> Result<Url, url::ParseError> {
        self.base_url
            .join(&format!("{}.json", permalink.trim_start_matches('/')))
    }
}

/// Pulls the eligible comments out of a post page
///
/// The second listing of the page holds the comment tree; only its direct
/// `t1` children are read, so replies and `more` stubs are ignored.
pub(crate) fn extract_comments(mut page: CommentPageResponse) -> Vec<Comment> {
    if page.len() < 2 {
        return Vec::new();
    }
    let tree = page.swap_remove(1);

    tree.data
        .children
        .into_iter()
        .filter(|child| child.kind == COMMENT_KIND)
        .filter_map(|child| match serde_json::from_value::<CommentData>(child.data) {
            Ok(data) => Some(Comment::from(data)),
            Err(e) => {
                tracing::debug!("Skipping unreadable comment: {}", e);
                None
            }
        })
        .filter(|comment| comment.author != AUTOMODERATOR)
        .collect()
}
