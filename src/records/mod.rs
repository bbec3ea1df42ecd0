//! Post, comment, and row records
//!
//! Posts and comments are transient: they are fetched, flattened into
//! [`Row`]s, and dropped. Only rows reach the output tables.

mod rows;
mod timestamp;

pub use rows::{flatten, NO_COMMENTS};
pub use timestamp::format_timestamp;

use serde::{Deserialize, Serialize};

/// A single forum post as returned by the listing endpoints
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Post {
    pub title: String,
    pub score: i64,

    /// Seconds since the Unix epoch
    pub created_utc: f64,

    /// Path-like locator of the post's comment page, e.g. `/r/AskUK/comments/abc/title/`
    pub permalink: String,

    /// Body text of a self-post, empty for link posts
    pub selftext: String,
}

/// A top-level comment on a [`Post`]
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Author name, `[deleted]` when the source omits it
    pub author: String,
    pub body: String,
    pub score: i64,

    /// Seconds since the Unix epoch
    pub created_utc: f64,
}

/// One output row: a post paired with one of its comments, or with nothing
///
/// Field order is the column order of every table written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub community: String,
    pub category: String,
    pub post_title: String,
    pub post_score: i64,
    pub post_datetime: String,
    pub post_text: String,
    pub comment_author: String,
    pub comment_text: String,
    pub comment_score: i64,
    pub comment_datetime: String,
}

impl Row {
    /// Column names in table order
    pub const COLUMNS: [&'static str; 10] = [
        "community",
        "category",
        "post_title",
        "post_score",
        "post_datetime",
        "post_text",
        "comment_author",
        "comment_text",
        "comment_score",
        "comment_datetime",
    ];

    /// Returns true for the placeholder row of a post without comments
    pub fn is_placeholder(&self) -> bool {
        self.comment_author == NO_COMMENTS
    }
}
