//! Wire shapes of the forum's JSON endpoints
//!
//! Every field is optional on the wire; conversion into [`Post`] and
//! [`Comment`] fills in the defaults.

use crate::records::{Comment, Post};
use serde::Deserialize;

/// Author recorded when the source omits one
pub const DELETED_AUTHOR: &str = "[deleted]";

/// A `{kind, data}` envelope, the unit of every response
#[derive(Debug, Clone, Deserialize)]
pub struct Thing<T> {
    #[serde(default)]
    pub kind: String,
    pub data: T,
}

/// The `data` of a `Listing` thing: one page of children plus the cursor
#[derive(Debug, Clone, Deserialize)]
pub struct ListingData<T> {
    #[serde(default = "Vec::new")]
    pub children: Vec<T>,
    #[serde(default)]
    pub after: Option<String>,
}

/// Response of the hot-listing and search endpoints
pub type ListingResponse = Thing<ListingData<Thing<PostData>>>;

/// Response of the per-post endpoint: `[post listing, comment listing]`
///
/// Children stay untyped because the comment listing mixes `t1` comments with
/// `more` placeholders of a different shape.
pub type CommentPageResponse = Vec<Thing<ListingData<Thing<serde_json::Value>>>>;

/// `kind` of comment nodes
pub const COMMENT_KIND: &str = "t1";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostData {
    pub title: Option<String>,
    pub score: Option<i64>,
    pub created_utc: Option<f64>,
    pub permalink: Option<String>,
    pub selftext: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentData {
    pub author: Option<String>,
    pub body: Option<String>,
    pub score: Option<i64>,
    pub created_utc: Option<f64>,
}

impl From<PostData> for Post {
    fn from(data: PostData) -> Self {
        Post {
            title: data.title.unwrap_or_default(),
            score: data.score.unwrap_or(0),
            created_utc: data.created_utc.unwrap_or(0.0),
            permalink: data.permalink.unwrap_or_default(),
            selftext: data.selftext.unwrap_or_default(),
        }
    }
}

impl From<CommentData> for Comment {
    fn from(data: CommentData) -> Self {
        Comment {
            author: data.author.unwrap_or_else(|| DELETED_AUTHOR.to_string()),
            body: data.body.unwrap_or_default(),
            score: data.score.unwrap_or(0),
            created_utc: data.created_utc.unwrap_or(0.0),
        }
    }
}
