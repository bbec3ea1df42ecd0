use crate::records::{format_timestamp, Comment, Post, Row};

/// `comment_author` of the row emitted for a post with no eligible comments
pub const NO_COMMENTS: &str = "NO_COMMENTS";

/// Cross-joins a post with its comments
///
/// Always returns at least one row: a post without comments yields a single
/// placeholder row whose comment fields are `NO_COMMENTS`, `""`, `0`, `""`.
///
/// # Arguments
///
/// * `post` - The post shared by every row
/// * `comments` - Eligible comments, in the order they should appear
/// * `community` - Community the post was read from
/// * `category` - Category label of the work item
///
/// # Returns
///
/// One row per comment in order, or the single placeholder row
pub fn flatten(post: &Post, comments: &[Comment], community: &str, category: &str) -> Vec<Row> {
    let post_datetime = format_timestamp(post.created_utc);

    let base = Row {
        community: community.to_string(),
        category: category.to_string(),
        post_title: post.title.clone(),
        post_score: post.score,
        post_datetime,
        post_text: post.selftext.clone(),
        comment_author: NO_COMMENTS.to_string(),
        comment_text: String::new(),
        comment_score: 0,
        comment_datetime: String::new(),
    };

    if comments.is_empty() {
        return vec![base];
    }

    comments
        .iter()
        .map(|comment| Row {
            comment_author: comment.author.clone(),
            comment_text: comment.body.clone(),
            comment_score: comment.score,
            comment_datetime: format_timestamp(comment.created_utc),
            ..base.clone()
        })
        .collect()
}
