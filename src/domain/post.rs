//! Posts and replies fetched from the content source.

use serde::{Deserialize, Serialize};

/// Body used for posts that carry no self text (links, images, videos).
pub const LINK_POST_PLACEHOLDER: &str = "[Link/Image Post]";

/// Author label for replies whose account no longer exists.
pub const DELETED_AUTHOR: &str = "[deleted]";

/// Bodies that mean the content is gone.
pub const REMOVED_BODIES: [&str; 3] = ["[deleted]", "[removed]", ""];

/// Check whether a body is empty or one of the removed/deleted sentinels
pub fn is_removed_body(body: &str) -> bool {
    REMOVED_BODIES.contains(&body)
}

/// A post considered for commenting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Provider-assigned identifier
    pub id: String,

    pub title: String,

    /// Self text, or [`LINK_POST_PLACEHOLDER`] for non-text posts
    #[serde(rename = "content")]
    pub body: String,

    /// Channel (subreddit) the post belongs to
    #[serde(rename = "subreddit")]
    pub channel: String,

    /// Net popularity score, may be negative
    pub score: i64,

    /// Number of replies reported by the provider
    #[serde(rename = "num_comments")]
    pub reply_count: u64,

    /// Canonical link
    pub url: String,
}

impl Candidate {
    /// Title cut down to at most `max_chars` characters for log lines
    pub fn title_preview(&self, max_chars: usize) -> String {
        if self.title.chars().count() > max_chars {
            let cut: String = self.title.chars().take(max_chars).collect();
            format!("{}...", cut)
        } else {
            self.title.clone()
        }
    }
}

/// A reply already attached to a candidate, used as generation context only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub id: String,
    pub body: String,
    pub score: i64,

    /// Author name or [`DELETED_AUTHOR`]
    pub author: String,

    /// Seconds since the Unix epoch
    pub created_utc: f64,
}
