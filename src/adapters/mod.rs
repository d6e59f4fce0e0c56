//! Adapter interfaces for external systems.
//!
//! The pipeline talks to two collaborators through these ports:
//! - [`ContentProvider`]: lists, fetches and replies to posts (Reddit)
//! - [`Generator`]: single-shot text completion (Gemini)
//!
//! Implementations must tolerate concurrent calls; the HTTP entry point
//! shares one instance of each across requests.

pub mod gemini;
pub mod reddit;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{list_tones, Candidate, Reply, Tone};
use crate::error::ProviderError;

pub use gemini::GeminiClient;
pub use reddit::RedditClient;

/// Time window for top-post listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Hour => "hour",
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reply created by [`ContentProvider::submit_reply`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedReply {
    pub id: String,

    /// Site-relative permalink, when the provider returns one
    pub permalink: Option<String>,
}

/// Read/write access to the social content source
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Human-readable provider name
    fn name(&self) -> &str;

    /// Whether the bound credential may post replies
    fn can_write(&self) -> bool;

    /// Top posts of a channel for the given window
    async fn list_top(
        &self,
        channel: &str,
        limit: usize,
        window: TimeWindow,
    ) -> Result<Vec<Candidate>, ProviderError>;

    /// Fully hydrated post by id
    async fn fetch_body(&self, id: &str) -> Result<Candidate, ProviderError>;

    /// Top-level replies, with deleted entries and "load more" stubs removed
    async fn list_top_replies(
        &self,
        candidate: &Candidate,
        limit: usize,
    ) -> Result<Vec<Reply>, ProviderError>;

    /// Post a new top-level reply
    async fn submit_reply(&self, id: &str, text: &str) -> Result<SubmittedReply, ProviderError>;

    /// Canonical URL for a reply
    fn reply_url(&self, post_id: &str, reply: &SubmittedReply) -> Option<String> {
        let _ = (post_id, reply);
        None
    }
}

/// Single-shot text generation
#[async_trait]
pub trait Generator: Send + Sync {
    /// Human-readable generator name
    fn name(&self) -> &str;

    /// Tones this generator can be asked for, in menu order
    fn available_tones(&self) -> Vec<Tone> {
        list_tones().to_vec()
    }

    /// Generate text from a system and a user instruction.
    /// No conversation state is kept between calls.
    async fn complete(
        &self,
        system_instruction: &str,
        user_instruction: &str,
    ) -> Result<String, ProviderError>;
}
