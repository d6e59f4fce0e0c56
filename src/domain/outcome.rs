//! Result values produced by the generation and submission steps.
//!
//! Field names follow the JSON shapes served over HTTP, so these types
//! double as response bodies.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::tone::Tone;

/// Outcome of one generation attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub success: bool,

    /// Generated text, present iff `success`
    pub comment: Option<String>,

    /// Character count of `comment`
    pub length: Option<usize>,

    /// Tone the text was generated with
    pub tone: Tone,

    /// Failure description, present iff `!success`
    pub error: Option<String>,
}

impl GenerationResult {
    pub fn success(text: String, tone: Tone) -> Self {
        let length = text.chars().count();
        Self {
            success: true,
            comment: Some(text),
            length: Some(length),
            tone,
            error: None,
        }
    }

    pub fn failure(tone: Tone, error: impl fmt::Display) -> Self {
        Self {
            success: false,
            comment: None,
            length: None,
            tone,
            error: Some(error.to_string()),
        }
    }

    /// Generated text on success
    pub fn text(&self) -> Option<&str> {
        if self.success {
            self.comment.as_deref()
        } else {
            None
        }
    }
}

/// Classification of a failed submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionErrorKind {
    /// Credential lacks write capability, never retryable
    NoAuth,
    /// Text violates size or emptiness constraints
    Validation,
    /// Provider-side failure, may be retried by the caller
    Other,
}

impl SubmissionErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionErrorKind::NoAuth => "no_auth",
            SubmissionErrorKind::Validation => "validation",
            SubmissionErrorKind::Other => "other",
        }
    }
}

impl fmt::Display for SubmissionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a submit-or-simulate call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub success: bool,

    /// Identifier of the new reply (synthetic in rehearsal)
    #[serde(rename = "comment_id")]
    pub reply_id: Option<String>,

    /// Canonical URL of the new reply, real submissions only
    #[serde(rename = "comment_url")]
    pub reply_url: Option<String>,

    pub message: Option<String>,
    pub error: Option<String>,

    #[serde(rename = "error_type")]
    pub error_kind: Option<SubmissionErrorKind>,

    /// True when no network write was performed
    #[serde(default)]
    pub rehearsal: bool,
}

impl SubmissionOutcome {
    pub fn posted(reply_id: String, reply_url: Option<String>) -> Self {
        Self {
            success: true,
            reply_id: Some(reply_id),
            reply_url,
            message: Some("Comment posted successfully".to_string()),
            error: None,
            error_kind: None,
            rehearsal: false,
        }
    }

    pub fn rehearsed(synthetic_id: &str) -> Self {
        Self {
            success: true,
            reply_id: Some(synthetic_id.to_string()),
            reply_url: None,
            message: Some("Dry run completed successfully".to_string()),
            error: None,
            error_kind: None,
            rehearsal: true,
        }
    }

    pub fn failed(kind: SubmissionErrorKind, error: impl fmt::Display) -> Self {
        Self {
            success: false,
            reply_id: None,
            reply_url: None,
            message: None,
            error: Some(error.to_string()),
            error_kind: Some(kind),
            rehearsal: false,
        }
    }
}
