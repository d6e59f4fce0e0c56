//! Advisory suitability check for candidate posts.
//!
//! Rules run in a fixed order and the first failing rule is reported:
//! 1. Low engagement: score below [`MIN_POST_SCORE`] and replies below
//!    [`MIN_POST_REPLIES`]. Either axis alone is enough to pass.
//! 2. No content: body empty or a removed/deleted sentinel.
//! 3. Title shorter than [`MIN_TITLE_LENGTH`] characters.
//!
//! The verdict never blocks anything by itself; callers may proceed anyway.

use std::fmt;

use serde::Serialize;

use crate::domain::{is_removed_body, Candidate};

pub const MIN_POST_SCORE: i64 = 5;
pub const MIN_POST_REPLIES: u64 = 3;
pub const MIN_TITLE_LENGTH: usize = 10;

/// Why a candidate was judged the way it was
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    LowEngagement,
    NoContent,
    TitleTooShort,
    Suitable,
}

impl Reason {
    pub fn message(&self) -> &'static str {
        match self {
            Reason::LowEngagement => "Low engagement (score/comments)",
            Reason::NoContent => "No content available",
            Reason::TitleTooShort => "Title too short",
            Reason::Suitable => "Post appears suitable for commenting",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub suitable: bool,
    pub reason: Reason,
}

impl Verdict {
    fn reject(reason: Reason) -> Self {
        Self {
            suitable: false,
            reason,
        }
    }
}

/// Judge a candidate against the fixed thresholds
pub fn evaluate(candidate: &Candidate) -> Verdict {
    if candidate.score < MIN_POST_SCORE && candidate.reply_count < MIN_POST_REPLIES {
        return Verdict::reject(Reason::LowEngagement);
    }

    if is_removed_body(&candidate.body) {
        return Verdict::reject(Reason::NoContent);
    }

    if candidate.title.chars().count() < MIN_TITLE_LENGTH {
        return Verdict::reject(Reason::TitleTooShort);
    }

    Verdict {
        suitable: true,
        reason: Reason::Suitable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(score: i64, replies: u64, body: &str, title: &str) -> Candidate {
        Candidate {
            id: "t".to_string(),
            title: title.to_string(),
            body: body.to_string(),
            channel: "test".to_string(),
            score,
            reply_count: replies,
            url: "https://example.com".to_string(),
        }
    }

    #[test]
    fn test_suitable_post() {
        let verdict = evaluate(&candidate(50, 10, "Some body", "A reasonable title"));
        assert!(verdict.suitable);
        assert_eq!(verdict.reason, Reason::Suitable);
    }

    #[test]
    fn test_engagement_needs_both_axes_low() {
        // Low score but enough replies
        assert!(evaluate(&candidate(0, 3, "body", "A reasonable title")).suitable);
        // Enough score but no replies
        assert!(evaluate(&candidate(5, 0, "body", "A reasonable title")).suitable);
        // Both low
        let verdict = evaluate(&candidate(4, 2, "body", "A reasonable title"));
        assert_eq!(verdict.reason, Reason::LowEngagement);
    }

    #[test]
    fn test_negative_score() {
        let verdict = evaluate(&candidate(-20, 0, "body", "A reasonable title"));
        assert_eq!(verdict.reason, Reason::LowEngagement);
    }

    #[test]
    fn test_removed_content() {
        for body in ["", "[deleted]", "[removed]"] {
            let verdict = evaluate(&candidate(10, 10, body, "A reasonable title"));
            assert_eq!(verdict.reason, Reason::NoContent);
        }
    }

    #[test]
    fn test_title_length_boundary() {
        assert_eq!(
            evaluate(&candidate(10, 10, "body", "123456789")).reason,
            Reason::TitleTooShort
        );
        assert!(evaluate(&candidate(10, 10, "body", "1234567890")).suitable);
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let verdict = evaluate(&candidate(0, 0, "", "short"));
        assert_eq!(verdict.reason, Reason::LowEngagement);

        let verdict = evaluate(&candidate(10, 0, "[removed]", "short"));
        assert_eq!(verdict.reason, Reason::NoContent);
    }
}
