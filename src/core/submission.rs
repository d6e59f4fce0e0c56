//! Submission step: capability check, rehearsal short-circuit, validation,
//! then the real write.
//!
//! The order matters. Missing write capability fails even in rehearsal,
//! and rehearsal returns before the text is validated.

use tracing::{error, info};

use crate::adapters::ContentProvider;
use crate::domain::{SubmissionErrorKind, SubmissionOutcome};

/// Platform ceiling for a single reply, in characters
pub const MAX_COMMENT_LENGTH: usize = 10_000;

/// Identifier returned for simulated submissions
pub const REHEARSAL_REPLY_ID: &str = "dry_run_comment";

/// Check reply text against the emptiness and size constraints
pub fn validate_text(text: &str) -> Result<(), String> {
    if text.trim().is_empty() {
        return Err("Comment text cannot be empty".to_string());
    }

    let length = text.chars().count();
    if length > MAX_COMMENT_LENGTH {
        return Err(format!(
            "Comment text too long ({} > {} characters)",
            length, MAX_COMMENT_LENGTH
        ));
    }

    Ok(())
}

/// Submit `text` as a reply to `post_id`, or simulate it when `rehearsal`
pub async fn submit(
    provider: &dyn ContentProvider,
    post_id: &str,
    text: &str,
    rehearsal: bool,
) -> SubmissionOutcome {
    if !provider.can_write() {
        return SubmissionOutcome::failed(
            SubmissionErrorKind::NoAuth,
            "Client not configured for posting. Provide a bot username and password.",
        );
    }

    if rehearsal {
        let preview: String = text.chars().take(100).collect();
        info!(post_id, "DRY RUN - would post comment: {}...", preview);
        return SubmissionOutcome::rehearsed(REHEARSAL_REPLY_ID);
    }

    if let Err(message) = validate_text(text) {
        return SubmissionOutcome::failed(SubmissionErrorKind::Validation, message);
    }

    match provider.submit_reply(post_id, text).await {
        Ok(reply) => {
            let url = provider.reply_url(post_id, &reply);
            info!(post_id, reply_id = %reply.id, "Successfully posted comment");
            SubmissionOutcome::posted(reply.id, url)
        }
        Err(e) => {
            let message = format!("Failed to post comment: {}", e);
            error!(post_id, "{}", message);
            SubmissionOutcome::failed(SubmissionErrorKind::Other, message)
        }
    }
}
