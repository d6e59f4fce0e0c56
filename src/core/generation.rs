//! Generation step: build the prompt, call the generator, validate the text.
//!
//! Every failure is converted into a [`GenerationResult`]; nothing is
//! retried here.

use tracing::{error, info, warn};

use super::prompts::{persona_for, split_style_marker, user_prompt, PromptContext};
use crate::adapters::Generator;
use crate::domain::{Candidate, GenerationResult, Reply, Tone};
use crate::error::GenerationError;

/// Shortest acceptable generated text, in characters
pub const MIN_COMMENT_LENGTH: usize = 10;

/// Reported for `auto` completions that do not name a usable style
pub const AUTO_FALLBACK_TONE: Tone = Tone::CONCRETE[0];

/// Generate a reply for `candidate` in the given tone
pub async fn generate(
    generator: &dyn Generator,
    candidate: &Candidate,
    replies: &[Reply],
    tone: Tone,
) -> GenerationResult {
    let context = PromptContext::new(candidate, replies);
    let system = persona_for(tone);
    let user = user_prompt(tone, &context);

    let outcome = match generator.complete(&system, &user).await {
        Ok(raw) => finish(tone, &raw),
        Err(e) => Err((tone, GenerationError::from(e))),
    };

    match outcome {
        Ok((resolved, text)) => {
            info!(tone = %resolved, "Generated {} comment: {}", resolved, text);
            GenerationResult::success(text, resolved)
        }
        Err((attempted, e)) => {
            let message = format!("Failed to generate {} comment: {}", attempted, e);
            error!(post_id = %candidate.id, "{}", message);
            GenerationResult::failure(attempted, message)
        }
    }
}

/// Resolve the reported tone and apply the length check
fn finish(tone: Tone, raw: &str) -> Result<(Tone, String), (Tone, GenerationError)> {
    let (resolved, body) = if tone.is_auto() {
        match split_style_marker(raw) {
            (Some(named), rest) => (named, rest),
            (None, rest) => {
                warn!(
                    fallback = %AUTO_FALLBACK_TONE,
                    "Auto completion named no known style"
                );
                (AUTO_FALLBACK_TONE, rest)
            }
        }
    } else {
        (tone, raw)
    };

    let text = body.trim().to_string();
    let length = text.chars().count();
    if length < MIN_COMMENT_LENGTH {
        return Err((
            resolved,
            GenerationError::TooShort {
                length,
                minimum: MIN_COMMENT_LENGTH,
            },
        ));
    }

    Ok((resolved, text))
}
