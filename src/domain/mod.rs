//! Domain types for the reply pipeline.
//!
//! This module contains the core data structures:
//! - Post: candidates and their existing replies
//! - Tone: the fixed tone catalog
//! - Outcome: generation and submission results
//! - Run: per-invocation state

pub mod outcome;
pub mod post;
pub mod run;
pub mod tone;

// Re-export commonly used types
pub use outcome::{GenerationResult, SubmissionErrorKind, SubmissionOutcome};
pub use post::{is_removed_body, Candidate, Reply, DELETED_AUTHOR, LINK_POST_PLACEHOLDER};
pub use run::{Run, RunState, Stage};
pub use tone::{list_tones, resolve as resolve_tone, Tone, UnknownTone, TONES};
