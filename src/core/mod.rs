//! Core pipeline logic.
//!
//! This module contains:
//! - Suitability: advisory filter for candidate posts
//! - Prompts: tone personas and user instruction templates
//! - Generation: prompt building, generator call, length check
//! - Submission: capability check, rehearsal, validation, real write
//! - Schedule: channel/tone pools and the posting window
//! - Orchestrator: the unattended run and the steps shared by all entry points

pub mod generation;
pub mod orchestrator;
pub mod prompts;
pub mod schedule;
pub mod submission;
pub mod suitability;

// Re-export commonly used types
pub use generation::{AUTO_FALLBACK_TONE, MIN_COMMENT_LENGTH};
pub use orchestrator::Orchestrator;
pub use prompts::{persona_for, MAX_CONTEXT_BODY_CHARS};
pub use schedule::{Clock, FixedClock, LocalClock, PostingWindow, Schedule};
pub use submission::{MAX_COMMENT_LENGTH, REHEARSAL_REPLY_ID};
pub use suitability::{evaluate, Reason, Verdict};
