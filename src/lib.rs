//! replybot - Reddit reply pipeline driven by Gemini
//!
//! Picks a discussion post, judges whether it is worth replying to,
//! generates a tone-controlled reply and submits it, or rehearses every
//! step except the final write.
//!
//! # Architecture
//!
//! One [`Orchestrator`] is built per process over two ports:
//! - [`adapters::ContentProvider`]: list, fetch and reply to posts (Reddit)
//! - [`adapters::Generator`]: single-shot text completion (Gemini)
//!
//! Three entry points share it: the unattended run, the interactive
//! session and the HTTP server.
//!
//! # Modules
//!
//! - `adapters`: Port traits and the Reddit/Gemini clients
//! - `core`: Suitability, prompts, generation, submission, orchestration
//! - `domain`: Data structures (Candidate, Reply, Tone, Run)
//! - `config`: Settings resolution from env and `.replybot/config.yaml`
//! - `cli`: Command-line interface
//! - `server`: HTTP routes
//!
//! # Usage
//!
//! ```bash
//! # Rehearse an unattended run (nothing is posted)
//! replybot run
//!
//! # Post for real, inside the posting window
//! replybot run --live
//!
//! # Pick everything by hand
//! replybot interactive
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;
pub mod server;

// Re-export main types at crate root for convenience
pub use adapters::{ContentProvider, Generator};
pub use config::Settings;
pub use core::Orchestrator;
pub use domain::{Candidate, GenerationResult, Reply, Run, RunState, SubmissionOutcome, Tone};
pub use error::{ConfigError, GenerationError, ProviderError};
