//! Run state for a single pipeline invocation.
//!
//! A Run is created when an entry adapter starts the pipeline and is
//! discarded once the adapter has reported it. Nothing is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::outcome::{GenerationResult, SubmissionOutcome};
use super::post::{Candidate, Reply};
use super::tone::Tone;

/// One pipeline execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    /// Correlates the log lines of this run
    pub id: Uuid,

    /// Every step except the final network write
    pub rehearsal: bool,

    pub state: RunState,

    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,

    /// Channel attempts made while looking for a candidate
    pub channel_attempts: u32,

    /// Channel the candidate was taken from
    pub channel: Option<String>,

    pub candidate: Option<Candidate>,

    #[serde(default)]
    pub replies: Vec<Reply>,

    pub tone: Option<Tone>,
    pub generation: Option<GenerationResult>,
    pub submission: Option<SubmissionOutcome>,
}

impl Run {
    pub fn new(rehearsal: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            rehearsal,
            state: RunState::Running,
            started_at: Utc::now(),
            completed_at: None,
            channel_attempts: 0,
            channel: None,
            candidate: None,
            replies: Vec::new(),
            tone: None,
            generation: None,
            submission: None,
        }
    }

    /// Move to a terminal state
    pub fn finish(&mut self, state: RunState) {
        self.state = state;
        self.completed_at = Some(Utc::now());
    }

    pub fn fail(&mut self, stage: Stage, error: impl Into<String>) {
        self.finish(RunState::Failed {
            stage,
            error: error.into(),
        });
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, RunState::Running)
    }

    pub fn is_finished(&self) -> bool {
        !self.is_running()
    }

    /// Whether a scheduler should treat this run as healthy
    pub fn is_success(&self) -> bool {
        matches!(
            self.state,
            RunState::Submitted | RunState::Rehearsed | RunState::Skipped { .. }
        )
    }

    /// Text that was (or would have been) submitted
    pub fn generated_text(&self) -> Option<&str> {
        self.generation.as_ref().and_then(GenerationResult::text)
    }
}

/// State of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum RunState {
    Running,

    /// A reply was posted for real
    Submitted,

    /// Every step completed, the write was simulated
    Rehearsed,

    /// Ended early on purpose, not an error
    Skipped { reason: String },

    Failed { stage: Stage, error: String },
}

impl Default for RunState {
    fn default() -> Self {
        Self::Running
    }
}

/// Pipeline stage a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Configuration,
    SelectCandidate,
    FetchPost,
    Generate,
    Submit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_creation() {
        let run = Run::new(true);
        assert!(run.rehearsal);
        assert!(run.is_running());
        assert!(!run.is_success());
        assert!(run.completed_at.is_none());
    }

    #[test]
    fn test_terminal_states() {
        let mut run = Run::new(false);
        run.finish(RunState::Skipped {
            reason: "outside posting hours".to_string(),
        });
        assert!(run.is_finished());
        assert!(run.is_success());
        assert!(run.completed_at.is_some());

        let mut run = Run::new(false);
        run.fail(Stage::Generate, "too short");
        assert!(!run.is_success());
        assert_eq!(
            run.state,
            RunState::Failed {
                stage: Stage::Generate,
                error: "too short".to_string()
            }
        );
    }
}
