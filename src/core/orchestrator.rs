//! Main orchestrator for the reply pipeline.
//!
//! One orchestrator is built per process with concrete ports and handed
//! to every entry adapter. It owns no per-run state; each run gets its
//! own [`Run`].

use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use tracing::{error, info, instrument, warn};

use super::generation;
use super::schedule::{Clock, LocalClock, Schedule};
use super::submission;
use super::suitability::{self, Verdict};
use crate::adapters::{ContentProvider, Generator, TimeWindow};
use crate::domain::{
    Candidate, GenerationResult, Reply, Run, RunState, Stage, SubmissionOutcome, Tone,
};
use crate::error::ProviderError;

/// Main pipeline orchestrator
pub struct Orchestrator {
    provider: Arc<dyn ContentProvider>,
    generator: Arc<dyn Generator>,
    schedule: Schedule,
    clock: Arc<dyn Clock>,
    rng: Mutex<StdRng>,
}

impl Orchestrator {
    /// Create an orchestrator over the given ports
    pub fn new(
        provider: Arc<dyn ContentProvider>,
        generator: Arc<dyn Generator>,
        schedule: Schedule,
    ) -> Self {
        Self {
            provider,
            generator,
            schedule,
            clock: Arc::new(LocalClock),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Replace the wall clock used by the posting window
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Make random draws reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn can_write(&self) -> bool {
        self.provider.can_write()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// Full tone catalog as offered by the generator
    pub fn available_tones(&self) -> Vec<Tone> {
        self.generator.available_tones()
    }

    /// Top posts of a channel; fetch failures degrade to an empty list
    pub async fn list_posts(&self, channel: &str, limit: usize) -> Vec<Candidate> {
        match self.provider.list_top(channel, limit, TimeWindow::Day).await {
            Ok(posts) => posts,
            Err(e) => {
                error!(channel, error = %e, "Error fetching posts");
                Vec::new()
            }
        }
    }

    /// Fully hydrated post
    pub async fn fetch_post(&self, id: &str) -> Result<Candidate, ProviderError> {
        self.provider.fetch_body(id).await.map_err(|e| {
            error!(post_id = id, error = %e, "Failed to fetch post");
            e
        })
    }

    /// Top replies of a post; fetch failures degrade to an empty list
    pub async fn fetch_replies(&self, candidate: &Candidate) -> Vec<Reply> {
        match self
            .provider
            .list_top_replies(candidate, self.schedule.reply_limit)
            .await
        {
            Ok(replies) => replies,
            Err(e) => {
                error!(post_id = %candidate.id, error = %e, "Error fetching replies");
                Vec::new()
            }
        }
    }

    pub fn evaluate(&self, candidate: &Candidate) -> Verdict {
        suitability::evaluate(candidate)
    }

    pub async fn generate(
        &self,
        candidate: &Candidate,
        replies: &[Reply],
        tone: Tone,
    ) -> GenerationResult {
        generation::generate(self.generator.as_ref(), candidate, replies, tone).await
    }

    pub async fn submit(&self, post_id: &str, text: &str, rehearsal: bool) -> SubmissionOutcome {
        submission::submit(self.provider.as_ref(), post_id, text, rehearsal).await
    }

    /// Unattended run: random channel, random suitable post, random tone,
    /// generate, then submit inside the posting window (or simulate).
    #[instrument(skip(self))]
    pub async fn run_unattended(&self, rehearsal: bool) -> Run {
        let mut run = Run::new(rehearsal);
        info!(run_id = %run.id, "Starting unattended run");

        if let Err(e) = self.schedule.validate() {
            run.fail(Stage::Configuration, e.to_string());
            self.log_summary(&run);
            return run;
        }

        let selected = match self.select_candidate(&mut run).await {
            Some(candidate) => candidate,
            None => {
                run.fail(
                    Stage::SelectCandidate,
                    "Failed to select a suitable post from any subreddit",
                );
                self.log_summary(&run);
                return run;
            }
        };

        let candidate = match self.fetch_post(&selected.id).await {
            Ok(candidate) => candidate,
            Err(e) => {
                run.fail(Stage::FetchPost, e.to_string());
                self.log_summary(&run);
                return run;
            }
        };
        info!(title = %candidate.title, "Selected post");

        run.replies = self.fetch_replies(&candidate).await;
        run.candidate = Some(candidate.clone());

        let tone = self.pick(&self.schedule.tones).unwrap_or(Tone::Auto);
        info!(%tone, "Selected tone");
        run.tone = Some(tone);

        let result = self.generate(&candidate, &run.replies, tone).await;
        let text = result.text().map(str::to_string);
        let error = result.error.clone();
        run.generation = Some(result);

        let text = match text {
            Some(text) => text,
            None => {
                run.fail(Stage::Generate, error.unwrap_or_default());
                self.log_summary(&run);
                return run;
            }
        };

        if !rehearsal {
            let hour = self.clock.current_hour();
            if !self.schedule.window.contains(hour) {
                let window = self.schedule.window;
                info!(
                    hour,
                    start = window.start_hour,
                    end = window.end_hour,
                    "Skipping posting - outside of allowed hours"
                );
                run.finish(RunState::Skipped {
                    reason: format!(
                        "Current hour {} is outside posting hours {}:00-{}:00",
                        hour, window.start_hour, window.end_hour
                    ),
                });
                self.log_summary(&run);
                return run;
            }
        }

        let outcome = self.submit(&candidate.id, &text, rehearsal).await;
        if outcome.success {
            run.finish(if outcome.rehearsal {
                RunState::Rehearsed
            } else {
                RunState::Submitted
            });
        } else {
            run.fail(Stage::Submit, outcome.error.clone().unwrap_or_default());
        }
        run.submission = Some(outcome);

        self.log_summary(&run);
        run
    }

    /// Draw channels until one yields a suitable post
    async fn select_candidate(&self, run: &mut Run) -> Option<Candidate> {
        for attempt in 1..=self.schedule.channel_attempts {
            let channel = self.pick(&self.schedule.channels)?;
            run.channel_attempts = attempt;

            if attempt > 1 {
                info!(attempt, "Trying a different subreddit");
            }
            info!(attempt, channel = %channel, "Selected subreddit");

            let suitable: Vec<Candidate> = self
                .list_posts(&channel, self.schedule.post_limit)
                .await
                .into_iter()
                .filter(|post| self.evaluate(post).suitable)
                .collect();

            if let Some(candidate) = self.pick(&suitable) {
                run.channel = Some(channel);
                return Some(candidate);
            }

            warn!(channel = %channel, "No suitable posts found");
        }

        None
    }

    /// Uniform draw from a pool
    fn pick<T: Clone>(&self, items: &[T]) -> Option<T> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        items.choose(&mut *rng).cloned()
    }

    /// Log the terminal outcome of a run
    pub fn log_summary(&self, run: &Run) {
        let channel = run.channel.as_deref().unwrap_or("-");
        let title = run
            .candidate
            .as_ref()
            .map(|c| c.title_preview(60))
            .unwrap_or_default();
        let score = run.candidate.as_ref().map(|c| c.score).unwrap_or_default();
        let replies = run
            .candidate
            .as_ref()
            .map(|c| c.reply_count)
            .unwrap_or_default();
        let tone = run
            .generation
            .as_ref()
            .map(|g| g.tone)
            .or(run.tone)
            .map(|t| t.to_string())
            .unwrap_or_default();
        let text = run.generated_text().unwrap_or_default();

        match &run.state {
            RunState::Submitted | RunState::Rehearsed | RunState::Skipped { .. } => info!(
                run_id = %run.id,
                channel,
                title = %title,
                score,
                replies,
                tone = %tone,
                comment = %text,
                rehearsal = run.rehearsal,
                state = ?run.state,
                "Run summary"
            ),
            RunState::Failed { stage, error } => error!(
                run_id = %run.id,
                channel,
                title = %title,
                score,
                replies,
                tone = %tone,
                comment = %text,
                rehearsal = run.rehearsal,
                stage = ?stage,
                error = %error,
                "Run failed"
            ),
            RunState::Running => warn!(run_id = %run.id, "Summary requested for a run still in progress"),
        }
    }
}
