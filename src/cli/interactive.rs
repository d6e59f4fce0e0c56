//! Attended pipeline: a human picks the channel, the post and the tone.
//!
//! All prompts go through [`Prompter`], which works over any
//! `BufRead`/`Write` pair so sessions can be scripted in tests.

use std::fmt::Display;
use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};

use crate::core::Orchestrator;
use crate::domain::{Run, RunState, Stage};

/// Line-oriented question/answer helper
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print a line
    pub fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Ask for one line of input; `None` once the input is exhausted
    pub fn line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut buf = String::new();
        let read = self
            .input
            .read_line(&mut buf)
            .context("Failed to read from input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }

    fn required_line(&mut self, prompt: &str) -> Result<String> {
        match self.line(prompt)? {
            Some(answer) => Ok(answer),
            None => bail!("Input closed while waiting for an answer"),
        }
    }

    /// Ask for a number in `min..=max`, re-asking until one is given
    pub fn choice(&mut self, prompt: &str, min: usize, max: usize) -> Result<usize> {
        loop {
            let answer = self.required_line(prompt)?;
            match answer.parse::<usize>() {
                Ok(n) if (min..=max).contains(&n) => return Ok(n),
                _ => self.say(format!("Please enter a number between {} and {}", min, max))?,
            }
        }
    }

    /// Ask a yes/no question, re-asking until one is given
    pub fn yes_no(&mut self, prompt: &str) -> Result<bool> {
        loop {
            let answer = self.required_line(prompt)?;
            match answer.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Please answer y or n")?,
            }
        }
    }
}

/// One attended session bound to a shared orchestrator
pub struct InteractiveSession<'a, R, W> {
    orchestrator: &'a Orchestrator,
    prompter: Prompter<R, W>,
}

impl<'a, R: BufRead, W: Write> InteractiveSession<'a, R, W> {
    pub fn new(orchestrator: &'a Orchestrator, prompter: Prompter<R, W>) -> Self {
        Self {
            orchestrator,
            prompter,
        }
    }

    /// Walk through one post. Returns `None` when the user ends the session.
    pub async fn run_once(&mut self) -> Result<Option<Run>> {
        let channel = match self
            .prompter
            .line("\nEnter subreddit name (without r/, empty to quit): ")?
        {
            Some(channel) if !channel.is_empty() => channel,
            _ => return Ok(None),
        };

        // Rehearsal is decided by the final confirmation
        let mut run = Run::new(true);
        run.channel_attempts = 1;

        let limit = self.orchestrator.schedule().post_limit;
        let posts = self.orchestrator.list_posts(&channel, limit).await;
        if posts.is_empty() {
            self.prompter.say(format!("No posts found in r/{}", channel))?;
            run.fail(Stage::SelectCandidate, format!("No posts found in r/{}", channel));
            return Ok(Some(run));
        }
        run.channel = Some(channel.clone());

        self.prompter.say(format!("\nTop posts in r/{}:", channel))?;
        for (i, post) in posts.iter().enumerate() {
            self.prompter.say(format!(
                "{}. {}\n   Score: {} | Comments: {}",
                i + 1,
                post.title_preview(80),
                post.score,
                post.reply_count
            ))?;
        }

        let prompt = format!("Select a post (1-{}): ", posts.len());
        let index = self.prompter.choice(&prompt, 1, posts.len())?;
        let selected = &posts[index - 1];

        let post = match self.orchestrator.fetch_post(&selected.id).await {
            Ok(post) => post,
            Err(e) => {
                self.prompter.say(format!("Failed to fetch post: {}", e))?;
                run.fail(Stage::FetchPost, e.to_string());
                return Ok(Some(run));
            }
        };
        let replies = self.orchestrator.fetch_replies(&post).await;

        self.prompter.say(format!(
            "\n=== {} ===\nr/{} | Score: {} | Comments: {}\n{}\n\n{}",
            post.title, post.channel, post.score, post.reply_count, post.url, post.body
        ))?;
        if !replies.is_empty() {
            self.prompter.say("\nTop comments:")?;
            for (i, reply) in replies.iter().enumerate() {
                self.prompter.say(format!(
                    "{}. [{}] u/{}: {}",
                    i + 1,
                    reply.score,
                    reply.author,
                    reply.body
                ))?;
            }
        }

        run.candidate = Some(post.clone());
        run.replies = replies;

        let verdict = self.orchestrator.evaluate(&post);
        if !verdict.suitable {
            self.prompter
                .say(format!("\nWarning: {}", verdict.reason.message()))?;
            if !self.prompter.yes_no("Continue anyway? (y/n): ")? {
                run.finish(RunState::Skipped {
                    reason: format!("Post not suitable: {}", verdict.reason.message()),
                });
                return Ok(Some(run));
            }
        }

        let tones = self.orchestrator.available_tones();
        self.prompter.say("\nAvailable tones:")?;
        for (i, tone) in tones.iter().enumerate() {
            self.prompter
                .say(format!("{}. {} - {}", i + 1, tone, tone.description()))?;
        }
        let prompt = format!("Select a tone (1-{}): ", tones.len());
        let tone = tones[self.prompter.choice(&prompt, 1, tones.len())? - 1];
        run.tone = Some(tone);

        self.prompter.say(format!("\nGenerating {} comment...", tone))?;
        let result = self.orchestrator.generate(&post, &run.replies, tone).await;
        let text = result.text().map(str::to_string);
        let error = result.error.clone();
        let resolved = result.tone;
        run.generation = Some(result);

        let text = match text {
            Some(text) => text,
            None => {
                let error = error.unwrap_or_default();
                self.prompter.say(format!("Generation failed: {}", error))?;
                run.fail(Stage::Generate, error);
                return Ok(Some(run));
            }
        };

        self.prompter.say(format!(
            "\nGenerated comment ({} tone, {} characters):\n{}\n",
            resolved,
            text.chars().count(),
            text
        ))?;

        let post_it = self.prompter.yes_no("Post this comment? (y/n): ")?;
        run.rehearsal = !post_it;

        let outcome = self
            .orchestrator
            .submit(&post.id, &text, run.rehearsal)
            .await;
        if outcome.success {
            if outcome.rehearsal {
                self.prompter.say("Dry run complete, nothing was posted.")?;
                run.finish(RunState::Rehearsed);
            } else {
                self.prompter.say(format!(
                    "Comment posted: {}",
                    outcome.reply_url.as_deref().unwrap_or("-")
                ))?;
                run.finish(RunState::Submitted);
            }
        } else {
            let error = outcome.error.clone().unwrap_or_default();
            self.prompter.say(format!("Posting failed: {}", error))?;
            run.fail(Stage::Submit, error);
        }
        run.submission = Some(outcome);

        self.orchestrator.log_summary(&run);
        Ok(Some(run))
    }
}
