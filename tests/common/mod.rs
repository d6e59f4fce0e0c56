//! In-memory ports shared by the integration tests.
//!
//! Both fakes count their calls so tests can assert "no retry" and
//! "zero submissions".

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use replybot::adapters::{ContentProvider, Generator, SubmittedReply, TimeWindow};
use replybot::core::{FixedClock, Orchestrator, Schedule};
use replybot::domain::{Candidate, Reply};
use replybot::ProviderError;

pub fn candidate(id: &str, score: i64, reply_count: u64) -> Candidate {
    Candidate {
        id: id.to_string(),
        title: format!("A reasonably long title for {}", id),
        body: "Some body text worth replying to".to_string(),
        channel: "rust".to_string(),
        score,
        reply_count,
        url: format!("https://reddit.com/r/rust/comments/{}", id),
    }
}

pub fn reply(id: &str, score: i64) -> Reply {
    Reply {
        id: id.to_string(),
        body: format!("reply {}", id),
        score,
        author: "someone".to_string(),
        created_utc: 1_700_000_000.0,
    }
}

#[derive(Default)]
pub struct FakeProvider {
    posts: HashMap<String, Vec<Candidate>>,
    replies: Vec<Reply>,
    writable: bool,
    fail_submit: bool,
    pub list_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub last_limit: Mutex<Option<usize>>,
    pub submitted: Mutex<Vec<(String, String)>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(mut self, channel: &str, posts: Vec<Candidate>) -> Self {
        self.posts.insert(channel.to_string(), posts);
        self
    }

    pub fn with_replies(mut self, replies: Vec<Reply>) -> Self {
        self.replies = replies;
        self
    }

    pub fn writable(mut self) -> Self {
        self.writable = true;
        self
    }

    pub fn failing_submit(mut self) -> Self {
        self.fail_submit = true;
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn can_write(&self) -> bool {
        self.writable
    }

    async fn list_top(
        &self,
        channel: &str,
        limit: usize,
        _window: TimeWindow,
    ) -> Result<Vec<Candidate>, ProviderError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_limit.lock().unwrap() = Some(limit);
        match self.posts.get(channel) {
            Some(posts) => Ok(posts.iter().take(limit).cloned().collect()),
            None => Err(ProviderError::NotFound(format!("r/{}", channel))),
        }
    }

    async fn fetch_body(&self, id: &str) -> Result<Candidate, ProviderError> {
        self.posts
            .values()
            .flatten()
            .find(|post| post.id == id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(id.to_string()))
    }

    async fn list_top_replies(
        &self,
        _candidate: &Candidate,
        limit: usize,
    ) -> Result<Vec<Reply>, ProviderError> {
        Ok(self.replies.iter().take(limit).cloned().collect())
    }

    async fn submit_reply(&self, id: &str, text: &str) -> Result<SubmittedReply, ProviderError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_submit {
            return Err(ProviderError::Api {
                service: "reddit",
                status: 403,
                message: "THREAD_LOCKED".to_string(),
            });
        }
        self.submitted
            .lock()
            .unwrap()
            .push((id.to_string(), text.to_string()));
        Ok(SubmittedReply {
            id: "newreply".to_string(),
            permalink: None,
        })
    }

    fn reply_url(&self, post_id: &str, reply: &SubmittedReply) -> Option<String> {
        Some(format!("https://reddit.com/comments/{}/_/{}", post_id, reply.id))
    }
}

/// Generator returning a canned completion, or failing when it has none
#[derive(Default)]
pub struct FakeGenerator {
    completion: Option<String>,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<(String, String)>>,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            completion: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_system_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().map(|(s, _)| s.clone())
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    fn name(&self) -> &str {
        "fake"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        self.completion.clone().ok_or(ProviderError::Api {
            service: "gemini",
            status: 500,
            message: "internal error".to_string(),
        })
    }
}

/// Single-channel schedule with one tone, so runs are deterministic
pub fn schedule(channels: &[&str]) -> Schedule {
    Schedule {
        channels: channels.iter().map(|c| c.to_string()).collect(),
        tones: vec![replybot::Tone::Funny],
        ..Schedule::default()
    }
}

pub fn orchestrator(
    provider: &Arc<FakeProvider>,
    generator: &Arc<FakeGenerator>,
    schedule: Schedule,
    hour: u32,
) -> Orchestrator {
    Orchestrator::new(provider.clone(), generator.clone(), schedule)
        .with_clock(Arc::new(FixedClock(hour)))
        .with_seed(7)
}
