use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{AppState, DEFAULT_POSTS_LIMIT, MAX_POSTS_LIMIT};
use crate::domain::{resolve_tone, Candidate, GenerationResult, Reply, SubmissionOutcome};

#[derive(Debug, Deserialize)]
pub struct PostsQuery {
    pub limit: Option<usize>,
}

/// One entry of a channel listing
#[derive(Debug, Serialize)]
struct PostSummary<'a> {
    id: &'a str,
    title: &'a str,
    score: i64,
    num_comments: u64,
    subreddit: &'a str,
}

impl<'a> From<&'a Candidate> for PostSummary<'a> {
    fn from(post: &'a Candidate) -> Self {
        Self {
            id: &post.id,
            title: &post.title,
            score: post.score,
            num_comments: post.reply_count,
            subreddit: &post.channel,
        }
    }
}

/// Full post with its top replies
#[derive(Debug, Serialize, Deserialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Candidate,
    pub comments: Vec<Reply>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub post_id: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    /// Generate even when the post is judged unsuitable
    #[serde(default)]
    pub force: bool,
}

fn default_tone() -> String {
    "auto".to_string()
}

#[derive(Debug, Deserialize)]
pub struct PostCommentRequest {
    pub post_id: String,
    pub comment_text: String,
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,
}

fn default_dry_run() -> bool {
    true
}

fn not_found(detail: impl Into<String>) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": detail.into() }))).into_response()
}

/// GET /
pub(super) async fn handle_root(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "message": "Reddit Auto Commenter API",
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.orchestrator.provider_name(),
        "generator": state.orchestrator.generator_name(),
    }))
}

/// GET /posts/{channel}?limit=N
pub(super) async fn handle_posts(
    State(state): State<AppState>,
    Path(channel): Path<String>,
    Query(query): Query<PostsQuery>,
) -> Response {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_POSTS_LIMIT)
        .clamp(1, MAX_POSTS_LIMIT);

    let posts = state.orchestrator.list_posts(&channel, limit).await;
    if posts.is_empty() {
        return not_found("No posts found or subreddit not accessible");
    }

    let summaries: Vec<PostSummary<'_>> = posts.iter().map(PostSummary::from).collect();
    Json(summaries).into_response()
}

/// GET /post/{id}
pub(super) async fn handle_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let post = match state.orchestrator.fetch_post(&id).await {
        Ok(post) => post,
        Err(e) => return not_found(format!("Post {} not available: {}", id, e)),
    };
    let comments = state.orchestrator.fetch_replies(&post).await;

    Json(PostDetail { post, comments }).into_response()
}

/// GET /tones
pub(super) async fn handle_tones(State(state): State<AppState>) -> impl IntoResponse {
    let tones: Vec<&'static str> = state
        .orchestrator
        .available_tones()
        .iter()
        .map(|t| t.as_str())
        .collect();
    Json(tones)
}

/// POST /generate-comment
pub(super) async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Json<GenerationResult> {
    let tone = resolve_tone(&request.tone);
    let orchestrator = &state.orchestrator;

    let post = match orchestrator.fetch_post(&request.post_id).await {
        Ok(post) => post,
        Err(e) => return Json(GenerationResult::failure(tone, e)),
    };

    let verdict = orchestrator.evaluate(&post);
    if !verdict.suitable && !request.force {
        return Json(GenerationResult::failure(
            tone,
            format!("Post not suitable: {}", verdict.reason.message()),
        ));
    }

    let replies = orchestrator.fetch_replies(&post).await;
    Json(orchestrator.generate(&post, &replies, tone).await)
}

/// POST /post-comment
pub(super) async fn handle_post_comment(
    State(state): State<AppState>,
    Json(request): Json<PostCommentRequest>,
) -> Json<SubmissionOutcome> {
    Json(
        state
            .orchestrator
            .submit(&request.post_id, &request.comment_text, request.dry_run)
            .await,
    )
}

/// GET /health
pub(super) async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "can_post": state.orchestrator.can_write(),
    }))
}
