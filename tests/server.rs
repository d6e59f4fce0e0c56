//! HTTP Route Integration Tests
//!
//! Sends requests straight into the router with `oneshot`.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{candidate, orchestrator, reply, schedule, FakeGenerator, FakeProvider};
use replybot::core::AUTO_FALLBACK_TONE;
use replybot::server::{build_router, AppState};

const GOOD_TEXT: &str = "honestly this is the best take in the thread";

fn app() -> (Router, Arc<FakeProvider>, Arc<FakeGenerator>) {
    let provider = Arc::new(
        FakeProvider::new()
            .with_posts("rust", vec![candidate("low", 1, 0), candidate("good", 40, 12)])
            .with_replies(vec![reply("r1", 9), reply("r2", 4)])
            .writable(),
    );
    let generator = Arc::new(FakeGenerator::replying(GOOD_TEXT));
    let orch = orchestrator(&provider, &generator, schedule(&["rust"]), 12);
    let state = AppState {
        orchestrator: Arc::new(orch),
    };
    (
        build_router(state, "http://localhost:3000"),
        provider,
        generator,
    )
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(response).await
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (app, _, _) = app();
    let (status, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy", "can_post": true }));
}

#[tokio::test]
async fn test_list_posts() {
    let (app, provider, _) = app();
    let (status, body) = get(app, "/posts/rust").await;

    assert_eq!(status, StatusCode::OK);
    let posts = body.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[1]["id"], "good");
    assert_eq!(posts[1]["num_comments"], 12);
    assert_eq!(posts[1]["subreddit"], "rust");
    assert_eq!(*provider.last_limit.lock().unwrap(), Some(3));
}

#[tokio::test]
async fn test_list_posts_limit_is_clamped() {
    let (app, provider, _) = app();
    let (status, _) = get(app, "/posts/rust?limit=100").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(*provider.last_limit.lock().unwrap(), Some(25));

    let (app, provider, _) = self::app();
    get(app, "/posts/rust?limit=0").await;
    assert_eq!(*provider.last_limit.lock().unwrap(), Some(1));
}

#[tokio::test]
async fn test_unknown_channel_is_not_found() {
    let (app, _, _) = app();
    let (status, body) = get(app, "/posts/nothing_here").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_post_detail() {
    let (app, _, _) = app();
    let (status, body) = get(app, "/post/good").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "good");
    assert_eq!(body["content"], "Some body text worth replying to");
    assert_eq!(body["comments"].as_array().unwrap().len(), 2);
    assert_eq!(body["comments"][0]["score"], 9);

    let (app, _, _) = self::app();
    let (status, _) = get(app, "/post/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tones_in_menu_order() {
    let (app, _, _) = app();
    let (status, body) = get(app, "/tones").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            "auto",
            "supportive",
            "funny",
            "analytical",
            "questioning",
            "informative",
            "controversial"
        ])
    );
}

#[tokio::test]
async fn test_generate_rejects_unsuitable_post() {
    let (app, _, generator) = app();
    let (status, body) = post(app, "/generate-comment", json!({ "post_id": "low" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["tone"], "auto");
    assert_eq!(
        body["error"],
        "Post not suitable: Low engagement (score/comments)"
    );
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_generate_force_overrides_verdict() {
    let (app, _, generator) = app();
    let (_, body) = post(
        app,
        "/generate-comment",
        json!({ "post_id": "low", "tone": "funny", "force": true }),
    )
    .await;

    assert_eq!(body["success"], true);
    assert_eq!(body["tone"], "funny");
    assert_eq!(body["comment"], GOOD_TEXT);
    assert_eq!(body["length"], GOOD_TEXT.chars().count());
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_generate_unknown_tone_reports_concrete_style() {
    let (app, _, _) = app();
    let (_, body) = post(
        app,
        "/generate-comment",
        json!({ "post_id": "good", "tone": "sarcastic" }),
    )
    .await;

    assert_eq!(body["success"], true);
    assert_eq!(body["tone"], AUTO_FALLBACK_TONE.as_str());
    assert_ne!(body["tone"], "auto");
}

#[tokio::test]
async fn test_root_names_backends() {
    let (app, _, _) = app();
    let (status, body) = get(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["provider"], "fake");
    assert_eq!(body["generator"], "fake");
}

#[tokio::test]
async fn test_post_comment_defaults_to_dry_run() {
    let (app, provider, _) = app();
    let (status, body) = post(
        app,
        "/post-comment",
        json!({ "post_id": "good", "comment_text": GOOD_TEXT }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["comment_id"], "dry_run_comment");
    assert_eq!(provider.submit_calls(), 0);
}

#[tokio::test]
async fn test_post_comment_validation_error() {
    let (app, provider, _) = app();
    let (_, body) = post(
        app,
        "/post-comment",
        json!({ "post_id": "good", "comment_text": "   ", "dry_run": false }),
    )
    .await;

    assert_eq!(body["success"], false);
    assert_eq!(body["error_type"], "validation");
    assert_eq!(provider.submit_calls(), 0);
}
