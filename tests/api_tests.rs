//! Integration tests for the HTTP control surface
//!
//! The router is exercised directly via `tower::ServiceExt::oneshot`; no
//! listener is bound. The engine is replaced by the receiving end of the
//! event channel, which also lets the tests assert that handlers only queue
//! events and never mutate playback state themselves.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::util::ServiceExt; // for `oneshot`

use shufd::api::{build_router, AppContext};
use shufd::engine::EngineEvent;
use shufd::SharedState;

fn setup(state: Arc<SharedState>) -> (axum::Router, mpsc::Receiver<EngineEvent>) {
    let (events, rx) = mpsc::channel(8);
    (build_router(AppContext { state, events }), rx)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("should read body");
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

#[tokio::test]
async fn health_endpoint() {
    let (app, _rx) = setup(Arc::new(SharedState::new()));

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value =
        serde_json::from_str(&body_string(response.into_body()).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "shufd");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn index_shows_current_track_and_skip_link() {
    let state = Arc::new(SharedState::new());
    state
        .set_current_track(Some("Artist/01 - Song.mp3".to_string()))
        .await;
    let (app, _rx) = setup(state);

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response.into_body()).await;
    assert!(body.contains("Playing <b>Artist/01 - Song.mp3</b>"));
    assert!(body.contains("<a href=\"/next\">skip</a>"));
}

#[tokio::test]
async fn index_before_first_track() {
    let (app, _rx) = setup(Arc::new(SharedState::new()));

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response.into_body())
        .await
        .contains("Playing <b>(nothing)</b>"));
}

#[tokio::test]
async fn next_queues_one_skip_and_redirects() {
    let state = Arc::new(SharedState::new());
    state.set_current_track(Some("a.mp3".to_string())).await;
    let (app, mut rx) = setup(Arc::clone(&state));

    let response = app.oneshot(get("/next")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response.into_body()).await;
    assert!(body.contains("url=/"));

    // Exactly one event queued, and the handler touched no playback state.
    assert!(matches!(rx.try_recv(), Ok(EngineEvent::SkipRequested)));
    assert!(rx.try_recv().is_err());
    assert_eq!(state.current_track().await.as_deref(), Some("a.mp3"));
}

#[tokio::test]
async fn next_with_dead_engine_still_answers_200() {
    let state = Arc::new(SharedState::new());
    let (app, rx) = setup(state);
    drop(rx); // engine loop gone

    let response = app.oneshot(get("/next")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_path_answers_200_not_understood() {
    let (app, _rx) = setup(Arc::new(SharedState::new()));

    let response = app.oneshot(get("/frobnicate")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_string(response.into_body()).await,
        "Request not understood"
    );
}

#[tokio::test]
async fn status_reports_track_and_remaining() {
    let state = Arc::new(SharedState::new());
    state.set_current_track(Some("b.mp3".to_string())).await;
    state.set_remaining(4);
    let (app, _rx) = setup(state);

    let response = app.oneshot(get("/status")).await.unwrap();
    let body: Value =
        serde_json::from_str(&body_string(response.into_body()).await).unwrap();
    assert_eq!(body["current_track"], "b.mp3");
    assert_eq!(body["remaining"], 4);
}
