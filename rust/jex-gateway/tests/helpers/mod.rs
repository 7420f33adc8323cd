#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use jex_gateway::commands::router;
use jex_messaging::MessageBus;
use jex_model::{Job, SubmissionSettings};
use tower::ServiceExt;

pub fn submission() -> Vec<u8> {
    std::fs::read(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/test_submission.json"
    ))
    .unwrap()
}

pub fn submitted_job() -> Job {
    Job::from_submission(&submission(), &SubmissionSettings::default()).unwrap()
}

pub fn test_router<B: MessageBus>(bus: B) -> Router {
    router(
        bus,
        SubmissionSettings::default(),
        Duration::from_secs(5),
        None,
    )
    .unwrap()
}

pub fn request(method: Method, uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body))
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, body.to_vec())
}
