// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Integration tests for the control-plane HTTP API.
//!
//! Uses `axum_test::TestServer` — no real TCP needed.

use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use clap::Parser;

use armctl::config::AppConfig;
use armctl::state::AppState;
use armctl::transport::build_router;

fn test_config() -> AppConfig {
    AppConfig::parse_from(["armctl", "--inference-rate-hz", "200"])
}

fn test_server() -> TestServer {
    let state = Arc::new(AppState::new(test_config()));
    let router = build_router(state);
    TestServer::new(router).expect("failed to create test server")
}

async fn poll_until_terminal(server: &TestServer, id: &str) -> serde_json::Value {
    for _ in 0..400 {
        let resp = server.get(&format!("/status/{id}")).await;
        resp.assert_status_ok();
        let body: serde_json::Value = resp.json();
        if matches!(body["state"].as_str(), Some("succeeded" | "failed" | "aborted")) {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("request {id} never reached a terminal state");
}

#[tokio::test]
async fn health_is_always_ok() -> anyhow::Result<()> {
    let server = test_server();
    let resp = server.get("/health").await;
    resp.assert_status_ok();

    let body: serde_json::Value = resp.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["api"], 1);
    Ok(())
}

#[tokio::test]
async fn happy_path_reaches_succeeded_via_handoff_macro() -> anyhow::Result<()> {
    let server = test_server();
    let resp = server.post("/command").json(&serde_json::json!({"prompt": "pick up the ball"})).await;
    resp.assert_status(axum::http::StatusCode::ACCEPTED);

    let body: serde_json::Value = resp.json();
    assert_eq!(body["status"], "accepted");
    let request_id = body["request_id"].as_str().unwrap().to_owned();

    let status = poll_until_terminal(&server, &request_id).await;
    assert_eq!(status["state"], "succeeded");
    assert!(status["duration_ms"].as_i64().unwrap() > 0);
    Ok(())
}

#[tokio::test]
async fn unknown_prompt_is_rejected() -> anyhow::Result<()> {
    let server = test_server();
    let resp = server.post("/command").json(&serde_json::json!({"prompt": "dance"})).await;
    resp.assert_status(axum::http::StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn second_command_while_busy_is_rejected() -> anyhow::Result<()> {
    let server = test_server();
    let r1 = server.post("/command").json(&serde_json::json!({"prompt": "pick up the ball"})).await;
    r1.assert_status(axum::http::StatusCode::ACCEPTED);

    let r2 = server.post("/command").json(&serde_json::json!({"prompt": "get the treat"})).await;
    r2.assert_status(axum::http::StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn go_home_preempts_the_active_command() -> anyhow::Result<()> {
    let server = test_server();
    let r1 = server.post("/command").json(&serde_json::json!({"prompt": "pick up the ball"})).await;
    r1.assert_status(axum::http::StatusCode::ACCEPTED);
    let id1 = r1.json::<serde_json::Value>()["request_id"].as_str().unwrap().to_owned();

    tokio::time::sleep(Duration::from_millis(5)).await;

    let r2 = server.post("/command").json(&serde_json::json!({"prompt": "go home"})).await;
    r2.assert_status(axum::http::StatusCode::ACCEPTED);
    let id2 = r2.json::<serde_json::Value>()["request_id"].as_str().unwrap().to_owned();

    let s1 = poll_until_terminal(&server, &id1).await;
    let s2 = poll_until_terminal(&server, &id2).await;

    assert_eq!(s1["state"], "aborted");
    assert_eq!(s1["message"], "Interrupted by Go Home");
    assert_eq!(s2["state"], "succeeded");
    assert_eq!(s2["message"], "At home pose");
    Ok(())
}

#[tokio::test]
async fn unknown_request_id_returns_200_synthetic_failure() -> anyhow::Result<()> {
    let server = test_server();
    let resp = server.get("/status/DEADBEEF").await;
    resp.assert_status_ok();

    let body: serde_json::Value = resp.json();
    assert_eq!(body["state"], "failed");
    assert!(body["phase"].is_null());
    assert_eq!(body["message"], "unknown request_id");
    Ok(())
}

#[tokio::test]
async fn dispense_treat_clamps_negative_duration() -> anyhow::Result<()> {
    let server = test_server();
    let resp = server.post("/dispense_treat").json(&serde_json::json!({"duration_ms": -500})).await;
    resp.assert_status_ok();

    let body: serde_json::Value = resp.json();
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn speak_rejects_empty_text() -> anyhow::Result<()> {
    let server = test_server();
    let resp = server.post("/speak").json(&serde_json::json!({"text": ""})).await;
    resp.assert_status(axum::http::StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn speak_accepts_ordinary_text() -> anyhow::Result<()> {
    let server = test_server();
    let resp = server.post("/speak").json(&serde_json::json!({"text": "good dog!"})).await;
    resp.assert_status_ok();
    Ok(())
}

#[tokio::test]
async fn video_feed_streams_multipart_mjpeg() -> anyhow::Result<()> {
    let server = test_server();
    let resp = server.get("/video_feed").await;
    resp.assert_status_ok();
    let ct_header = resp.header("content-type");
    let ct = ct_header.to_str().unwrap_or("");
    assert_eq!(ct, "multipart/x-mixed-replace; boundary=frame");
    Ok(())
}
