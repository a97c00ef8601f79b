// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for the control plane.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ControlPlaneError;
use crate::model::{Prompt, RequestId, Status};
use crate::speaker::validate_utterance;
use crate::state::AppState;
use crate::video::{mjpeg_stream, MockFrameSource};

// -- Request/Response types --------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub api: u32,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct VideoFeedQuery {
    #[serde(default)]
    pub overlays: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub prompt: String,
    #[serde(default)]
    pub options: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub request_id: String,
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct DispenseTreatRequest {
    pub duration_ms: i32,
}

#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub status: &'static str,
}

const OK: OkResponse = OkResponse { status: "ok" };

// -- Handlers -----------------------------------------------------------------

/// `GET /health` — always 200, never touches any shared state.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok", api: 1, version: env!("CARGO_PKG_VERSION") })
}

/// `GET /video_feed?overlays=0|1` — unending MJPEG multipart stream.
pub async fn video_feed(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VideoFeedQuery>,
) -> impl IntoResponse {
    let overlays = query.overlays.unwrap_or(1) != 0;
    let rate_period = state.config.rate_period();
    let stream = mjpeg_stream(Box::new(MockFrameSource::new()), overlays, rate_period);
    let body = Body::from_stream(stream);

    ([(header::CONTENT_TYPE, "multipart/x-mixed-replace; boundary=frame")], body)
}

/// `POST /command` `{prompt, options?}` — 202 on admission.
///
/// `"go home"` is always admitted and preempts any active command; it never
/// competes for the active slot the way other prompts do.
pub async fn command(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CommandRequest>,
) -> Result<impl IntoResponse, ControlPlaneError> {
    let prompt = Prompt::parse(&req.prompt)
        .ok_or_else(|| ControlPlaneError::InvalidInput(format!("unknown prompt: {}", req.prompt)))?;

    let request_id = if prompt.is_go_home() {
        state.manager.interrupt_and_home().await
    } else {
        state.manager.start(prompt).await?
    };

    Ok((
        StatusCode::ACCEPTED,
        Json(CommandResponse { request_id: request_id.to_string(), status: "accepted" }),
    ))
}

/// `GET /status/{id}` — 200 always, with a synthetic failure body for an id
/// that was never issued (documented client-compatibility quirk).
pub async fn status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let request_id = RequestId(id);
    let status: Status = state.manager.status_of(&request_id).await.unwrap_or_else(Status::unknown);
    Json(status)
}

/// `POST /dispense_treat` `{duration_ms}` — negative durations are a no-op.
pub async fn dispense_treat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DispenseTreatRequest>,
) -> Result<impl IntoResponse, ControlPlaneError> {
    state.dispenser.dispense(req.duration_ms).await?;
    Ok(Json(OK))
}

/// `POST /speak` `{text}` — empty text is rejected at the boundary.
pub async fn speak(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeakRequest>,
) -> Result<impl IntoResponse, ControlPlaneError> {
    validate_utterance(&req.text)?;
    state.speaker.speak(&req.text).await?;
    Ok(Json(OK))
}
