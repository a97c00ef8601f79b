// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport for the control plane.

pub mod http;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the axum `Router` with every documented route.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_allowlist());

    Router::new()
        .route("/health", get(http::health))
        .route("/video_feed", get(http::video_feed))
        .route("/command", post(http::command))
        .route("/status/{id}", get(http::status))
        .route("/dispense_treat", post(http::dispense_treat))
        .route("/speak", post(http::speak))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Permissive when no allowlist is configured, matching the reference
/// service's default of running behind a trusted LAN.
fn cors_layer(allowlist: &[String]) -> CorsLayer {
    if allowlist.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> =
        allowlist.iter().filter_map(|o| HeaderValue::from_str(o).ok()).collect();
    CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(tower_http::cors::Any)
}
