// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! armctl: a bounded, preemptible, single-active-command HTTP control plane
//! for a 6-DOF follower arm driven by natural-language prompts.

pub mod arm;
pub mod config;
pub mod dispenser;
pub mod error;
pub mod manager;
pub mod model;
pub mod producer;
pub mod safety;
pub mod speaker;
pub mod state;
pub mod store;
pub mod transport;
pub mod video;

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::transport::build_router;

/// Run the control plane until the listener is closed.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config));

    tracing::info!(%addr, "armctl listening");
    let router = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
