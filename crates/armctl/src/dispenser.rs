// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot treat dispenser actuation.

use async_trait::async_trait;

use crate::error::ControlPlaneError;

#[async_trait]
pub trait TreatDispenser: Send + Sync {
    /// Blocks for `max(0, duration_ms)` then returns.
    async fn dispense(&self, duration_ms: i32) -> Result<(), ControlPlaneError>;
}

pub struct MockTreatDispenser;

#[async_trait]
impl TreatDispenser for MockTreatDispenser {
    async fn dispense(&self, duration_ms: i32) -> Result<(), ControlPlaneError> {
        let clamped = duration_ms.max(0) as u64;
        tokio::time::sleep(std::time::Duration::from_millis(clamped)).await;
        Ok(())
    }
}
