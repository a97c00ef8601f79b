// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared application state handed to every HTTP handler.

use std::sync::Arc;

use crate::arm::{ArmDriver, MockArmDriver};
use crate::config::AppConfig;
use crate::dispenser::{MockTreatDispenser, TreatDispenser};
use crate::manager::{CommandManager, Services};
use crate::safety::SafetyGate;
use crate::speaker::{MockSpeaker, Speaker};
use crate::store::RequestStore;

#[cfg(feature = "hardware")]
use crate::arm::SerialArmDriver;

/// Process-wide shared state: the command manager plus the standalone
/// hardware collaborators (`/dispense_treat`, `/speak`) it does not own.
pub struct AppState {
    pub config: AppConfig,
    pub manager: CommandManager,
    pub dispenser: Arc<dyn TreatDispenser>,
    pub speaker: Arc<dyn Speaker>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let arm: Arc<dyn ArmDriver> = if config.use_hardware {
            #[cfg(feature = "hardware")]
            {
                Arc::new(SerialArmDriver::new(""))
            }
            #[cfg(not(feature = "hardware"))]
            {
                tracing::warn!(
                    "USE_HARDWARE=true but the \"hardware\" feature is not compiled in; using mock arm"
                );
                Arc::new(MockArmDriver::new())
            }
        } else {
            Arc::new(MockArmDriver::new())
        };

        let safety = Arc::new(SafetyGate::load(config.calibration_path.as_deref()));
        let store = Arc::new(RequestStore::new());
        let rate_period = config.rate_period();
        let model_mode = config.model_mode.clone();

        let manager = CommandManager::new(Services { arm, safety, store, rate_period, model_mode });

        Self { config, manager, dispenser: Arc::new(MockTreatDispenser), speaker: Arc::new(MockSpeaker) }
    }
}
