// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Core data types shared by the command plane: requests, status snapshots,
//! control chunks, and joint limits.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Opaque, globally unique handle for an admitted command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed, whitelisted set of prompts the command plane accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    PickUpTheBall,
    GetTheTreat,
    GoHome,
}

impl Prompt {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pick up the ball" => Some(Self::PickUpTheBall),
            "get the treat" => Some(Self::GetTheTreat),
            "go home" => Some(Self::GoHome),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PickUpTheBall => "pick up the ball",
            Self::GetTheTreat => "get the treat",
            Self::GoHome => "go home",
        }
    }

    pub fn is_go_home(&self) -> bool {
        matches!(self, Self::GoHome)
    }
}

/// Lifecycle state of an admitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    Queued,
    Planning,
    Executing,
    HandoffMacro,
    Succeeded,
    Failed,
    Aborted,
}

impl State {
    /// Terminal states are `succeeded`, `failed`, `aborted` — once reached,
    /// the owning `Status` is immutable (spec invariant).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Aborted)
    }
}

/// Mutable record tracked by the request store, keyed by `RequestId`.
///
/// Once `state` is terminal, `merge` refuses further writes — the
/// monotonicity invariant lives on the type rather than at call sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    pub state: State,
    pub phase: Option<String>,
    pub confidence: Option<f64>,
    pub message: String,
    pub duration_ms: Option<i64>,
}

impl Status {
    pub fn new(state: State, message: impl Into<String>) -> Self {
        Self { state, phase: None, confidence: None, message: message.into(), duration_ms: None }
    }

    /// The documented quirk for an unknown request id (spec.md §4.H / §8).
    pub fn unknown() -> Self {
        Self {
            state: State::Failed,
            phase: None,
            confidence: None,
            message: "unknown request_id".to_owned(),
            duration_ms: None,
        }
    }

    /// Apply a field-wise patch. No-op if the current state is already
    /// terminal, preventing a terminal→non-terminal regression.
    pub fn merge(&mut self, patch: StatusPatch) {
        if self.state.is_terminal() {
            return;
        }
        if let Some(state) = patch.state {
            self.state = state;
        }
        if let Some(phase) = patch.phase {
            self.phase = phase;
        }
        if let Some(confidence) = patch.confidence {
            self.confidence = confidence;
        }
        if let Some(message) = patch.message {
            self.message = message;
        }
        if let Some(duration_ms) = patch.duration_ms {
            self.duration_ms = Some(duration_ms);
        }
    }
}

/// A field-wise patch applied to a `Status` under the store's lock.
#[derive(Debug, Clone, Default)]
pub struct StatusPatch {
    pub state: Option<State>,
    pub phase: Option<Option<String>>,
    pub confidence: Option<Option<f64>>,
    pub message: Option<String>,
    pub duration_ms: Option<i64>,
}

impl StatusPatch {
    pub fn state(mut self, state: State) -> Self {
        self.state = Some(state);
        self
    }

    pub fn phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(Some(phase.into()));
        self
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(Some(confidence));
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn duration_ms(mut self, duration_ms: i64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

/// One step of a policy's output: a phase label, six joint targets (radians),
/// and a confidence. Lives only on the worker's stack — never persisted.
#[derive(Debug, Clone)]
pub struct ControlChunk {
    pub phase: String,
    pub targets: [f64; 6],
    pub confidence: f64,
}

/// Calibrated joint limits, loaded once at startup.
#[derive(Debug, Clone)]
pub struct JointLimits {
    pub min: [f64; 6],
    pub max: [f64; 6],
}

/// Conservative defaults used when no calibration file is supplied, matching
/// the original safety manager's placeholder bounds.
pub const DEFAULT_JOINT_MIN: f64 = -2.5;
pub const DEFAULT_JOINT_MAX: f64 = 2.5;

impl Default for JointLimits {
    fn default() -> Self {
        Self { min: [DEFAULT_JOINT_MIN; 6], max: [DEFAULT_JOINT_MAX; 6] }
    }
}

/// On-disk calibration file shape: `{"joint_min": [..6], "joint_max": [..6], "roi": {...}?}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CalibrationFile {
    pub joint_min: Option<[f64; 6]>,
    pub joint_max: Option<[f64; 6]>,
    #[serde(default)]
    pub roi: serde_json::Value,
}

impl CalibrationFile {
    /// Load and parse a calibration file. Returns `None` (and logs a warning)
    /// on a missing path, a missing file, or a parse failure — the caller
    /// falls back to `JointLimits::default()` in every such case.
    pub fn load(path: Option<&Path>) -> Option<Self> {
        let path = path?;
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %path.display(), err = %e, "failed to read calibration file");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(cal) => Some(cal),
            Err(e) => {
                tracing::warn!(path = %path.display(), err = %e, "failed to parse calibration file");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_parses_whitelist_only() {
        assert_eq!(Prompt::parse("pick up the ball"), Some(Prompt::PickUpTheBall));
        assert_eq!(Prompt::parse("get the treat"), Some(Prompt::GetTheTreat));
        assert_eq!(Prompt::parse("go home"), Some(Prompt::GoHome));
        assert_eq!(Prompt::parse("dance"), None);
    }

    #[test]
    fn merge_ignores_writes_after_terminal() {
        let mut status = Status::new(State::Executing, "working");
        status.merge(StatusPatch::default().state(State::Succeeded).message("done"));
        assert_eq!(status.state, State::Succeeded);

        status.merge(StatusPatch::default().state(State::Failed).message("too late"));
        assert_eq!(status.state, State::Succeeded);
        assert_eq!(status.message, "done");
    }

    #[test]
    fn merge_leaves_absent_fields_untouched() {
        let mut status = Status::new(State::Executing, "working");
        status.merge(StatusPatch::default().phase("grasp"));
        assert_eq!(status.phase.as_deref(), Some("grasp"));
        assert_eq!(status.state, State::Executing);
    }
}
