// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Joint-limit validation and pre-throw posture checks.

use std::path::Path;

use crate::model::{CalibrationFile, ControlChunk, JointLimits};

/// Validates control chunks against calibrated joint limits and answers
/// workspace/handoff-readiness queries.
pub struct SafetyGate {
    limits: JointLimits,
    workspace_clear: bool,
}

impl SafetyGate {
    /// Load calibration from `path` if present, falling back to conservative
    /// defaults (`±2.5 rad`) on a missing path, missing file, or parse error.
    pub fn load(path: Option<&Path>) -> Self {
        let limits = match CalibrationFile::load(path) {
            Some(cal) => JointLimits {
                min: cal.joint_min.unwrap_or([crate::model::DEFAULT_JOINT_MIN; 6]),
                max: cal.joint_max.unwrap_or([crate::model::DEFAULT_JOINT_MAX; 6]),
            },
            None => JointLimits::default(),
        };
        Self { limits, workspace_clear: true }
    }

    pub fn with_limits(limits: JointLimits) -> Self {
        Self { limits, workspace_clear: true }
    }

    /// True iff every target lies within `[joint_min[i], joint_max[i]]`.
    pub fn validate_targets(&self, chunk: &ControlChunk) -> bool {
        chunk
            .targets
            .iter()
            .zip(self.limits.min.iter())
            .zip(self.limits.max.iter())
            .all(|((&target, &min), &max)| target >= min && target <= max)
    }

    /// Domain check on a canonical pre-throw posture: third joint near zero.
    pub fn ready_to_throw(&self, joints: [f64; 6]) -> bool {
        joints[2].abs() < 0.25
    }

    /// Stub that would consult an external ROI; returns a configured constant.
    pub fn workspace_clear(&self) -> bool {
        self.workspace_clear
    }
}
