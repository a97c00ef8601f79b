// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The follower arm driver seam: connect, stream targets, home, stop, throw.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::ControlPlaneError;
use crate::model::ControlChunk;

/// Abstracts a 6-joint follower arm.
///
/// Any method may fail with `ControlPlaneError::HardwareError`; the command
/// manager treats a single failure as fatal for the active request.
#[async_trait]
pub trait ArmDriver: Send + Sync {
    /// Idempotent. Returns true if subsequent operations will be accepted.
    async fn connect(&self) -> Result<bool, ControlPlaneError>;

    /// Advances the commanded pose toward `chunk.targets`.
    async fn send_targets(&self, chunk: &ControlChunk) -> Result<(), ControlPlaneError>;

    /// Blocks (conceptually) until the arm reaches the canonical home pose.
    async fn home(&self) -> Result<(), ControlPlaneError>;

    /// Releases the underlying device, best-effort.
    async fn stop(&self) -> Result<(), ControlPlaneError>;

    /// Executes a short, open-loop handoff waypoint sequence.
    async fn throw_macro(&self) -> Result<(), ControlPlaneError>;

    /// Returns the last commanded pose.
    async fn get_joint_angles(&self) -> [f64; 6];
}

/// In-memory follower arm used in mock mode and by tests.
pub struct MockArmDriver {
    joints: Mutex<[f64; 6]>,
}

impl MockArmDriver {
    pub fn new() -> Self {
        Self { joints: Mutex::new([0.0; 6]) }
    }
}

impl Default for MockArmDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArmDriver for MockArmDriver {
    async fn connect(&self) -> Result<bool, ControlPlaneError> {
        Ok(true)
    }

    async fn send_targets(&self, chunk: &ControlChunk) -> Result<(), ControlPlaneError> {
        *self.joints.lock().await = chunk.targets;
        // One bounded control-period delay, matching the real driver's
        // streaming cadence.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        Ok(())
    }

    async fn home(&self) -> Result<(), ControlPlaneError> {
        *self.joints.lock().await = [0.0; 6];
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        Ok(())
    }

    async fn stop(&self) -> Result<(), ControlPlaneError> {
        Ok(())
    }

    async fn throw_macro(&self) -> Result<(), ControlPlaneError> {
        {
            let mut joints = self.joints.lock().await;
            joints[1] -= 0.5;
            joints[2] += 1.0;
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        Ok(())
    }

    async fn get_joint_angles(&self) -> [f64; 6] {
        *self.joints.lock().await
    }
}

/// Real serial-connected follower arm. Out of scope for this crate's
/// behavior (spec.md §1 treats hardware driver internals as external); kept
/// behind a cargo feature as the documented extension point, the way the
/// teacher gates its legacy auth code paths behind a feature rather than
/// deleting them.
#[cfg(feature = "hardware")]
pub struct SerialArmDriver {
    port: String,
}

#[cfg(feature = "hardware")]
impl SerialArmDriver {
    pub fn new(port: impl Into<String>) -> Self {
        Self { port: port.into() }
    }
}

#[cfg(feature = "hardware")]
#[async_trait]
impl ArmDriver for SerialArmDriver {
    async fn connect(&self) -> Result<bool, ControlPlaneError> {
        Err(ControlPlaneError::HardwareError(format!(
            "serial arm driver not implemented (port={})",
            self.port
        )))
    }

    async fn send_targets(&self, _chunk: &ControlChunk) -> Result<(), ControlPlaneError> {
        Err(ControlPlaneError::HardwareError("serial arm driver not implemented".to_owned()))
    }

    async fn home(&self) -> Result<(), ControlPlaneError> {
        Err(ControlPlaneError::HardwareError("serial arm driver not implemented".to_owned()))
    }

    async fn stop(&self) -> Result<(), ControlPlaneError> {
        Err(ControlPlaneError::HardwareError("serial arm driver not implemented".to_owned()))
    }

    async fn throw_macro(&self) -> Result<(), ControlPlaneError> {
        Err(ControlPlaneError::HardwareError("serial arm driver not implemented".to_owned()))
    }

    async fn get_joint_angles(&self) -> [f64; 6] {
        [0.0; 6]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_arm_tracks_last_commanded_pose() {
        let arm = MockArmDriver::new();
        let chunk = ControlChunk { phase: "grasp".into(), targets: [0.1; 6], confidence: 0.9 };
        arm.send_targets(&chunk).await.unwrap();
        assert_eq!(arm.get_joint_angles().await, [0.1; 6]);
    }

    #[tokio::test]
    async fn mock_arm_home_resets_joints() {
        let arm = MockArmDriver::new();
        let chunk = ControlChunk { phase: "grasp".into(), targets: [1.0; 6], confidence: 0.9 };
        arm.send_targets(&chunk).await.unwrap();
        arm.home().await.unwrap();
        assert_eq!(arm.get_joint_angles().await, [0.0; 6]);
    }
}
