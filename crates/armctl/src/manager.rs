// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The command manager: single-active-command admission, preemption, safety
//! gating, and dispatch across the arm driver, policy producer, and request
//! store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::arm::ArmDriver;
use crate::error::ControlPlaneError;
use crate::model::{Prompt, RequestId, State, Status, StatusPatch};
use crate::producer::producer_for;
use crate::safety::SafetyGate;
use crate::store::RequestStore;

/// Handles to the components a worker needs. Constructed once at startup and
/// shared by reference into every worker — no global singletons.
pub struct Services {
    pub arm: Arc<dyn ArmDriver>,
    pub safety: Arc<SafetyGate>,
    pub store: Arc<RequestStore>,
    pub rate_period: Duration,
    pub model_mode: String,
}

/// Orchestrates the single-active lifecycle described in SPEC_FULL.md §4.G.
pub struct CommandManager {
    services: Arc<Services>,
    active: Arc<Mutex<Option<RequestId>>>,
    cancel: Arc<AtomicBool>,
}

impl CommandManager {
    pub fn new(services: Services) -> Self {
        Self {
            services: Arc::new(services),
            active: Arc::new(Mutex::new(None)),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Admit a non-"go home" prompt, or fail with `Busy` if a command is
    /// already active.
    pub async fn start(&self, prompt: Prompt) -> Result<RequestId, ControlPlaneError> {
        if prompt.is_go_home() {
            return Err(ControlPlaneError::InvalidInput(
                "\"go home\" must be admitted via interrupt_and_home".to_owned(),
            ));
        }

        let id = {
            let mut active = self.active.lock().await;
            if active.is_some() {
                return Err(ControlPlaneError::Busy);
            }
            let id = RequestId::new();
            *active = Some(id.clone());
            self.cancel.store(false, Ordering::Relaxed);
            id
        };

        self.services
            .store
            .create(id.clone(), Status::new(State::Planning, format!("Accepted: {}", prompt.as_str())))
            .await;

        let services = Arc::clone(&self.services);
        let active = Arc::clone(&self.active);
        let cancel = Arc::clone(&self.cancel);
        let worker_id = id.clone();

        tokio::spawn(async move {
            run_worker(&services, &cancel, &worker_id, prompt).await;
            // Only release the slot if it's still ours: a preemption may have
            // already let a newer command claim it by the time we get here.
            let mut guard = active.lock().await;
            if guard.as_ref() == Some(&worker_id) {
                *guard = None;
            }
        });

        Ok(id)
    }

    /// Always admitted. Signals cancellation to any active worker and runs a
    /// short homing task, idempotent and preferred over per-request cancel.
    ///
    /// Never touches the active slot or the cancel flag once its own homing
    /// completes — it doesn't own either. The worker it preempted clears its
    /// own slot on exit, and the next `start()` resets `cancel` atomically at
    /// admission; either path here would risk clobbering a newer command's
    /// occupancy or swallowing a cancellation meant for it.
    pub async fn interrupt_and_home(&self) -> RequestId {
        self.cancel.store(true, Ordering::Relaxed);

        let id = RequestId::new();
        self.services.store.create(id.clone(), Status::new(State::Executing, "Go home")).await;

        let services = Arc::clone(&self.services);
        let home_id = id.clone();

        tokio::spawn(async move {
            let patch = match services.arm.home().await {
                Ok(()) => StatusPatch::default().state(State::Succeeded).message("At home pose"),
                Err(e) => {
                    StatusPatch::default().state(State::Failed).message(format!("home error: {e}"))
                }
            };
            services.store.update(&home_id, patch).await;
        });

        id
    }

    /// Look up a request's current `Status`, if it was ever admitted.
    pub async fn status_of(&self, id: &RequestId) -> Option<Status> {
        self.services.store.get(id).await
    }
}

/// Linear reducer from policy chunks to a terminal `Status`. Cleanup of the
/// active slot and cancel flag happens in the caller, after this returns.
async fn run_worker(services: &Services, cancel: &AtomicBool, id: &RequestId, prompt: Prompt) {
    let t0 = Instant::now();

    services
        .store
        .update(id, StatusPatch::default().state(State::Executing).phase("detect").message("Detecting"))
        .await;

    let mut producer = producer_for(&services.model_mode, prompt);

    loop {
        if cancel.load(Ordering::Relaxed) {
            if let Err(e) = services.arm.home().await {
                tracing::warn!(request_id = %id, err = %e, "home failed during preemption");
            }
            services
                .store
                .update(id, StatusPatch::default().state(State::Aborted).message("Interrupted by Go Home"))
                .await;
            return;
        }

        let Some(chunk) = producer.next_chunk() else { break };

        if !services.safety.validate_targets(&chunk) {
            services
                .store
                .update(id, StatusPatch::default().state(State::Failed).message("safety check failed"))
                .await;
            return;
        }

        if let Err(e) = services.arm.send_targets(&chunk).await {
            services.store.update(id, StatusPatch::default().state(State::Failed).message(e.to_string())).await;
            return;
        }

        services
            .store
            .update(
                id,
                StatusPatch::default()
                    .phase(chunk.phase.clone())
                    .confidence(chunk.confidence)
                    .message(chunk.phase.clone()),
            )
            .await;

        tokio::time::sleep(services.rate_period).await;
    }

    if matches!(prompt, Prompt::PickUpTheBall) {
        let joints = services.arm.get_joint_angles().await;
        if services.safety.ready_to_throw(joints) && services.safety.workspace_clear() {
            services
                .store
                .update(id, StatusPatch::default().state(State::HandoffMacro).message("throwing"))
                .await;
            if let Err(e) = services.arm.throw_macro().await {
                services
                    .store
                    .update(id, StatusPatch::default().state(State::Failed).message(e.to_string()))
                    .await;
                return;
            }
        }
    }

    let duration_ms = t0.elapsed().as_millis() as i64;
    services
        .store
        .update(
            id,
            StatusPatch::default().state(State::Succeeded).message("Completed").duration_ms(duration_ms),
        )
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arm::MockArmDriver;
    use crate::model::JointLimits;

    fn test_manager() -> CommandManager {
        CommandManager::new(Services {
            arm: Arc::new(MockArmDriver::new()),
            safety: Arc::new(SafetyGate::with_limits(JointLimits::default())),
            store: Arc::new(RequestStore::new()),
            rate_period: Duration::from_millis(1),
            model_mode: "scripted".to_owned(),
        })
    }

    async fn wait_for_terminal(manager: &CommandManager, id: &RequestId) -> Status {
        for _ in 0..200 {
            if let Some(status) = manager.services.store.get(id).await {
                if status.state.is_terminal() {
                    return status;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("request {id} never reached a terminal state");
    }

    #[tokio::test]
    async fn happy_path_reaches_succeeded_with_duration() {
        let manager = test_manager();
        let id = manager.start(Prompt::GetTheTreat).await.unwrap();
        let status = wait_for_terminal(&manager, &id).await;
        assert_eq!(status.state, State::Succeeded);
        assert!(status.duration_ms.unwrap_or(0) >= 0);
    }

    #[tokio::test]
    async fn pick_up_the_ball_passes_through_handoff_macro() {
        let manager = test_manager();
        let id = manager.start(Prompt::PickUpTheBall).await.unwrap();
        let status = wait_for_terminal(&manager, &id).await;
        assert_eq!(status.state, State::Succeeded);
    }

    #[tokio::test]
    async fn second_admission_while_busy_is_rejected() {
        let manager = test_manager();
        let _id = manager.start(Prompt::PickUpTheBall).await.unwrap();
        let err = manager.start(Prompt::GetTheTreat).await.unwrap_err();
        assert!(matches!(err, ControlPlaneError::Busy));
    }

    #[tokio::test]
    async fn go_home_preempts_the_active_worker() {
        let manager = CommandManager::new(Services {
            arm: Arc::new(MockArmDriver::new()),
            safety: Arc::new(SafetyGate::with_limits(JointLimits::default())),
            store: Arc::new(RequestStore::new()),
            rate_period: Duration::from_millis(50),
            model_mode: "scripted".to_owned(),
        });

        let r1 = manager.start(Prompt::PickUpTheBall).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let r2 = manager.interrupt_and_home().await;

        let s1 = wait_for_terminal(&manager, &r1).await;
        let s2 = wait_for_terminal(&manager, &r2).await;

        assert_eq!(s1.state, State::Aborted);
        assert_eq!(s1.message, "Interrupted by Go Home");
        assert_eq!(s2.state, State::Succeeded);
        assert_eq!(s2.message, "At home pose");
    }

    #[tokio::test]
    async fn double_go_home_both_reach_terminal() {
        let manager = test_manager();
        let r1 = manager.interrupt_and_home().await;
        let r2 = manager.interrupt_and_home().await;
        assert_ne!(r1, r2);
        let s1 = wait_for_terminal(&manager, &r1).await;
        let s2 = wait_for_terminal(&manager, &r2).await;
        assert_eq!(s1.state, State::Succeeded);
        assert_eq!(s2.state, State::Succeeded);
        assert_eq!(manager.services.arm.get_joint_angles().await, [0.0; 6]);
    }

    #[tokio::test]
    async fn after_preemption_a_new_command_can_be_admitted() {
        let manager = test_manager();
        let r1 = manager.start(Prompt::PickUpTheBall).await.unwrap();
        manager.interrupt_and_home().await;
        wait_for_terminal(&manager, &r1).await;

        // The active slot clears shortly after the aborted worker's Status
        // becomes terminal (the bounded preemption window of SPEC_FULL.md
        // §3 invariant 1) — retry admission across that window.
        let mut result = manager.start(Prompt::GetTheTreat).await;
        for _ in 0..50 {
            if result.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
            result = manager.start(Prompt::GetTheTreat).await;
        }
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn null_producer_reaches_succeeded_with_zero_chunks() {
        let manager = CommandManager::new(Services {
            arm: Arc::new(MockArmDriver::new()),
            safety: Arc::new(SafetyGate::with_limits(JointLimits::default())),
            store: Arc::new(RequestStore::new()),
            rate_period: Duration::from_millis(1),
            model_mode: "null".to_owned(),
        });
        let id = manager.start(Prompt::GetTheTreat).await.unwrap();
        let status = wait_for_terminal(&manager, &id).await;
        assert_eq!(status.state, State::Succeeded);
    }
}
