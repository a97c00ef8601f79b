// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The policy producer seam: a finite, non-restartable, pull-based sequence
//! of control chunks for a given prompt.

use crate::model::{ControlChunk, Prompt};

/// A lazy, pull-based sequence of control chunks for one admitted prompt.
///
/// Cancellation is cooperative: the consumer may drop the producer between
/// two `next` calls, and the producer must release any resources it holds at
/// that point (for `ScriptedProducer` this is a no-op — it holds none).
pub trait PolicyProducer: Send {
    fn next_chunk(&mut self) -> Option<ControlChunk>;
}

/// Deterministic, scripted phase sequences. Authoritative for tests;
/// grounded in the reference policy's scripted demo phases.
pub struct ScriptedProducer {
    phases: std::vec::IntoIter<(&'static str, [f64; 6], f64)>,
}

impl ScriptedProducer {
    pub fn new(prompt: Prompt) -> Self {
        let phases: Vec<(&'static str, [f64; 6], f64)> = match prompt {
            Prompt::GetTheTreat => vec![
                ("detect", [0.1, 0.1, 0.0, 0.0, 0.0, 0.0], 0.70),
                ("approach", [0.2, 0.1, 0.0, 0.1, 0.0, 0.0], 0.75),
                ("grasp", [0.3, 0.1, 0.0, 0.1, 0.0, 0.0], 0.80),
                ("lift", [0.2, 0.2, 0.0, 0.1, 0.0, 0.0], 0.82),
                ("drop", [0.1, 0.2, 0.0, 0.1, 0.0, 0.0], 0.84),
            ],
            // Both "pick up the ball" and "go home" (the latter never reaches
            // the producer — it bypasses admission) fall through to the
            // default phase list, matching the reference policy.
            Prompt::PickUpTheBall | Prompt::GoHome => vec![
                ("detect", [0.0, 0.1, 0.0, 0.0, 0.0, 0.0], 0.70),
                ("approach", [0.1, 0.2, 0.0, 0.0, 0.0, 0.0], 0.75),
                ("grasp", [0.2, 0.3, 0.0, 0.1, 0.0, 0.0], 0.80),
                ("lift", [0.2, 0.2, 0.1, 0.1, 0.0, 0.0], 0.82),
                ("ready_to_throw", [0.2, 0.2, 0.2, 0.1, 0.0, 0.0], 0.85),
            ],
        };
        Self { phases: phases.into_iter() }
    }
}

impl PolicyProducer for ScriptedProducer {
    fn next_chunk(&mut self) -> Option<ControlChunk> {
        self.phases.next().map(|(phase, targets, confidence)| ControlChunk {
            phase: phase.to_owned(),
            targets,
            confidence,
        })
    }
}

/// Producer that yields zero chunks. Exercises the "empty stream" edge case:
/// the worker still attempts the post-stream handoff guard before succeeding.
pub struct NullProducer;

impl PolicyProducer for NullProducer {
    fn next_chunk(&mut self) -> Option<ControlChunk> {
        None
    }
}

/// Resolve the configured `MODEL_MODE` to a producer for `prompt`. `"null"`
/// selects `NullProducer`, exercising the zero-chunk edge case end-to-end
/// through the worker's handoff guard; any other mode besides `"scripted"`
/// (the model-driven family is out of scope, see SPEC_FULL.md §4.E) currently
/// also resolves to `ScriptedProducer`.
pub fn producer_for(model_mode: &str, prompt: Prompt) -> Box<dyn PolicyProducer> {
    match model_mode {
        "null" => Box::new(NullProducer),
        _ => Box::new(ScriptedProducer::new(prompt)),
    }
}
