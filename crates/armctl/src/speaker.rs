// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Short text-to-speech utterances.

use async_trait::async_trait;

use crate::error::ControlPlaneError;

/// Maximum length, in bytes, of an utterance accepted at the HTTP boundary.
pub const MAX_UTTERANCE_LEN: usize = 500;

#[async_trait]
pub trait Speaker: Send + Sync {
    /// Hands `text` to the synthesis backend. Does not block until audio ends.
    async fn speak(&self, text: &str) -> Result<(), ControlPlaneError>;
}

pub struct MockSpeaker;

#[async_trait]
impl Speaker for MockSpeaker {
    async fn speak(&self, text: &str) -> Result<(), ControlPlaneError> {
        tracing::info!(text = %text, "speaking");
        Ok(())
    }
}

/// Validate an utterance at the boundary: non-empty and within the bound.
pub fn validate_utterance(text: &str) -> Result<(), ControlPlaneError> {
    if text.is_empty() {
        return Err(ControlPlaneError::InvalidInput("text must not be empty".to_owned()));
    }
    if text.len() > MAX_UTTERANCE_LEN {
        return Err(ControlPlaneError::InvalidInput(format!(
            "text exceeds {MAX_UTTERANCE_LEN} bytes"
        )));
    }
    Ok(())
}
