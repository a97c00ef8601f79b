// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thread-safe in-memory map of request id to status.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::model::{RequestId, Status, StatusPatch};

/// Owns `Status` records for the process lifetime. Entries are never
/// garbage-collected here (SPEC_FULL.md §9 Open Questions — an optional TTL
/// is a deployment choice, not modelled in this crate).
#[derive(Default)]
pub struct RequestStore {
    entries: RwLock<HashMap<RequestId, Status>>,
}

impl RequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new `Status`. Overwrites any prior entry for `id` — callers
    /// only ever create with a freshly minted `RequestId`.
    pub async fn create(&self, id: RequestId, initial: Status) {
        self.entries.write().await.insert(id, initial);
    }

    /// Apply a field-wise merge under the store's lock. Silently ignored if
    /// `id` is absent; the terminal-state guard lives in `Status::merge`.
    pub async fn update(&self, id: &RequestId, patch: StatusPatch) {
        if let Some(status) = self.entries.write().await.get_mut(id) {
            status.merge(patch);
        }
    }

    /// Return a deep-copy snapshot; the caller cannot mutate the live record.
    pub async fn get(&self, id: &RequestId) -> Option<Status> {
        self.entries.read().await.get(id).cloned()
    }
}
