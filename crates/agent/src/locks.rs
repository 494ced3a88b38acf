//! Per-profile write serialization.
//!
//! Summary refreshes are read-modify-write sequences spanning a model call.
//! Two concurrent requests for the same student would otherwise both read
//! the old state and the later write would silently drop the earlier one.
//! Holders of a profile's guard run those sequences one at a time; requests
//! for different students never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use padhai_core::profile::StudentId;
use tokio::sync::OwnedMutexGuard;

#[derive(Clone, Default)]
pub struct ProfileLocks {
    inner: Arc<Mutex<HashMap<StudentId, Arc<tokio::sync::Mutex<()>>>>>,
}

impl ProfileLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`'s mutable fields.
    pub async fn lock(&self, id: &StudentId) -> OwnedMutexGuard<()> {
        let slot = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            // Drop slots nobody holds or waits on.
            map.retain(|_, m| Arc::strong_count(m) > 1);
            map.entry(id.clone()).or_default().clone()
        };
        slot.lock_owned().await
    }

    /// Number of profiles with a live slot.
    pub fn active(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
