//! In-memory backend — useful for testing and ephemeral runs.

use async_trait::async_trait;
use chrono::Utc;
use padhai_core::error::StoreError;
use padhai_core::profile::{Interaction, StudentId, StudentProfile, SummaryField};
use padhai_core::store::ProfileStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Profiles kept in a map behind a lock. Nothing survives a restart.
pub struct InMemoryStore {
    profiles: Arc<RwLock<HashMap<StudentId, StudentProfile>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn insert(&self, profile: StudentProfile) -> Result<StudentId, StoreError> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&profile.id) {
            return Err(StoreError::Duplicate(profile.id.to_string()));
        }
        let id = profile.id.clone();
        profiles.insert(id.clone(), profile);
        Ok(id)
    }

    async fn get(&self, id: &StudentId) -> Result<Option<StudentProfile>, StoreError> {
        Ok(self.profiles.read().await.get(id).cloned())
    }

    async fn set_summary(
        &self,
        id: &StudentId,
        field: SummaryField,
        text: &str,
    ) -> Result<bool, StoreError> {
        let mut profiles = self.profiles.write().await;
        match profiles.get_mut(id) {
            Some(profile) => {
                profile.set_summary(field, text);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn append_interaction(
        &self,
        id: &StudentId,
        interaction: Interaction,
    ) -> Result<bool, StoreError> {
        let mut profiles = self.profiles.write().await;
        match profiles.get_mut(id) {
            Some(profile) => {
                profile.interactions.push(interaction);
                profile.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.profiles.read().await.len())
    }
}
