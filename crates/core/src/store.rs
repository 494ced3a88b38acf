//! ProfileStore trait — persistence for student profiles.
//!
//! Mirrors the document-store operations the service needs: find by id,
//! insert, field-level set, and an atomic append to the interaction log.
//! Implementations: SQLite and in-memory (for tests and ephemeral runs).

use crate::error::StoreError;
use crate::profile::{Interaction, StudentId, StudentProfile, SummaryField};
use async_trait::async_trait;

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// The backend name (e.g., "sqlite", "in_memory").
    fn name(&self) -> &str;

    /// Insert a new profile. Fails with `StoreError::Duplicate` if the id exists.
    async fn insert(&self, profile: StudentProfile) -> std::result::Result<StudentId, StoreError>;

    /// Get a profile by id, including its interaction log.
    async fn get(&self, id: &StudentId)
    -> std::result::Result<Option<StudentProfile>, StoreError>;

    /// Overwrite one summary field. Returns `false` if no profile matched.
    async fn set_summary(
        &self,
        id: &StudentId,
        field: SummaryField,
        text: &str,
    ) -> std::result::Result<bool, StoreError>;

    /// Append one interaction. Returns `false` if no profile matched.
    async fn append_interaction(
        &self,
        id: &StudentId,
        interaction: Interaction,
    ) -> std::result::Result<bool, StoreError>;

    /// Total number of stored profiles.
    async fn count(&self) -> std::result::Result<usize, StoreError>;
}
