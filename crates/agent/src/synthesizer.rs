//! Summary synthesizer — rewrites the basic and tracking summaries.
//!
//! Every refresh replaces the whole field with fresh model output. Older
//! detail survives only if the model carries it forward, so the summaries
//! are lossy by construction.
//!
//! The `refresh_*` methods read then write a profile. Callers that may race
//! on the same student hold its [`ProfileLocks`](crate::locks::ProfileLocks)
//! guard around the call.

use padhai_core::label::AgentLabel;
use padhai_core::profile::{StudentId, SummaryField};
use tracing::debug;

use crate::chat::AgentDeps;
use crate::prompts;

pub struct SummarySynthesizer {
    deps: AgentDeps,
}

impl SummarySynthesizer {
    pub fn new(deps: AgentDeps) -> Self {
        Self { deps }
    }

    /// Merge `new_data` into `existing` (empty for a new student). One completion.
    pub async fn create_basic(&self, new_data: &str, existing: &str) -> padhai_core::Result<String> {
        self.deps
            .chat
            .ask(
                prompts::SUMMARY_SYSTEM,
                &prompts::summary_update(existing, new_data),
                &[],
            )
            .await
    }

    /// Merge `new_data` into the stored basic summary and overwrite it.
    ///
    /// `None` when the profile does not exist; no model call is made then.
    pub async fn refresh_basic(
        &self,
        student_id: &StudentId,
        new_data: &str,
    ) -> padhai_core::Result<Option<String>> {
        let Some(profile) = self.deps.store.get(student_id).await? else {
            return Ok(None);
        };

        let summary = self.create_basic(new_data, &profile.basic_summary).await?;
        if !self
            .deps
            .store
            .set_summary(student_id, SummaryField::Basic, &summary)
            .await?
        {
            return Ok(None);
        }

        debug!(student = %student_id, "Basic summary rewritten");
        Ok(Some(summary))
    }

    /// Rebuild the tracking summary from every assessment in the log.
    ///
    /// With no assessments yet, the current value is returned and the model
    /// is not called. `None` when the profile does not exist or the write
    /// matched no row.
    pub async fn refresh_tracking(
        &self,
        student_id: &StudentId,
    ) -> padhai_core::Result<Option<String>> {
        let Some(profile) = self.deps.store.get(student_id).await? else {
            return Ok(None);
        };

        let lines: Vec<String> = profile
            .interactions_by(AgentLabel::Assess.as_str())
            .map(|i| format!("Subject: {}, Evaluation: {}", i.subject, i.evaluation))
            .collect();

        if lines.is_empty() {
            return Ok(Some(profile.tracking_summary));
        }

        let summary = self
            .deps
            .chat
            .ask(
                prompts::TRACKING_SYSTEM,
                &prompts::tracking(&lines.join("\n")),
                &[],
            )
            .await?;

        if !self
            .deps
            .store
            .set_summary(student_id, SummaryField::Tracking, &summary)
            .await?
        {
            return Ok(None);
        }

        debug!(student = %student_id, assessments = lines.len(), "Tracking summary rewritten");
        Ok(Some(summary))
    }
}
