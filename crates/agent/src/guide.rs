//! Guide agent — turns learning scores into a staged study roadmap.

use padhai_core::Error;
use padhai_core::message::Message;
use padhai_core::profile::{StudentId, SummaryField};
use tracing::debug;

use crate::chat::AgentDeps;
use crate::prompts;

pub struct GuideAgent {
    deps: AgentDeps,
}

impl GuideAgent {
    pub fn new(deps: AgentDeps) -> Self {
        Self { deps }
    }

    /// Build a roadmap and store it as the guide summary.
    ///
    /// `score_hint` is whatever the student said (often the query itself).
    /// The previous roadmap is not consulted.
    pub async fn suggest_path(
        &self,
        score_hint: &str,
        student_id: &StudentId,
        history: &[Message],
    ) -> padhai_core::Result<String> {
        let profile = self
            .deps
            .store
            .get(student_id)
            .await?
            .ok_or_else(|| Error::StudentNotFound(student_id.to_string()))?;

        let roadmap = self
            .deps
            .chat
            .ask(
                prompts::GUIDE_SYSTEM,
                &prompts::guide(
                    score_hint,
                    &profile.tracking_summary,
                    &profile.basic_summary,
                ),
                history,
            )
            .await?;

        let _guard = self.deps.locks.lock(student_id).await;
        self.deps
            .store
            .set_summary(student_id, SummaryField::Guide, &roadmap)
            .await?;
        debug!(student = %student_id, "Guide summary rewritten");

        Ok(roadmap)
    }
}
