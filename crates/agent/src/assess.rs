//! Assess agent — scores the student on a topic and quizzes them.
//!
//! The only agent that appends to the interaction log. Each evaluation adds
//! one assessment-tagged entry and then rewrites the tracking summary from
//! the whole log, both under the profile lock.

use padhai_core::Error;
use padhai_core::label::AgentLabel;
use padhai_core::message::Message;
use padhai_core::profile::{Interaction, StudentId};
use tracing::info;

use crate::chat::AgentDeps;
use crate::prompts;
use crate::synthesizer::SummarySynthesizer;

pub struct AssessAgent {
    deps: AgentDeps,
    synthesizer: SummarySynthesizer,
}

impl AssessAgent {
    pub fn new(deps: AgentDeps) -> Self {
        Self {
            synthesizer: SummarySynthesizer::new(deps.clone()),
            deps,
        }
    }

    /// Evaluate the student's knowledge of `topic`.
    ///
    /// Returns the model's evaluation text (point summary, learning score,
    /// quiz without answers).
    pub async fn evaluate(
        &self,
        topic: &str,
        student_id: &StudentId,
        history: &[Message],
    ) -> padhai_core::Result<String> {
        let profile = self
            .deps
            .store
            .get(student_id)
            .await?
            .ok_or_else(|| Error::StudentNotFound(student_id.to_string()))?;

        let evaluation = self
            .deps
            .chat
            .ask(
                prompts::ASSESS_SYSTEM,
                &prompts::assess(topic, &profile.basic_summary),
                history,
            )
            .await?;

        let _guard = self.deps.locks.lock(student_id).await;
        let appended = self
            .deps
            .store
            .append_interaction(
                student_id,
                Interaction::new(AgentLabel::Assess.as_str(), topic, &evaluation),
            )
            .await?;
        if !appended {
            return Err(Error::StudentNotFound(student_id.to_string()));
        }

        self.synthesizer.refresh_tracking(student_id).await?;
        info!(student = %student_id, topic, "Assessment recorded");

        Ok(evaluation)
    }
}
