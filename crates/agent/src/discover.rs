//! Discover agent — learns about the student.
//!
//! With no basic summary yet, the student's input is condensed into a
//! biographical narrative. Otherwise the model writes a short batch of
//! follow-up questions (JSON text) for the UI to show; the answers come back
//! through `save_basic_summary`.

use padhai_config::DiscoverWriteBack;
use padhai_core::Error;
use padhai_core::message::Message;
use padhai_core::profile::{StudentId, SummaryField};
use tracing::debug;

use crate::chat::AgentDeps;
use crate::prompts;

pub struct DiscoverAgent {
    deps: AgentDeps,
    write_back: DiscoverWriteBack,
    max_questions: u32,
}

impl DiscoverAgent {
    pub fn new(deps: AgentDeps, write_back: DiscoverWriteBack, max_questions: u32) -> Self {
        Self {
            deps,
            write_back,
            max_questions,
        }
    }

    pub async fn gather(
        &self,
        student_id: &StudentId,
        input: &str,
        history: &[Message],
    ) -> padhai_core::Result<String> {
        let profile = self
            .deps
            .store
            .get(student_id)
            .await?
            .ok_or_else(|| Error::StudentNotFound(student_id.to_string()))?;

        let condensing = profile.basic_summary.trim().is_empty();
        let prompt = if condensing {
            prompts::discover_condense(input)
        } else {
            prompts::discover_questions(&profile.basic_summary, self.max_questions)
        };

        let reply = self
            .deps
            .chat
            .ask(prompts::DISCOVER_SYSTEM, &prompt, history)
            .await?;

        let persist = match self.write_back {
            DiscoverWriteBack::Never => false,
            DiscoverWriteBack::SummaryOnly => condensing,
            DiscoverWriteBack::Always => true,
        };
        if persist {
            let _guard = self.deps.locks.lock(student_id).await;
            self.deps
                .store
                .set_summary(student_id, SummaryField::Basic, &reply)
                .await?;
            debug!(student = %student_id, "Discover output written to basic summary");
        }

        Ok(reply)
    }
}
