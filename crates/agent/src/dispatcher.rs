//! Dispatcher — picks the specialist for a query.
//!
//! One profile read and one completion. The completion is decoded by the
//! strict [`AgentLabel::parse`]; anything outside the four names comes back
//! as `AgentLabel::Unknown` rather than an error, and is never retried.

use padhai_core::label::AgentLabel;
use padhai_core::message::Message;
use padhai_core::profile::StudentId;
use tracing::{debug, warn};

use crate::chat::AgentDeps;
use crate::prompts;

/// The dispatcher's decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Routing {
    pub label: AgentLabel,
    /// Model output before decoding.
    pub raw: String,
}

pub struct Dispatcher {
    deps: AgentDeps,
}

impl Dispatcher {
    pub fn new(deps: AgentDeps) -> Self {
        Self { deps }
    }

    /// Choose an agent for `query`.
    ///
    /// A missing profile is not an error here: both summaries fall back to
    /// a placeholder and the model still decides.
    pub async fn route(
        &self,
        query: &str,
        student_id: &StudentId,
        history: &[Message],
    ) -> padhai_core::Result<Routing> {
        let profile = self.deps.store.get(student_id).await?;
        let (basic, tracking) = match &profile {
            Some(p) => (p.basic_summary.as_str(), p.tracking_summary.as_str()),
            None => (prompts::NO_SUMMARY, prompts::NO_SUMMARY),
        };

        let raw = self
            .deps
            .chat
            .ask(
                prompts::DISPATCHER_SYSTEM,
                &prompts::dispatch(query, basic, tracking),
                history,
            )
            .await?;

        let label = AgentLabel::parse(&raw);
        if label.is_known() {
            debug!(student = %student_id, label = %label, "Dispatched");
        } else {
            warn!(student = %student_id, raw = %raw, "Dispatcher returned an unrecognized label");
        }

        Ok(Routing { label, raw })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[tokio::test]
    async fn decodes_label_variants() {
        let cases = [
            ("tutor_agent", AgentLabel::Tutor),
            ("  Learning_Tracker_Agent \n", AgentLabel::Assess),
            ("\"guide_agent\"", AgentLabel::Guide),
            ("DISCOVER_AGENT.", AgentLabel::Discover),
        ];
        for (raw, expected) in cases {
            let fx = fixture(&[raw]);
            let id = seed_profile(&fx.store, "Riya, 8th grade, science").await;
            let routing = Dispatcher::new(fx.deps)
                .route("teach me", &id, &[])
                .await
                .unwrap();
            assert_eq!(routing.label, expected, "raw {raw:?}");
            assert_eq!(routing.raw, raw);
        }
    }

    #[tokio::test]
    async fn unknown_label_is_not_an_error() {
        let fx = fixture(&["practice_agent"]);
        let id = seed_profile(&fx.store, "summary").await;
        let routing = Dispatcher::new(fx.deps)
            .route("quiz me", &id, &[])
            .await
            .unwrap();
        assert!(!routing.label.is_known());
        assert_eq!(fx.provider.call_count(), 1);
    }

    #[tokio::test]
    async fn missing_profile_uses_placeholder_context() {
        let fx = fixture(&["discover_agent"]);
        let routing = Dispatcher::new(fx.deps)
            .route("hello", &StudentId::from("ghost"), &[])
            .await
            .unwrap();
        assert_eq!(routing.label, AgentLabel::Discover);
        let prompt = fx.provider.prompt(0);
        assert_eq!(prompt.matches(prompts::NO_SUMMARY).count(), 2);
        assert_eq!(fx.store.summary_writes(), 0);
    }

    #[tokio::test]
    async fn prompt_carries_query_and_summaries() {
        let fx = fixture(&["tutor_agent"]);
        let id = seed_profile(&fx.store, "Riya likes experiments").await;
        Dispatcher::new(fx.deps)
            .route("explain magnets", &id, &[Message::user("earlier")])
            .await
            .unwrap();
        let req = fx.provider.request(0);
        assert_eq!(req.messages.len(), 3);
        assert_eq!(req.messages[0].content, prompts::DISPATCHER_SYSTEM);
        let prompt = fx.provider.prompt(0);
        assert!(prompt.contains("explain magnets"));
        assert!(prompt.contains("Riya likes experiments"));
    }
}
