//! Tutor agent — explains a topic in the student's chosen tone.

use std::fmt;
use std::str::FromStr;

use padhai_core::Error;
use padhai_core::message::Message;
use padhai_core::profile::StudentId;
use serde::{Deserialize, Serialize};

use crate::chat::AgentDeps;
use crate::prompts;

/// Narrative style of an explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Funny,
    Serious,
    Enthusiastic,
    Casual,
    Dramatic,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Funny,
        Tone::Serious,
        Tone::Enthusiastic,
        Tone::Casual,
        Tone::Dramatic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Funny => "funny",
            Tone::Serious => "serious",
            Tone::Enthusiastic => "enthusiastic",
            Tone::Casual => "casual",
            Tone::Dramatic => "dramatic",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Tone::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "unknown tone '{s}' (expected one of: funny, serious, enthusiastic, casual, dramatic)"
                ))
            })
    }
}

pub struct TutorAgent {
    deps: AgentDeps,
}

impl TutorAgent {
    pub fn new(deps: AgentDeps) -> Self {
        Self { deps }
    }

    /// Explain `query` using both stored summaries. Read-only.
    pub async fn explain(
        &self,
        query: &str,
        student_id: &StudentId,
        tone: Tone,
        history: &[Message],
    ) -> padhai_core::Result<String> {
        let profile = self
            .deps
            .store
            .get(student_id)
            .await?
            .ok_or_else(|| Error::StudentNotFound(student_id.to_string()))?;

        let prompt = prompts::tutor(
            query,
            tone.as_str(),
            &profile.basic_summary,
            &profile.tracking_summary,
        );
        self.deps
            .chat
            .ask(prompts::TUTOR_SYSTEM, &prompt, history)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn tone_parsing() {
        assert_eq!("Funny".parse::<Tone>().unwrap(), Tone::Funny);
        assert_eq!(" dramatic ".parse::<Tone>().unwrap(), Tone::Dramatic);
        assert!("sarcastic".parse::<Tone>().is_err());
    }

    #[test]
    fn tone_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Tone::Casual).unwrap(), "\"casual\"");
        let t: Tone = serde_json::from_str("\"serious\"").unwrap();
        assert_eq!(t, Tone::Serious);
    }

    #[tokio::test]
    async fn explain_uses_tone_and_both_summaries() {
        let fx = fixture(&["Magnets attract! 🧲"]);
        let id = seed_profile(&fx.store, "Riya likes experiments").await;
        fx.deps
            .store
            .set_summary(&id, padhai_core::SummaryField::Tracking, "Magnetism - 30%")
            .await
            .unwrap();

        let tutor = TutorAgent::new(fx.deps.clone());
        let reply = tutor
            .explain("Explain magnets", &id, Tone::Funny, &[])
            .await
            .unwrap();
        assert_eq!(reply, "Magnets attract! 🧲");

        let prompt = fx.provider.prompt(0);
        assert!(prompt.contains("funny tone"));
        assert!(prompt.contains("Riya likes experiments"));
        assert!(prompt.contains("Magnetism - 30%"));
        // only the seeding write above
        assert_eq!(fx.store.summary_writes(), 1);
    }

    #[tokio::test]
    async fn missing_profile_is_not_found_without_model_call() {
        let fx = fixture(&[]);
        let err = TutorAgent::new(fx.deps)
            .explain("anything", &StudentId::from("ghost"), Tone::Casual, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::StudentNotFound(_)));
        assert_eq!(fx.provider.call_count(), 0);
    }
}
