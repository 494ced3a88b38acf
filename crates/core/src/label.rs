//! Agent labels — the closed vocabulary the dispatcher chooses from.
//!
//! The model answers the routing question with free text. That text is
//! decoded here by a strict parser: after trimming, lowercasing, and
//! stripping wrapping quotes, it must equal one of the four canonical names.
//! Everything else becomes [`AgentLabel::Unknown`], never an error.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Which specialist agent handles a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AgentLabel {
    /// Gathers background about the student.
    Discover,
    /// Explains a topic in the student's preferred tone.
    Tutor,
    /// Evaluates knowledge, scores it, and produces a quiz.
    Assess,
    /// Builds a staged learning roadmap.
    Guide,
    /// The model answered with something outside the vocabulary.
    /// Holds the normalized text for logging.
    Unknown(String),
}

impl AgentLabel {
    /// The four routable labels, in prompt order.
    pub const KNOWN: [AgentLabel; 4] = [
        AgentLabel::Discover,
        AgentLabel::Tutor,
        AgentLabel::Assess,
        AgentLabel::Guide,
    ];

    /// Decode raw model output into a label.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
            .trim_end_matches('.')
            .trim()
            .to_lowercase();

        match normalized.as_str() {
            "discover_agent" => AgentLabel::Discover,
            "tutor_agent" => AgentLabel::Tutor,
            "learning_tracker_agent" => AgentLabel::Assess,
            "guide_agent" => AgentLabel::Guide,
            _ => AgentLabel::Unknown(normalized),
        }
    }

    /// The wire name of this label. `Unknown` always renders as `"unknown"`.
    pub fn as_str(&self) -> &str {
        match self {
            AgentLabel::Discover => "discover_agent",
            AgentLabel::Tutor => "tutor_agent",
            AgentLabel::Assess => "learning_tracker_agent",
            AgentLabel::Guide => "guide_agent",
            AgentLabel::Unknown(_) => "unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, AgentLabel::Unknown(_))
    }
}

impl fmt::Display for AgentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AgentLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AgentLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(AgentLabel::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_names() {
        assert_eq!(AgentLabel::parse("discover_agent"), AgentLabel::Discover);
        assert_eq!(AgentLabel::parse("tutor_agent"), AgentLabel::Tutor);
        assert_eq!(
            AgentLabel::parse("learning_tracker_agent"),
            AgentLabel::Assess
        );
        assert_eq!(AgentLabel::parse("guide_agent"), AgentLabel::Guide);
    }

    #[test]
    fn tolerates_case_whitespace_and_quotes() {
        assert_eq!(AgentLabel::parse("  Tutor_Agent\n"), AgentLabel::Tutor);
        assert_eq!(AgentLabel::parse("\"GUIDE_AGENT\""), AgentLabel::Guide);
        assert_eq!(AgentLabel::parse("`discover_agent`."), AgentLabel::Discover);
    }

    #[test]
    fn rejects_near_misses() {
        for raw in [
            "tutor",
            "the tutor_agent",
            "practice_agent",
            "tutor_agent, then guide_agent",
            "",
        ] {
            let label = AgentLabel::parse(raw);
            assert!(!label.is_known(), "{raw:?} should not decode");
        }
    }

    #[test]
    fn unknown_keeps_normalized_text_but_renders_unknown() {
        let label = AgentLabel::parse("  Practice_Agent ");
        assert_eq!(label, AgentLabel::Unknown("practice_agent".into()));
        assert_eq!(label.to_string(), "unknown");
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&AgentLabel::Assess).unwrap();
        assert_eq!(json, "\"learning_tracker_agent\"");
        let back: AgentLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AgentLabel::Assess);
    }
}
