//! Student profile — the one persisted record per student.
//!
//! A profile carries immutable identity fields, three free-text summaries
//! that are rewritten wholesale, and an append-only interaction log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique key for a stored profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub String);

impl StudentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StudentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registration data. Set once at creation and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentIdentity {
    pub name: String,
    /// Grade or class, e.g. "8th".
    pub standard: String,
    pub subject: String,
    /// Free-text study attitude tag, e.g. "likes experiments".
    pub like_study: String,
}

impl StudentIdentity {
    /// Names of fields that are missing or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("standard", &self.standard),
            ("subject", &self.subject),
            ("like_study", &self.like_study),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect()
    }
}

/// One immutable entry in a profile's interaction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Role tag of the agent that produced it (label wire name).
    pub agent: String,
    /// Subject or topic the interaction was about.
    pub subject: String,
    /// The agent's raw result text.
    pub evaluation: String,
    pub recorded_at: DateTime<Utc>,
}

impl Interaction {
    pub fn new(
        agent: impl Into<String>,
        subject: impl Into<String>,
        evaluation: impl Into<String>,
    ) -> Self {
        Self {
            agent: agent.into(),
            subject: subject.into(),
            evaluation: evaluation.into(),
            recorded_at: Utc::now(),
        }
    }
}

/// The overwritable free-text fields of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryField {
    Basic,
    Tracking,
    Guide,
}

impl SummaryField {
    /// Column / document key for this field.
    pub fn key(&self) -> &'static str {
        match self {
            SummaryField::Basic => "basic_summary",
            SummaryField::Tracking => "tracking_summary",
            SummaryField::Guide => "guide_summary",
        }
    }
}

/// The persisted record for one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: StudentId,

    #[serde(flatten)]
    pub identity: StudentIdentity,

    #[serde(default)]
    pub basic_summary: String,

    #[serde(default)]
    pub tracking_summary: String,

    #[serde(default)]
    pub guide_summary: String,

    /// Append-only, oldest first.
    #[serde(default)]
    pub interactions: Vec<Interaction>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudentProfile {
    /// A fresh profile with a newly allocated id and an initial basic summary.
    pub fn new(identity: StudentIdentity, basic_summary: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: StudentId::new(),
            identity,
            basic_summary: basic_summary.into(),
            tracking_summary: String::new(),
            guide_summary: String::new(),
            interactions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self, field: SummaryField) -> &str {
        match field {
            SummaryField::Basic => &self.basic_summary,
            SummaryField::Tracking => &self.tracking_summary,
            SummaryField::Guide => &self.guide_summary,
        }
    }

    pub fn set_summary(&mut self, field: SummaryField, text: impl Into<String>) {
        let text = text.into();
        match field {
            SummaryField::Basic => self.basic_summary = text,
            SummaryField::Tracking => self.tracking_summary = text,
            SummaryField::Guide => self.guide_summary = text,
        }
        self.updated_at = Utc::now();
    }

    /// Interactions produced by the given agent tag, oldest first.
    pub fn interactions_by<'a>(&'a self, agent: &'a str) -> impl Iterator<Item = &'a Interaction> {
        self.interactions.iter().filter(move |i| i.agent == agent)
    }
}
