//! Orchestrator — dispatch, run the chosen agent, reply.
//!
//! This is the surface the gateway and the CLI call. It owns one instance
//! of each agent, all sharing the same [`AgentDeps`].

use std::sync::Arc;

use padhai_config::{AgentsConfig, AppConfig, DiscoverWriteBack};
use padhai_core::label::AgentLabel;
use padhai_core::message::Message;
use padhai_core::profile::{StudentId, StudentIdentity, StudentProfile};
use padhai_core::provider::Provider;
use padhai_core::store::ProfileStore;
use padhai_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::assess::AssessAgent;
use crate::chat::{AgentDeps, ChatModel};
use crate::discover::DiscoverAgent;
use crate::dispatcher::Dispatcher;
use crate::guide::GuideAgent;
use crate::synthesizer::SummarySynthesizer;
use crate::tutor::{Tone, TutorAgent};

/// Fixed reply when the dispatcher names no known agent.
pub const AGENT_NOT_FOUND: &str = "Agent not found.";

/// Behavior knobs taken from `[agents]`.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub default_tone: Tone,
    pub discover_write_back: DiscoverWriteBack,
    pub max_discovery_questions: u32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            default_tone: Tone::Enthusiastic,
            discover_write_back: DiscoverWriteBack::Never,
            max_discovery_questions: 5,
        }
    }
}

impl AgentSettings {
    pub fn from_config(config: &AgentsConfig) -> Result<Self> {
        let default_tone = config
            .default_tone
            .parse::<Tone>()
            .map_err(|e| Error::Config {
                message: format!("agents.default_tone: {e}"),
            })?;
        Ok(Self {
            default_tone,
            discover_write_back: config.discover_write_back,
            max_discovery_questions: config
                .max_discovery_questions
                .clamp(1, padhai_config::MAX_DISCOVERY_QUESTIONS),
        })
    }
}

/// Result of registering a student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub student_id: StudentId,
    pub basic_summary: String,
}

/// One inbound query.
#[derive(Debug, Clone)]
pub struct AgentRequest {
    pub query: String,
    pub student_id: StudentId,
    /// Falls back to the configured default tone.
    pub tone: Option<Tone>,
    /// Prior turns of the session, oldest first.
    pub history: Vec<Message>,
}

impl AgentRequest {
    pub fn new(query: impl Into<String>, student_id: StudentId) -> Self {
        Self {
            query: query.into(),
            student_id,
            tone: None,
            history: Vec::new(),
        }
    }
}

/// Which agent answered, and what it said.
#[derive(Debug, Clone, Serialize)]
pub struct AgentReply {
    pub label: AgentLabel,
    pub response: String,
}

pub struct Orchestrator {
    deps: AgentDeps,
    settings: AgentSettings,
    dispatcher: Dispatcher,
    discover: DiscoverAgent,
    tutor: TutorAgent,
    assess: AssessAgent,
    guide: GuideAgent,
    synthesizer: SummarySynthesizer,
}

impl Orchestrator {
    pub fn new(deps: AgentDeps, settings: AgentSettings) -> Self {
        Self {
            dispatcher: Dispatcher::new(deps.clone()),
            discover: DiscoverAgent::new(
                deps.clone(),
                settings.discover_write_back,
                settings.max_discovery_questions,
            ),
            tutor: TutorAgent::new(deps.clone()),
            assess: AssessAgent::new(deps.clone()),
            guide: GuideAgent::new(deps.clone()),
            synthesizer: SummarySynthesizer::new(deps.clone()),
            deps,
            settings,
        }
    }

    /// Wire an orchestrator from configuration.
    pub fn from_config(
        provider: Arc<dyn Provider>,
        store: Arc<dyn ProfileStore>,
        config: &AppConfig,
    ) -> Result<Self> {
        let settings = AgentSettings::from_config(&config.agents)?;
        let deps = AgentDeps::new(ChatModel::from_config(provider, config), store);
        Ok(Self::new(deps, settings))
    }

    pub fn store(&self) -> &Arc<dyn ProfileStore> {
        &self.deps.store
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    /// Create a profile with a synthesized basic summary.
    pub async fn register(&self, identity: StudentIdentity) -> Result<Registration> {
        let missing = identity.missing_fields();
        if !missing.is_empty() {
            return Err(Error::InvalidInput(format!(
                "missing fields: {}",
                missing.join(", ")
            )));
        }

        let details = format!(
            "name: {}, standard: {}, subject: {}, like_study: {}",
            identity.name, identity.standard, identity.subject, identity.like_study
        );
        let basic_summary = self.synthesizer.create_basic(&details, "").await?;

        let profile = StudentProfile::new(identity, basic_summary.clone());
        let student_id = self.deps.store.insert(profile).await?;
        info!(student = %student_id, "Student registered");

        Ok(Registration {
            student_id,
            basic_summary,
        })
    }

    /// Route a query and run the chosen agent.
    pub async fn handle(&self, request: AgentRequest) -> Result<AgentReply> {
        if request.query.trim().is_empty() {
            return Err(Error::InvalidInput("query must not be empty".into()));
        }

        let AgentRequest {
            query,
            student_id,
            tone,
            history,
        } = request;

        let routing = self
            .dispatcher
            .route(&query, &student_id, &history)
            .await?;

        let response = match &routing.label {
            AgentLabel::Discover => self.discover.gather(&student_id, &query, &history).await?,
            AgentLabel::Tutor => {
                let tone = tone.unwrap_or(self.settings.default_tone);
                self.tutor
                    .explain(&query, &student_id, tone, &history)
                    .await?
            }
            AgentLabel::Assess => self.assess.evaluate(&query, &student_id, &history).await?,
            AgentLabel::Guide => {
                self.guide
                    .suggest_path(&query, &student_id, &history)
                    .await?
            }
            AgentLabel::Unknown(raw) => {
                warn!(student = %student_id, label = %raw, "No agent for label");
                AGENT_NOT_FOUND.to_string()
            }
        };

        info!(student = %student_id, agent = %routing.label, "Query handled");
        Ok(AgentReply {
            label: routing.label,
            response,
        })
    }

    /// Fold discovery answers into the basic summary.
    pub async fn save_basic_summary(&self, student_id: &StudentId, answers: &str) -> Result<String> {
        if answers.trim().is_empty() {
            return Err(Error::InvalidInput(
                "questions_answer must not be empty".into(),
            ));
        }

        let _guard = self.deps.locks.lock(student_id).await;
        self.synthesizer
            .refresh_basic(student_id, answers)
            .await?
            .ok_or_else(|| Error::StudentNotFound(student_id.to_string()))
    }

    pub async fn tracking_summary(&self, student_id: &StudentId) -> Result<Option<String>> {
        Ok(self
            .deps
            .store
            .get(student_id)
            .await?
            .map(|p| p.tracking_summary))
    }

    pub async fn profile(&self, student_id: &StudentId) -> Result<Option<StudentProfile>> {
        Ok(self.deps.store.get(student_id).await?)
    }
}
