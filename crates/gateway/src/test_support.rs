//! Shared fixtures for gateway tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use padhai_agent::{AgentDeps, AgentSettings, ChatModel, Orchestrator};
use padhai_config::AppConfig;
use padhai_core::error::ProviderError;
use padhai_core::message::Message;
use padhai_core::profile::{StudentId, StudentIdentity, StudentProfile};
use padhai_core::provider::{Provider, ProviderRequest, ProviderResponse};
use padhai_store::InMemoryStore;

pub use padhai_core::store::ProfileStore;

use crate::{GatewayState, SharedState, build_router};

/// Replies with scripted texts in order and records every request.
/// Calls past the end of the script fail.
pub struct ScriptedProvider {
    replies: Vec<String>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: replies.iter().map(|r| r.to_string()).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn request(&self, index: usize) -> ProviderRequest {
        self.requests.lock().unwrap()[index].clone()
    }

    /// The final user message of request `index`.
    pub fn prompt(&self, index: usize) -> String {
        self.request(index)
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let index = requests.len();
        requests.push(request);
        let text = self.replies.get(index).ok_or_else(|| ProviderError::ApiError {
            status_code: 500,
            message: format!("script exhausted at call #{index}"),
        })?;
        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage: None,
            model: "scripted-model".into(),
        })
    }
}

pub struct TestEnv {
    pub provider: Arc<ScriptedProvider>,
    pub store: Arc<InMemoryStore>,
    pub state: SharedState,
}

impl TestEnv {
    pub fn new(replies: &[&str]) -> Self {
        Self::with_config(replies, AppConfig::default())
    }

    pub fn with_config(replies: &[&str], config: AppConfig) -> Self {
        let provider = Arc::new(ScriptedProvider::new(replies));
        let store = Arc::new(InMemoryStore::new());
        let deps = AgentDeps::new(
            ChatModel::new(provider.clone(), "scripted-model"),
            store.clone(),
        );
        let orchestrator = Orchestrator::new(deps, AgentSettings::default());
        let state = Arc::new(GatewayState::new(Arc::new(orchestrator), config));
        Self {
            provider,
            store,
            state,
        }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Insert a profile directly, bypassing the model.
    pub async fn seed(&self, basic_summary: &str) -> StudentId {
        let identity = StudentIdentity {
            name: "Riya".into(),
            standard: "8th".into(),
            subject: "Science".into(),
            like_study: "hands-on experiments".into(),
        };
        self.store
            .insert(StudentProfile::new(identity, basic_summary))
            .await
            .unwrap()
    }
}

pub fn get_req(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Run one request and decode the JSON body (`Null` when not JSON).
pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

pub fn registration_body() -> serde_json::Value {
    serde_json::json!({
        "name": "Riya",
        "standard": "8th",
        "subject": "Science",
        "like_study": "Experiments"
    })
}
