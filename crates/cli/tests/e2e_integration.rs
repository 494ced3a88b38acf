//! End-to-end tests for the Padhai tutoring pipeline.
//!
//! These drive the HTTP router over a real SQLite file with a scripted
//! model: registration, discovery, tutoring, assessment, and guidance, then
//! reopen the database to check what persisted.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use padhai_agent::{AgentDeps, AgentRequest, AgentSettings, ChatModel, Orchestrator};
use padhai_config::{AppConfig, StoreConfig};
use padhai_core::error::ProviderError;
use padhai_core::message::{Message, Role};
use padhai_core::profile::{StudentId, StudentIdentity};
use padhai_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use padhai_core::store::ProfileStore;
use padhai_gateway::{GatewayState, build_router};

// ── Mock Provider ────────────────────────────────────────────────────────

/// Returns scripted replies in sequence and keeps every request.
struct ScriptedProvider {
    replies: Vec<String>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: replies.iter().map(|r| r.to_string()).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> ProviderRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let index = requests.len();
        requests.push(request);
        let Some(text) = self.replies.get(index) else {
            panic!(
                "ScriptedProvider exhausted: call #{index}, have {}",
                self.replies.len()
            );
        };
        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "e2e-model".into(),
        })
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn sqlite_config(dir: &tempfile::TempDir) -> StoreConfig {
    StoreConfig {
        backend: "sqlite".into(),
        path: dir.path().join("padhai.db").to_string_lossy().into_owned(),
    }
}

async fn orchestrator(
    provider: Arc<ScriptedProvider>,
    store: Arc<dyn ProfileStore>,
) -> Arc<Orchestrator> {
    let deps = AgentDeps::new(ChatModel::new(provider, "e2e-model"), store);
    Arc::new(Orchestrator::new(deps, AgentSettings::default()))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<serde_json::Value>) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
}

const QUESTIONS: &str = r#"[{"question": "Which subject feels hardest?", "options": ["a. Algebra", "b. Biology"]}]"#;

// ── Full journey over HTTP ───────────────────────────────────────────────

#[tokio::test]
async fn student_journey_persists_to_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let store_config = sqlite_config(&dir);

    let provider = Arc::new(ScriptedProvider::new(&[
        // /initialize
        "Riya is an 8th grader who learns by doing experiments.",
        // /agent: discover
        "discover_agent",
        QUESTIONS,
        // /save-basic-summary
        "Riya learns by doing and finds algebra the hardest.",
        // /agent: tutor
        "tutor_agent",
        "Behold! Friction, the silent force that opposes all motion!",
        // /agent: assess
        "learning_tracker_agent",
        "- knows push and pull\nForces - 40%\n[quiz]",
        "Forces - 40%: solid on push/pull, shaky on friction",
        // /agent: guide
        "guide_agent",
        "Week 1: friction basics. Week 2: Newton's laws.",
    ]));

    let store = padhai_store::open_from_config(&store_config).await.unwrap();
    let state = Arc::new(GatewayState::new(
        orchestrator(provider.clone(), store).await,
        AppConfig::default(),
    ));
    let app = build_router(state);

    // register
    let (status, body) = call(
        &app,
        "POST",
        "/initialize",
        Some(serde_json::json!({
            "name": "Riya",
            "standard": "8th",
            "subject": "Science",
            "like_study": "experiments"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let student_id = body["student_id"].as_str().unwrap().to_string();

    // discovery questions
    let (status, body) = call(
        &app,
        "POST",
        "/agent",
        Some(serde_json::json!({"query": "get to know me", "student_id": student_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "discover_agent");
    assert_eq!(body["response"], QUESTIONS);
    let session_id = body["session_id"].as_str().unwrap().to_string();

    // answers folded into the basic summary
    let (status, body) = call(
        &app,
        "POST",
        "/save-basic-summary",
        Some(serde_json::json!({
            "student_id": student_id,
            "questions_answer": [{"question": "Which subject feels hardest?", "answer": "a. Algebra"}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Basic summary saved successfully");

    // tutoring in the same session
    let (status, body) = call(
        &app,
        "POST",
        "/agent",
        Some(serde_json::json!({
            "query": "explain friction",
            "student_id": student_id,
            "tone": "dramatic",
            "session_id": session_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "tutor_agent");
    assert_eq!(body["session_id"], session_id.as_str());

    // the dispatcher saw the refreshed summary and the earlier turns
    let dispatch = provider.request(4);
    assert!(
        dispatch
            .messages
            .iter()
            .any(|m| m.content.contains("finds algebra the hardest"))
    );
    assert_eq!(dispatch.messages[1].role, Role::User);
    assert_eq!(dispatch.messages[1].content, "get to know me");
    assert!(provider.request(5).messages.last().unwrap().content.contains("dramatic"));

    // assessment
    let (status, body) = call(
        &app,
        "POST",
        "/agent",
        Some(serde_json::json!({"query": "forces", "student_id": student_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "learning_tracker_agent");

    let (status, body) = call(
        &app,
        "GET",
        &format!("/get-learning-summary/{student_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["tracking_summary"],
        "Forces - 40%: solid on push/pull, shaky on friction"
    );

    // guidance
    let (status, body) = call(
        &app,
        "POST",
        "/agent",
        Some(serde_json::json!({"query": "I scored 40% in forces, plan my study", "student_id": student_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "guide_agent");
    assert_eq!(provider.calls(), 11);

    drop(app);

    // reopen the database file
    let reopened = padhai_store::open_from_config(&store_config).await.unwrap();
    let profile = reopened
        .get(&StudentId::from(&student_id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.identity.name, "Riya");
    assert_eq!(
        profile.basic_summary,
        "Riya learns by doing and finds algebra the hardest."
    );
    assert_eq!(
        profile.guide_summary,
        "Week 1: friction basics. Week 2: Newton's laws."
    );
    assert_eq!(profile.interactions.len(), 1);
    assert_eq!(profile.interactions[0].agent, "learning_tracker_agent");
    assert_eq!(profile.interactions[0].subject, "forces");
}

// ── Orchestrator without HTTP ────────────────────────────────────────────

#[tokio::test]
async fn unknown_label_touches_nothing() {
    let provider = Arc::new(ScriptedProvider::new(&["Riya is curious.", "astrology_agent"]));
    let store: Arc<dyn ProfileStore> = Arc::new(padhai_store::InMemoryStore::new());
    let orch = orchestrator(provider.clone(), store.clone()).await;

    let registration = orch
        .register(StudentIdentity {
            name: "Riya".into(),
            standard: "8th".into(),
            subject: "Science".into(),
            like_study: "experiments".into(),
        })
        .await
        .unwrap();
    let before = store.get(&registration.student_id).await.unwrap().unwrap();

    let reply = orch
        .handle(AgentRequest::new("what is my horoscope?", registration.student_id.clone()))
        .await
        .unwrap();
    assert_eq!(reply.label.as_str(), "unknown");
    assert_eq!(reply.response, "Agent not found.");
    assert_eq!(provider.calls(), 2);

    let after = store.get(&registration.student_id).await.unwrap().unwrap();
    assert_eq!(after.basic_summary, before.basic_summary);
    assert_eq!(after.tracking_summary, before.tracking_summary);
    assert_eq!(after.guide_summary, before.guide_summary);
    assert!(after.interactions.is_empty());
}

#[tokio::test]
async fn repeated_assessments_accumulate_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let store_config = sqlite_config(&dir);

    let provider = Arc::new(ScriptedProvider::new(&[
        "summary",
        "learning_tracker_agent",
        "Optics - 30%",
        "Optics - 30%",
        "learning_tracker_agent",
        "Waves - 70%",
        "Optics - 30%, Waves - 70%",
    ]));
    let store = padhai_store::open_from_config(&store_config).await.unwrap();
    let orch = orchestrator(provider.clone(), store).await;

    let id = orch
        .register(StudentIdentity {
            name: "Arjun".into(),
            standard: "10th".into(),
            subject: "Physics".into(),
            like_study: "diagrams".into(),
        })
        .await
        .unwrap()
        .student_id;

    for topic in ["optics", "waves"] {
        orch.handle(AgentRequest::new(topic, id.clone())).await.unwrap();
    }

    // the second tracking refresh replays both assessments
    let tracking_prompt = provider.request(6).messages.last().unwrap().content.clone();
    assert!(tracking_prompt.contains("Subject: optics, Evaluation: Optics - 30%"));
    assert!(tracking_prompt.contains("Subject: waves, Evaluation: Waves - 70%"));

    let reopened = padhai_store::open_from_config(&store_config).await.unwrap();
    let profile = reopened.get(&id).await.unwrap().unwrap();
    let subjects: Vec<&str> = profile
        .interactions
        .iter()
        .map(|i| i.subject.as_str())
        .collect();
    assert_eq!(subjects, ["optics", "waves"]);
    assert_eq!(profile.tracking_summary, "Optics - 30%, Waves - 70%");
}
