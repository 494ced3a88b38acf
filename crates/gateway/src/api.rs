//! JSON API — registration, agent queries, and summaries.
//!
//! Endpoints:
//! - POST /initialize                        — Register a student
//! - POST /agent                             — Dispatch a query to an agent
//! - GET  /get-learning-summary/{student_id} — Tracking summary
//! - POST /save-basic-summary                — Fold discovery answers into the profile
//! - GET  /students/{student_id}             — Full profile view

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use padhai_agent::{AgentRequest, Registration, Tone};
use padhai_core::Error;
use padhai_core::profile::{StudentId, StudentIdentity, StudentProfile};
use padhai_core::session::SessionId;

use crate::SharedState;

/// Build the API router.
pub fn api_router(state: SharedState) -> Router {
    Router::new()
        .route("/initialize", post(initialize_handler))
        .route("/agent", post(agent_handler))
        .route(
            "/get-learning-summary/{student_id}",
            get(learning_summary_handler),
        )
        .route("/save-basic-summary", post(save_basic_summary_handler))
        .route("/students/{student_id}", get(student_handler))
        .with_state(state)
}

// ── Request / Response types ──────────────────────────────────────────────

/// Registration form. Fields may arrive as any JSON scalar.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InitializeRequest {
    pub name: Value,
    pub standard: Value,
    pub subject: Value,
    pub like_study: Value,
}

#[derive(Debug, Deserialize)]
pub struct AgentQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub tone: Option<String>,
    /// Omit to start a new session.
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentResponse {
    pub response: String,
    /// Wire name of the agent that answered, `"unknown"` if none did.
    pub model: String,
    pub session_id: SessionId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LearningSummaryResponse {
    pub tracking_summary: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SaveBasicSummaryRequest {
    pub student_id: Option<String>,
    /// A string, or any JSON value (serialized to text).
    pub questions_answer: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map a domain error to a status and body. 5xx detail stays in the log.
fn api_error(err: Error) -> ApiError {
    match err {
        Error::StudentNotFound(_) => error_response(StatusCode::NOT_FOUND, "Student not found"),
        Error::InvalidInput(msg) => error_response(StatusCode::BAD_REQUEST, msg),
        Error::Provider(e) => {
            error!(error = %e, "Language model request failed");
            error_response(StatusCode::BAD_GATEWAY, "Language model request failed")
        }
        other => {
            error!(error = %other, "Request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Text form of a JSON value: strings as-is, null as empty, the rest serialized.
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_tone(raw: Option<&str>) -> Result<Option<Tone>, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(t) => t.parse::<Tone>().map(Some),
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn initialize_handler(
    State(state): State<SharedState>,
    Json(payload): Json<InitializeRequest>,
) -> Result<Json<Registration>, ApiError> {
    let identity = StudentIdentity {
        name: value_text(&payload.name),
        standard: value_text(&payload.standard),
        subject: value_text(&payload.subject),
        like_study: value_text(&payload.like_study),
    };
    info!(name = %identity.name, "Registration request");

    let registration = state
        .orchestrator
        .register(identity)
        .await
        .map_err(api_error)?;
    Ok(Json(registration))
}

async fn agent_handler(
    State(state): State<SharedState>,
    Json(payload): Json<AgentQuery>,
) -> Result<Json<AgentResponse>, ApiError> {
    if payload.student_id.trim().is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "student_id is required",
        ));
    }
    let student_id = StudentId::from(payload.student_id.trim());
    let tone = parse_tone(payload.tone.as_deref()).map_err(api_error)?;
    let session_id = payload
        .session_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(SessionId::from)
        .unwrap_or_default();

    info!(student = %student_id, session = %session_id, "Agent request");

    let history = state
        .sessions
        .history(&session_id, &student_id)
        .await
        .map_err(api_error)?;

    let mut request = AgentRequest::new(payload.query.clone(), student_id.clone());
    request.tone = tone;
    request.history = history;

    let reply = state.orchestrator.handle(request).await.map_err(api_error)?;

    remember_turn(&state, &session_id, &student_id, &payload.query, &reply.response).await;

    Ok(Json(AgentResponse {
        response: reply.response,
        model: reply.label.as_str().to_string(),
        session_id,
    }))
}

/// Append the exchange to the session log. The reply already exists, so a
/// failure here is logged and the turn is dropped.
async fn remember_turn(
    state: &SharedState,
    session_id: &SessionId,
    student_id: &StudentId,
    query: &str,
    reply: &str,
) {
    if let Err(e) = state
        .sessions
        .record(session_id, student_id, query, reply)
        .await
    {
        warn!(session = %session_id, student = %student_id, error = %e, "Session turn not recorded");
    }
}

async fn learning_summary_handler(
    State(state): State<SharedState>,
    Path(student_id): Path<String>,
) -> Result<Json<LearningSummaryResponse>, ApiError> {
    let tracking_summary = state
        .orchestrator
        .tracking_summary(&StudentId::from(&student_id))
        .await
        .map_err(api_error)?
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Student not found"))?;

    Ok(Json(LearningSummaryResponse { tracking_summary }))
}

async fn save_basic_summary_handler(
    State(state): State<SharedState>,
    Json(payload): Json<SaveBasicSummaryRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let student_id = payload
        .student_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let (Some(student_id), false) = (student_id, payload.questions_answer.is_null()) else {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Missing student_id or questions_answer",
        ));
    };

    let student_id = StudentId::from(student_id);
    state
        .orchestrator
        .save_basic_summary(&student_id, &value_text(&payload.questions_answer))
        .await
        .map_err(api_error)?;

    info!(student = %student_id, "Basic summary saved");
    Ok(Json(MessageResponse {
        message: "Basic summary saved successfully".into(),
    }))
}

async fn student_handler(
    State(state): State<SharedState>,
    Path(student_id): Path<String>,
) -> Result<Json<StudentProfile>, ApiError> {
    state
        .orchestrator
        .profile(&StudentId::from(&student_id))
        .await
        .map_err(api_error)?
        .map(Json)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Student not found"))
}
