//! HTTP API v1: run agent turns against a project directory.
//!
//! Endpoints:
//!
//! - `GET  /v1/tools?project_path=...` List the tools a session would offer
//! - `POST /v1/turn`                   Run a turn to completion, return all events
//! - `POST /v1/turn/stream`            Run a turn, receive an SSE stream of events

use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;

use agentdev_agent::{RunReport, Session, StreamItem, spawn_turn};
use agentdev_core::event::{AgentEvent, EventLog};
use agentdev_core::tool::ToolDefinition;
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::SharedState;

/// Build the v1 API router.
pub fn v1_router(state: SharedState) -> Router {
    Router::new()
        .route("/tools", get(list_tools_handler))
        .route("/turn", post(turn_handler))
        .route("/turn/stream", post(turn_stream_handler))
        .with_state(state)
}

// ── DTOs ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    pub goal: String,
    #[serde(default)]
    pub project_path: Option<PathBuf>,
    #[serde(default)]
    pub max_rounds: Option<u32>,
    /// Prior history to continue from, e.g. after a clarifying question.
    #[serde(default)]
    pub history: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub session_id: String,
    pub events: Vec<AgentEvent>,
    pub report: RunReport,
}

#[derive(Debug, Deserialize)]
struct ToolsQuery {
    #[serde(default)]
    project_path: Option<PathBuf>,
}

#[derive(Serialize)]
struct ToolListResponse {
    /// The docs block exactly as the planner sees it.
    docs: String,
    tools: Vec<ToolDefinition>,
    count: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

// ── Sessions ──────────────────────────────────────────────────────────────

fn open_session(state: &SharedState, project_path: Option<PathBuf>) -> Result<Session, ApiError> {
    let root = project_path
        .or_else(|| state.default_root.clone())
        .ok_or_else(|| bad_request("project_path is required"))?;

    Session::open(&root, state.planner.clone()).map_err(|e| {
        warn!(root = %root.display(), error = %e, "Rejected project path");
        bad_request(e.to_string())
    })
}

fn prepare_turn(state: &SharedState, payload: &TurnRequest) -> Result<Session, ApiError> {
    if payload.goal.trim().is_empty() {
        return Err(bad_request("goal must not be empty"));
    }
    if payload.max_rounds == Some(0) {
        return Err(bad_request("max_rounds must be at least 1"));
    }
    open_session(state, payload.project_path.clone())
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn list_tools_handler(
    State(state): State<SharedState>,
    Query(query): Query<ToolsQuery>,
) -> Result<Json<ToolListResponse>, ApiError> {
    let session = open_session(&state, query.project_path)?;
    let tools = session.tools();
    Ok(Json(ToolListResponse {
        docs: tools.render_docs(),
        tools: tools.definitions(),
        count: tools.len(),
    }))
}

/// `POST /v1/turn`: Run a turn to completion and return everything at once.
async fn turn_handler(
    State(state): State<SharedState>,
    Json(payload): Json<TurnRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    let session = prepare_turn(&state, &payload)?;
    let session_id = Uuid::new_v4().to_string();
    let span = info_span!("turn", session_id = %session_id);

    let agent = session.agent(payload.max_rounds.unwrap_or(state.max_rounds));
    let log = EventLog::new();
    let report = agent
        .run(&payload.goal, payload.history.into(), &log)
        .instrument(span)
        .await;

    Ok(Json(TurnResponse {
        session_id,
        events: log.into_events(),
        report,
    }))
}

// ── SSE Streaming ─────────────────────────────────────────────────────────

/// `POST /v1/turn/stream`: Run a turn, receive an SSE stream of events.
///
/// One frame per event (`event:` is the event type, `data:` the event JSON),
/// then a final `end` frame carrying the run report, or `null` if the turn
/// died.
async fn turn_stream_handler(
    State(state): State<SharedState>,
    Json(payload): Json<TurnRequest>,
) -> Result<Sse<impl futures::Stream<Item = Result<SseEvent, Infallible>>>, ApiError> {
    let session = prepare_turn(&state, &payload)?;
    let session_id = Uuid::new_v4().to_string();
    let max_rounds = payload.max_rounds.unwrap_or(state.max_rounds);
    info!(session_id = %session_id, max_rounds, "Streaming turn");

    let agent = Arc::new(session.agent(max_rounds));
    let rx = spawn_turn(agent, payload.goal, payload.history.into());

    let stream = UnboundedReceiverStream::new(rx).map(|item| {
        let data = match &item {
            StreamItem::Event(event) => serde_json::to_string(event),
            StreamItem::End(report) => serde_json::to_string(report),
        }
        .unwrap_or_default();
        Ok(SseEvent::default().event(item.event_type()).data(data))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GatewayState;
    use crate::test_support::MockPlanner;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const FINISH: &str =
        r#"{"thought":"Nothing to do.","action":{"tool_name":"finish","arguments":{"reason":"All done."}}}"#;

    fn app(replies: &[&str], default_root: Option<PathBuf>) -> Router {
        crate::build_router(Arc::new(GatewayState {
            planner: Arc::new(MockPlanner::new(replies)),
            max_rounds: 3,
            default_root,
        }))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn turn_runs_to_finish() {
        let dir = tempfile::tempdir().unwrap();
        let write = r#"{"thought":"Create it.","action":{"tool_name":"write_file","arguments":{"file_path":"hello.txt","content":"hi"}}}"#;
        let app = app(&[write, FINISH], None);

        let response = app
            .oneshot(post_json(
                "/v1/turn",
                serde_json::json!({"goal": "make hello", "project_path": dir.path()}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["report"]["outcome"]["status"], "finished");
        assert_eq!(json["report"]["outcome"]["reason"], "All done.");
        assert_eq!(json["report"]["rounds"], 2);
        let types: Vec<_> = json["events"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["type"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(types, ["thought", "action", "result", "thought", "status"]);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("hello.txt")).unwrap(),
            "hi"
        );
    }

    #[tokio::test]
    async fn turn_respects_request_budget() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&["no json here", "still none"], None);

        let response = app
            .oneshot(post_json(
                "/v1/turn",
                serde_json::json!({"goal": "g", "project_path": dir.path(), "max_rounds": 1}),
            ))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(
            json["report"]["outcome"],
            serde_json::json!({"status": "budget_exhausted", "rounds": 1})
        );
    }

    #[tokio::test]
    async fn seeded_history_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&[FINISH], None);

        let response = app
            .oneshot(post_json(
                "/v1/turn",
                serde_json::json!({
                    "goal": "g",
                    "project_path": dir.path(),
                    "history": ["User: the login page"],
                }),
            ))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["report"]["history"][0], "User: the login page");
    }

    #[tokio::test]
    async fn missing_project_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&[], None);

        let response = app
            .clone()
            .oneshot(post_json(
                "/v1/turn",
                serde_json::json!({"goal": "g", "project_path": dir.path().join("absent")}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());

        let response = app
            .oneshot(post_json("/v1/turn", serde_json::json!({"goal": "g"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_goal_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(&[], Some(dir.path().to_path_buf()))
            .oneshot(post_json("/v1/turn", serde_json::json!({"goal": "  "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn stream_emits_frames_then_end() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&[FINISH], Some(dir.path().to_path_buf()));

        let response = app
            .oneshot(post_json("/v1/turn/stream", serde_json::json!({"goal": "g"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "text/event-stream"
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();

        let events: Vec<_> = text
            .lines()
            .filter_map(|l| l.strip_prefix("event: "))
            .collect();
        assert_eq!(events, ["thought", "status", "end"]);
        assert!(text.contains(r#"data: {"type":"thought","content":"Nothing to do."}"#));
        assert!(text.contains(r#""status":"finished""#));
    }

    #[tokio::test]
    async fn tools_lists_default_registry() {
        let dir = tempfile::tempdir().unwrap();
        let uri = format!("/v1/tools?project_path={}", dir.path().display());
        let response = app(&[], None)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["count"], 9);
        assert!(json["docs"].as_str().unwrap().contains("read_file(file_path: string)"));
        assert_eq!(json["tools"][0]["name"], "get_project_summary");
    }
}
