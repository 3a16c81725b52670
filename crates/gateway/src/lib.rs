//! HTTP API gateway for AgentDev.
//!
//! Exposes a health check and the v1 turn API. Every turn request names its
//! own project directory and gets its own session; the gateway holds no
//! per-project state between requests.
//!
//! Built on Axum for high performance async HTTP.

pub mod api_v1;

use std::path::PathBuf;
use std::sync::Arc;

use agentdev_core::planner::Planner;
use axum::extract::DefaultBodyLimit;
use axum::http::{Method, header};
use axum::{Router, response::Json, routing::get};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared application state for the gateway.
pub struct GatewayState {
    /// Planner shared by all sessions. Planners are stateless between calls.
    pub planner: Arc<dyn Planner>,
    /// Round budget for requests that do not set one.
    pub max_rounds: u32,
    /// Project used when a request omits `project_path`.
    pub default_root: Option<PathBuf>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the full router: `/health` plus the v1 API.
///
/// Layers applied:
/// - Request body size limit (1 MB)
/// - CORS for browser front-ends (GET/POST, JSON bodies)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/v1", api_v1::v1_router(state))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
///
/// The planner is built once from config and shared by every session.
pub async fn start(config: agentdev_config::AppConfig) -> agentdev_core::Result<()> {
    config
        .validate()
        .map_err(|e| agentdev_core::Error::config(e.to_string()))?;
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let planner = agentdev_providers::build_from_config(&config)?;
    let state = Arc::new(GatewayState {
        planner,
        max_rounds: config.agent.max_rounds,
        default_root: config.sandbox.root.clone(),
    });

    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use agentdev_core::error::PlannerError;
    use agentdev_core::planner::Planner;

    /// Lightweight scripted planner for gateway tests.
    pub struct MockPlanner {
        replies: Mutex<VecDeque<String>>,
    }

    impl MockPlanner {
        pub fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            }
        }
    }

    #[async_trait::async_trait]
    impl Planner for MockPlanner {
        fn name(&self) -> &str {
            "gateway_mock"
        }

        async fn plan(&self, _prompt: &str) -> Result<String, PlannerError> {
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or(PlannerError::EmptyResponse)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdev_core::error::PlannerError;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_state() -> SharedState {
        Arc::new(GatewayState {
            planner: Arc::new(test_support::MockPlanner::new(&[])),
            max_rounds: 3,
            default_root: None,
        })
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = build_router(test_state());

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = build_router(test_state());
        let req = Request::builder()
            .uri("/create-agent")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn start_rejects_bad_config_before_binding() {
        let mut config = agentdev_config::AppConfig::default();
        config.agent.max_rounds = 0;
        let err = start(config).await.unwrap_err();
        assert!(matches!(err, agentdev_core::Error::Config { .. }), "{err}");

        let mut config = agentdev_config::AppConfig::default();
        config.planner.provider = "nowhere".into();
        config.planner.api_url = None;
        let err = start(config).await.unwrap_err();
        assert!(matches!(
            err,
            agentdev_core::Error::Planner(PlannerError::NotConfigured(_))
        ));
    }
}
