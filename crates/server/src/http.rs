//! HTTP endpoints

use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use portal_assist_core::RankedArticle;

use crate::metrics::{record_escalation, record_query_latency, record_request};
use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState, metrics: Option<metrics_exporter_prometheus::PrometheusHandle>) -> Router {
    let mut router = Router::new()
        .route("/api/ai-query", post(ai_query))
        .route("/api/recommendations", post(recommendations))
        .route("/health", get(health_check));

    if let Some(handle) = metrics {
        router = router.route(
            "/metrics",
            get(move || {
                let handle = handle.clone();
                async move { handle.render() }
            }),
        );
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Question request
#[derive(Debug, Deserialize)]
pub struct AiQuery {
    pub query: String,
}

/// Question response: answer text plus the escalation signal
#[derive(Debug, Serialize)]
pub struct AiResponse {
    pub answer: String,
    pub needs_operator: bool,
}

/// Recommendations request
#[derive(Debug, Deserialize)]
pub struct RecommendationsQuery {
    pub query: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    5
}

/// Recommendations response with full score breakdown
#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub articles: Vec<RankedArticle>,
}

/// Answer a user question
async fn ai_query(
    State(state): State<AppState>,
    Json(request): Json<AiQuery>,
) -> Result<Json<AiResponse>, StatusCode> {
    record_request("ai-query");
    tracing::info!(query = %request.query, "query received");

    let service = state.service();
    let answer = service.answer(&request.query).await;

    record_query_latency(answer.result.execution_time_ms);
    if answer.needs_operator {
        record_escalation();
    }

    Ok(Json(AiResponse {
        answer: answer.result.answer,
        needs_operator: answer.needs_operator,
    }))
}

/// Ranked articles for a query, with per-signal scores
async fn recommendations(
    State(state): State<AppState>,
    Json(request): Json<RecommendationsQuery>,
) -> Result<Json<RecommendationsResponse>, StatusCode> {
    record_request("recommendations");

    if request.top_n == 0 || request.top_n > 100 {
        return Err(StatusCode::BAD_REQUEST);
    }

    let service = state.service();
    let articles = service.recommendations(&request.query, request.top_n).await;

    Ok(Json(RecommendationsResponse { articles }))
}

/// Liveness probe
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let service = state.service();
    Json(serde_json::json!({
        "status": "ok",
        "articles": service.article_count(),
        "semantic": service.semantic_enabled(),
    }))
}
