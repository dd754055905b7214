//! Dashboard API Server - JSON Routes, Health and Metrics
//!
//! Serves the session API for the dashboard UI via axum 0.7, together
//! with `/live`, `/ready` and (optionally) `/metrics` on the same listener.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::broadcast;
use tracing::{error, info, instrument};

use crate::adapters::ai::GeminiClient;
use crate::adapters::chain::{ChainBalances, NodeSigner, RouterOracle};
use crate::adapters::metrics::health::{self, HealthState};
use crate::adapters::metrics::MetricsRegistry;
use crate::domain::session::TradeInput;
use crate::domain::swap::{SwapError, SwapRecord};
use crate::domain::token::TokenSymbol;
use crate::usecases::advisor::AdvisorError;
use crate::usecases::dashboard::{Dashboard, DashboardView};
use crate::usecases::quote_engine::QuoteOutcome;

/// The production session service.
pub type LiveDashboard = Dashboard<RouterOracle, NodeSigner, ChainBalances, GeminiClient>;

/// Shared state for every handler.
#[derive(Clone)]
pub struct ApiState {
    pub dashboard: Arc<LiveDashboard>,
    pub metrics: Option<Arc<MetricsRegistry>>,
    pub health: HealthState,
}

/// JSON error body with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<SwapError> for ApiError {
    fn from(e: SwapError) -> Self {
        let status = match e {
            SwapError::ExecutionFailed(_) => StatusCode::BAD_GATEWAY,
            SwapError::SwapInProgress => StatusCode::CONFLICT,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self::new(status, e.to_string())
    }
}

impl From<AdvisorError> for ApiError {
    fn from(e: AdvisorError) -> Self {
        let status = match e {
            AdvisorError::PortfolioUnavailable => StatusCode::CONFLICT,
            AdvisorError::EmptyQuestion => StatusCode::BAD_REQUEST,
            AdvisorError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AdvisorError::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, e.to_string())
    }
}

/// Body of `POST /api/input`.
#[derive(Debug, Clone, Deserialize)]
pub struct InputRequest {
    pub from: TokenSymbol,
    pub to: TokenSymbol,
    #[serde(default)]
    pub amount: String,
    /// Keeps the current tolerance when omitted.
    pub slippage_percent: Option<Decimal>,
}

/// Response of `POST /api/input`.
#[derive(Debug, Serialize)]
pub struct InputResponse {
    /// `ready`, `cleared` or `superseded`.
    pub outcome: &'static str,
    pub state: DashboardView,
}

/// Response of `POST /api/swap`.
#[derive(Debug, Serialize)]
pub struct SwapResponse {
    pub record: SwapRecord,
    pub state: DashboardView,
}

/// Body of `POST /api/ask`. No question requests a general review.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskRequest {
    pub question: Option<String>,
}

fn outcome_label(outcome: &QuoteOutcome) -> &'static str {
    match outcome {
        QuoteOutcome::Ready(_) => "ready",
        QuoteOutcome::Cleared { .. } => "cleared",
        QuoteOutcome::Superseded { .. } => "superseded",
    }
}

/// Build the API router.
pub fn router(state: ApiState) -> Router {
    let mut app = Router::new()
        .route("/api/state", get(get_state))
        .route("/api/connect", post(connect))
        .route("/api/demo", post(enter_demo))
        .route("/api/disconnect", post(disconnect))
        .route("/api/input", post(set_input))
        .route("/api/swap", post(swap))
        .route("/api/ask", post(ask))
        .route("/live", get(health::liveness))
        .route("/ready", get(ready));

    if state.metrics.is_some() {
        app = app.route("/metrics", get(metrics));
    }

    app.with_state(state)
}

/// Serve the API until shutdown is signalled.
#[instrument(skip(state, shutdown_rx))]
pub async fn serve(
    state: ApiState,
    bind_address: String,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "API server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await?;

    Ok(())
}

/// Count a quote under the mode reported back to the client.
fn observe_quote(metrics: Option<&MetricsRegistry>, after: &DashboardView, outcome: &QuoteOutcome) {
    if let Some(metrics) = metrics {
        metrics.record_quote(after.mode, outcome);
    }
}

/// Count a swap under the mode reported back to the client.
fn observe_swap(
    metrics: Option<&MetricsRegistry>,
    after: &DashboardView,
    result: &Result<SwapRecord, SwapError>,
    elapsed: Duration,
) {
    if let Some(metrics) = metrics {
        metrics.record_swap(after.mode, result, elapsed);
    }
}

async fn view(state: &ApiState) -> DashboardView {
    let view = state.dashboard.snapshot().await;
    if let Some(metrics) = &state.metrics {
        metrics.set_portfolio_value(view.valuation.total_value);
    }
    view
}

async fn get_state(State(state): State<ApiState>) -> Json<DashboardView> {
    Json(view(&state).await)
}

async fn connect(State(state): State<ApiState>) -> Result<Json<DashboardView>, ApiError> {
    state.dashboard.connect().await.map_err(|e| {
        error!(error = %e, "Wallet connection failed");
        ApiError::new(StatusCode::BAD_GATEWAY, format!("Wallet connection failed: {e}"))
    })?;
    Ok(Json(view(&state).await))
}

async fn enter_demo(State(state): State<ApiState>) -> Json<DashboardView> {
    state.dashboard.enter_demo().await;
    Json(view(&state).await)
}

async fn disconnect(State(state): State<ApiState>) -> Json<DashboardView> {
    state.dashboard.disconnect().await;
    Json(view(&state).await)
}

async fn set_input(
    State(state): State<ApiState>,
    Json(body): Json<InputRequest>,
) -> Json<InputResponse> {
    let slippage_percent = match body.slippage_percent {
        Some(percent) => percent,
        None => state.dashboard.snapshot().await.input.slippage_percent,
    };
    let input = TradeInput {
        from: body.from,
        to: body.to,
        amount: body.amount,
        slippage_percent,
    };

    let outcome = state.dashboard.set_input(input).await;
    let after = view(&state).await;
    observe_quote(state.metrics.as_deref(), &after, &outcome);

    Json(InputResponse {
        outcome: outcome_label(&outcome),
        state: after,
    })
}

async fn swap(State(state): State<ApiState>) -> Result<Json<SwapResponse>, ApiError> {
    let started = Instant::now();
    let result = state.dashboard.swap().await;
    let elapsed = started.elapsed();
    let after = view(&state).await;
    observe_swap(state.metrics.as_deref(), &after, &result, elapsed);

    let record = result?;
    Ok(Json(SwapResponse { record, state: after }))
}

async fn ask(
    State(state): State<ApiState>,
    Json(body): Json<AskRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = state.dashboard.ask(body.question.as_deref()).await;
    if let Some(metrics) = &state.metrics {
        metrics.record_assistant(&result);
    }
    Ok(Json(json!({ "answer": result? })))
}

async fn ready(State(state): State<ApiState>) -> impl IntoResponse {
    health::readiness(&state.health)
}

async fn metrics(State(state): State<ApiState>) -> Result<String, ApiError> {
    let Some(metrics) = &state.metrics else {
        return Err(ApiError::new(StatusCode::NOT_FOUND, "metrics disabled"));
    };
    metrics
        .encode()
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}
