use crate::infra::{deserialize_optional_date, AppState};
use agri_advisor::advisory::{advisory_router, AdvisoryService};
use agri_advisor::assistant::{classify_intent, AssistantIntent};
use agri_advisor::diagnosis::{diagnose, DiagnosisReport};
use agri_advisor::error::AppError;
use agri_advisor::soil::{SoilHistory, SoilHistoryReport};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct IntentRequest {
    pub(crate) message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct IntentResponse {
    pub(crate) intent: AssistantIntent,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DiagnosisRequest {
    pub(crate) image_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SoilHistoryRequest {
    pub(crate) csv: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn with_advisory_routes(service: Arc<AdvisoryService>) -> axum::Router {
    advisory_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/assistant/intent", post(intent_endpoint))
        .route("/api/v1/diagnosis", post(diagnosis_endpoint))
        .route("/api/v1/soil/history", post(soil_history_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn intent_endpoint(Json(payload): Json<IntentRequest>) -> Json<IntentResponse> {
    Json(IntentResponse {
        intent: classify_intent(&payload.message),
    })
}

pub(crate) async fn diagnosis_endpoint(
    Json(payload): Json<DiagnosisRequest>,
) -> Result<Json<DiagnosisReport>, AppError> {
    Ok(Json(diagnose(&payload.image_name)?))
}

pub(crate) async fn soil_history_endpoint(
    Json(payload): Json<SoilHistoryRequest>,
) -> Result<Json<SoilHistoryReport>, AppError> {
    let SoilHistoryRequest { csv, today } = payload;
    let history = SoilHistory::from_reader(Cursor::new(csv.into_bytes()))?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    Ok(Json(history.report(today)))
}
