use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::normalizer::{NormalizationError, RawFields};
use super::result::RecommendationKind;
use super::service::AdvisoryService;

/// Form fields as posted by a browser: strings, or bare JSON numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldText {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct FieldsPayload(pub BTreeMap<String, FieldText>);

impl From<FieldsPayload> for RawFields {
    fn from(payload: FieldsPayload) -> Self {
        payload
            .0
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    FieldText::Text(text) => text,
                    FieldText::Number(number) => number.to_string(),
                };
                (key, text)
            })
            .collect()
    }
}

/// Router builder exposing one endpoint per recommendation form.
pub fn advisory_router(service: Arc<AdvisoryService>) -> Router {
    Router::new()
        .route("/api/v1/recommendations/crop", post(crop_handler))
        .route("/api/v1/recommendations/fertilizer", post(fertilizer_handler))
        .route("/api/v1/recommendations/yield", post(yield_handler))
        .with_state(service)
}

pub(crate) async fn crop_handler(
    State(service): State<Arc<AdvisoryService>>,
    axum::Json(payload): axum::Json<FieldsPayload>,
) -> Response {
    respond(&service, RecommendationKind::Crop, payload).await
}

pub(crate) async fn fertilizer_handler(
    State(service): State<Arc<AdvisoryService>>,
    axum::Json(payload): axum::Json<FieldsPayload>,
) -> Response {
    respond(&service, RecommendationKind::Fertilizer, payload).await
}

pub(crate) async fn yield_handler(
    State(service): State<Arc<AdvisoryService>>,
    axum::Json(payload): axum::Json<FieldsPayload>,
) -> Response {
    respond(&service, RecommendationKind::Yield, payload).await
}

async fn respond(
    service: &AdvisoryService,
    kind: RecommendationKind,
    payload: FieldsPayload,
) -> Response {
    let raw = RawFields::from(payload);
    match service.evaluate(kind, &raw).await {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => rejection(kind, &error),
    }
}

pub(crate) fn rejection(kind: RecommendationKind, error: &NormalizationError) -> Response {
    let payload = json!({
        "kind": kind.label(),
        "code": error.code(),
        "field": error.field().name(),
        "error": error.to_string(),
    });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}
