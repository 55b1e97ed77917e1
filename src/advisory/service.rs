use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::normalizer::{normalize_for, NormalizationError, RawFields};
use super::result::{RecommendationKind, RecommendationResult};
use super::AdvisoryEngine;

/// Async front for the engine, optionally holding each answer back to mimic a
/// remote model call. Timeouts and cancellation are the caller's concern:
/// dropping the future abandons the evaluation.
#[derive(Debug, Clone)]
pub struct AdvisoryService {
    engine: Arc<AdvisoryEngine>,
    latency: Duration,
}

impl AdvisoryService {
    pub fn new(engine: AdvisoryEngine, latency: Duration) -> Self {
        Self {
            engine: Arc::new(engine),
            latency,
        }
    }

    pub fn engine(&self) -> &AdvisoryEngine {
        &self.engine
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub async fn evaluate(
        &self,
        kind: RecommendationKind,
        raw: &RawFields,
    ) -> Result<RecommendationResult, NormalizationError> {
        let input = normalize_for(kind, raw).map_err(|err| {
            warn!(
                kind = kind.label(),
                field = err.field().name(),
                code = err.code(),
                "rejected advisory input"
            );
            err
        })?;

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let result = self.engine.evaluate(kind, &input)?;
        debug!(
            kind = kind.label(),
            confidence = result.confidence().percent(),
            outcome = %result.summary(),
            "advisory evaluated"
        );
        Ok(result)
    }

    pub async fn crop(&self, raw: &RawFields) -> Result<RecommendationResult, NormalizationError> {
        self.evaluate(RecommendationKind::Crop, raw).await
    }

    pub async fn fertilizer(
        &self,
        raw: &RawFields,
    ) -> Result<RecommendationResult, NormalizationError> {
        self.evaluate(RecommendationKind::Fertilizer, raw).await
    }

    pub async fn yield_estimate(
        &self,
        raw: &RawFields,
    ) -> Result<RecommendationResult, NormalizationError> {
        self.evaluate(RecommendationKind::Yield, raw).await
    }
}

impl Default for AdvisoryService {
    fn default() -> Self {
        Self::new(AdvisoryEngine::default(), Duration::ZERO)
    }
}
