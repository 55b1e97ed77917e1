//! Crop, fertilizer and yield recommendation engine.
//!
//! Raw form fields go through [`normalizer`] and then one of three stateless
//! evaluators. Crop and fertilizer decisions are ordered [`rules::RuleTable`]s;
//! yield is a base value scaled by multiplicative factors.

mod config;
pub mod crop;
pub mod domain;
pub mod fertilizer;
pub mod normalizer;
pub mod result;
pub mod router;
pub mod rules;
pub mod service;
pub mod yield_model;

#[cfg(test)]
mod tests;

pub use config::EngineConfig;
pub use domain::{
    Category, CropProfile, CropQuery, FertilizerCategory, FertilizerQuery, SoilSample,
    SoilTypeProfile, WeatherReading, YieldQuery,
};
pub use normalizer::{
    normalize, normalize_for, Field, NormalizationError, NormalizedInput, RangeBound, RawFields,
};
pub use result::{
    Confidence, CropRecommendation, FertilizerRecommendation, RecommendationKind,
    RecommendationResult, YieldFactors, YieldRecommendation, YIELD_UNIT,
};
pub use router::advisory_router;
pub use rules::RuleTableError;
pub use service::AdvisoryService;

use std::sync::OnceLock;

/// Stateless evaluator over a validated [`EngineConfig`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdvisoryEngine {
    config: EngineConfig,
}

impl AdvisoryEngine {
    pub fn new(config: EngineConfig) -> Result<Self, RuleTableError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Engine over the reference tables, shared process-wide.
    pub fn reference() -> &'static AdvisoryEngine {
        static ENGINE: OnceLock<AdvisoryEngine> = OnceLock::new();
        ENGINE.get_or_init(AdvisoryEngine::default)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn recommend_crop(&self, query: &CropQuery) -> CropRecommendation {
        crop::recommend_crop_with(&self.config.crop, query)
    }

    pub fn recommend_fertilizer(&self, query: &FertilizerQuery) -> FertilizerRecommendation {
        fertilizer::recommend_fertilizer_with(&self.config.fertilizer, query)
    }

    pub fn predict_yield(&self, query: &YieldQuery) -> YieldRecommendation {
        self.config.yield_model.predict(query)
    }

    /// Runs the evaluator for `kind` over an already normalized submission.
    pub fn evaluate(
        &self,
        kind: RecommendationKind,
        input: &NormalizedInput,
    ) -> Result<RecommendationResult, NormalizationError> {
        let result = match kind {
            RecommendationKind::Crop => {
                RecommendationResult::Crop(self.recommend_crop(&input.crop_query()?))
            }
            RecommendationKind::Fertilizer => RecommendationResult::Fertilizer(
                self.recommend_fertilizer(&input.fertilizer_query()?),
            ),
            RecommendationKind::Yield => {
                RecommendationResult::Yield(self.predict_yield(&input.yield_query()?))
            }
        };
        Ok(result)
    }

    /// Normalizes `raw` against the field set of `kind`, then evaluates it.
    pub fn recommend(
        &self,
        kind: RecommendationKind,
        raw: &RawFields,
    ) -> Result<RecommendationResult, NormalizationError> {
        let input = normalize_for(kind, raw)?;
        self.evaluate(kind, &input)
    }
}

/// Crop recommendation under the reference rules.
pub fn recommend_crop(query: &CropQuery) -> CropRecommendation {
    AdvisoryEngine::reference().recommend_crop(query)
}

/// Fertilizer recommendation under the reference rules.
pub fn recommend_fertilizer(query: &FertilizerQuery) -> FertilizerRecommendation {
    AdvisoryEngine::reference().recommend_fertilizer(query)
}

/// Yield estimate under the reference model.
pub fn predict_yield(query: &YieldQuery) -> YieldRecommendation {
    AdvisoryEngine::reference().predict_yield(query)
}
