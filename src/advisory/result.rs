use serde::{Deserialize, Serialize};
use std::fmt;

use super::domain::{Category, CropProfile, FertilizerCategory};
use super::normalizer::Field;
use super::rules::MatchedTier;

/// Unit of every yield estimate.
pub const YIELD_UNIT: &str = "kg/acre";

/// Percentage in `0..=100` attached to every recommendation.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("confidence {0} is outside 0..=100")]
pub struct ConfidenceError(pub f64);

impl Confidence {
    pub fn new(percent: f64) -> Result<Self, ConfidenceError> {
        if percent.is_finite() && (0.0..=100.0).contains(&percent) {
            Ok(Self(percent))
        } else {
            Err(ConfidenceError(percent))
        }
    }

    /// Only for literal reference constants known to be in range.
    pub(crate) const fn fixed(percent: f64) -> Self {
        Self(percent)
    }

    pub const fn percent(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = ConfidenceError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

/// The three recommendation forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Crop,
    Fertilizer,
    Yield,
}

impl RecommendationKind {
    pub const fn label(self) -> &'static str {
        match self {
            RecommendationKind::Crop => "crop",
            RecommendationKind::Fertilizer => "fertilizer",
            RecommendationKind::Yield => "yield",
        }
    }

    /// Fields a submission of this kind must carry, in reporting order.
    pub const fn required_fields(self) -> &'static [Field] {
        match self {
            RecommendationKind::Crop => &[
                Field::Nitrogen,
                Field::Phosphorus,
                Field::Potassium,
                Field::Ph,
                Field::Rainfall,
            ],
            RecommendationKind::Fertilizer => {
                &[Field::Nitrogen, Field::Phosphorus, Field::Potassium]
            }
            RecommendationKind::Yield => &[
                Field::Region,
                Field::SoilType,
                Field::Crop,
                Field::Rainfall,
                Field::Temperature,
                Field::FertilizerUsed,
                Field::DaysToHarvest,
            ],
        }
    }
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRecommendation {
    pub crop: CropProfile,
    pub confidence: Confidence,
    pub matched_rule: String,
    pub tier: MatchedTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FertilizerRecommendation {
    pub fertilizer: FertilizerCategory,
    pub confidence: Confidence,
    pub matched_rule: String,
    pub tier: MatchedTier,
}

/// Multipliers that produced a yield estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldFactors {
    pub base_kg_per_acre: f64,
    pub rainfall: f64,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldRecommendation {
    /// kg/acre, rounded to two decimals.
    pub estimate: f64,
    pub confidence: Confidence,
    pub factors: YieldFactors,
}

/// Output of any evaluator, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationResult {
    Crop(CropRecommendation),
    Fertilizer(FertilizerRecommendation),
    Yield(YieldRecommendation),
}

impl RecommendationResult {
    pub fn kind(&self) -> RecommendationKind {
        match self {
            RecommendationResult::Crop(_) => RecommendationKind::Crop,
            RecommendationResult::Fertilizer(_) => RecommendationKind::Fertilizer,
            RecommendationResult::Yield(_) => RecommendationKind::Yield,
        }
    }

    pub fn confidence(&self) -> Confidence {
        match self {
            RecommendationResult::Crop(crop) => crop.confidence,
            RecommendationResult::Fertilizer(fertilizer) => fertilizer.confidence,
            RecommendationResult::Yield(estimate) => estimate.confidence,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            RecommendationResult::Crop(crop) => format!(
                "recommended crop: {} (confidence {})",
                crop.crop.label(),
                crop.confidence
            ),
            RecommendationResult::Fertilizer(fertilizer) => format!(
                "recommended fertilizer: {} [{}] (confidence {})",
                fertilizer.fertilizer.label(),
                fertilizer.fertilizer.nutrient_focus(),
                fertilizer.confidence
            ),
            RecommendationResult::Yield(estimate) => format!(
                "estimated yield: {:.2} {} (confidence {})",
                estimate.estimate, YIELD_UNIT, estimate.confidence
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_rejects_values_outside_percentage_range() {
        assert!(Confidence::new(0.0).is_ok());
        assert!(Confidence::new(100.0).is_ok());
        assert_eq!(Confidence::new(100.5), Err(ConfidenceError(100.5)));
        assert!(Confidence::new(-1.0).is_err());
        assert!(Confidence::new(f64::NAN).is_err());
    }

    #[test]
    fn confidence_deserialization_is_range_checked() {
        let parsed: Result<Confidence, _> = serde_json::from_str("140.0");
        assert!(parsed.is_err());
        let parsed: Confidence = serde_json::from_str("92.5").expect("in range");
        assert_eq!(parsed.percent(), 92.5);
    }

    #[test]
    fn result_serializes_with_kind_tag() {
        let result = RecommendationResult::Crop(CropRecommendation {
            crop: CropProfile::Rice,
            confidence: Confidence::fixed(92.5),
            matched_rule: "rice".to_string(),
            tier: MatchedTier::Rule(0),
        });

        let value = serde_json::to_value(&result).expect("serializes");
        assert_eq!(value["kind"], "crop");
        assert_eq!(value["crop"], "Rice");
        assert_eq!(value["confidence"], 92.5);
        assert_eq!(value["tier"]["type"], "rule");
        assert_eq!(value["tier"]["index"], 0);
    }
}
