use serde::{Deserialize, Serialize};

use super::domain::YieldQuery;
use super::result::{Confidence, YieldFactors, YieldRecommendation};
use super::rules::RuleTableError;

/// Picks `above` when the reading is strictly greater than `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorRule {
    pub threshold: f64,
    pub above: f64,
    pub otherwise: f64,
}

impl FactorRule {
    pub fn factor(&self, reading: f64) -> f64 {
        if reading > self.threshold {
            self.above
        } else {
            self.otherwise
        }
    }
}

/// Base yield scaled by independent rainfall and temperature multipliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldModel {
    pub base_kg_per_acre: f64,
    pub rainfall: FactorRule,
    pub temperature: FactorRule,
    pub confidence: Confidence,
}

impl Default for YieldModel {
    fn default() -> Self {
        Self {
            base_kg_per_acre: 2500.0,
            rainfall: FactorRule {
                threshold: 500.0,
                above: 1.2,
                otherwise: 0.8,
            },
            temperature: FactorRule {
                threshold: 20.0,
                above: 1.1,
                otherwise: 0.9,
            },
            confidence: Confidence::fixed(88.9),
        }
    }
}

impl YieldModel {
    pub fn validate(&self) -> Result<(), RuleTableError> {
        let parameters = [
            ("base_kg_per_acre", self.base_kg_per_acre),
            ("rainfall.above", self.rainfall.above),
            ("rainfall.otherwise", self.rainfall.otherwise),
            ("temperature.above", self.temperature.above),
            ("temperature.otherwise", self.temperature.otherwise),
        ];
        if let Some(&(parameter, _)) = parameters
            .iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(RuleTableError::InvalidYieldParameter { parameter });
        }

        for (parameter, threshold) in [
            ("rainfall.threshold", self.rainfall.threshold),
            ("temperature.threshold", self.temperature.threshold),
        ] {
            if !threshold.is_finite() {
                return Err(RuleTableError::InvalidYieldParameter { parameter });
            }
        }
        Ok(())
    }

    pub fn predict(&self, query: &YieldQuery) -> YieldRecommendation {
        let factors = YieldFactors {
            base_kg_per_acre: self.base_kg_per_acre,
            rainfall: self.rainfall.factor(query.rainfall_mm),
            temperature: self.temperature.factor(query.temperature_c),
        };
        let estimate = factors.base_kg_per_acre * factors.rainfall * factors.temperature;

        YieldRecommendation {
            estimate: round_to_hundredths(estimate),
            confidence: self.confidence,
            factors,
        }
    }
}

pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
