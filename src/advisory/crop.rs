use super::domain::{CropProfile, CropQuery};
use super::result::{Confidence, CropRecommendation};
use super::rules::{Condition, Fallback, Metric, RuleTable, RuleTier};

const TIER_CONFIDENCE: Confidence = Confidence::fixed(92.5);

/// Reference crop rules:
///
/// 1. rainfall > 200 and P > 50 → Rice
/// 2. rainfall > 100 and K > 40 → Wheat
/// 3. rainfall > 50 and N > 80 → Maize
/// 4. otherwise → Cotton
pub fn reference_crop_table() -> RuleTable<CropProfile> {
    RuleTable {
        tiers: vec![
            RuleTier::new(
                "high rainfall, phosphorus rich",
                vec![
                    Condition::above(Metric::Rainfall, 200.0),
                    Condition::above(Metric::Phosphorus, 50.0),
                ],
                CropProfile::Rice,
                TIER_CONFIDENCE,
            ),
            RuleTier::new(
                "moderate rainfall, potassium rich",
                vec![
                    Condition::above(Metric::Rainfall, 100.0),
                    Condition::above(Metric::Potassium, 40.0),
                ],
                CropProfile::Wheat,
                TIER_CONFIDENCE,
            ),
            RuleTier::new(
                "light rainfall, nitrogen rich",
                vec![
                    Condition::above(Metric::Rainfall, 50.0),
                    Condition::above(Metric::Nitrogen, 80.0),
                ],
                CropProfile::Maize,
                TIER_CONFIDENCE,
            ),
        ],
        fallback: Fallback::new("low water default", CropProfile::Cotton, TIER_CONFIDENCE),
    }
}

pub fn recommend_crop_with(table: &RuleTable<CropProfile>, query: &CropQuery) -> CropRecommendation {
    let matched = table.evaluate(query);
    CropRecommendation {
        crop: *matched.outcome,
        confidence: matched.confidence,
        matched_rule: matched.label.to_string(),
        tier: matched.tier,
    }
}
