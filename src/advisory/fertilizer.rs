use super::domain::{FertilizerCategory, FertilizerQuery};
use super::result::{Confidence, FertilizerRecommendation};
use super::rules::{Condition, Fallback, Metric, RuleTable, RuleTier};

const TIER_CONFIDENCE: Confidence = Confidence::fixed(94.7);

/// Reference fertilizer rules, keyed on N/P/K in kg/ha.
pub fn reference_fertilizer_table() -> RuleTable<FertilizerCategory> {
    RuleTable {
        tiers: vec![
            RuleTier::new(
                "high nitrogen need",
                vec![
                    Condition::above(Metric::Nitrogen, 60.0),
                    Condition::below(Metric::Phosphorus, 30.0),
                ],
                FertilizerCategory::Urea,
                TIER_CONFIDENCE,
            ),
            RuleTier::new(
                "high phosphorus need",
                vec![
                    Condition::above(Metric::Phosphorus, 60.0),
                    Condition::below(Metric::Nitrogen, 40.0),
                ],
                FertilizerCategory::DiammoniumPhosphate,
                TIER_CONFIDENCE,
            ),
            RuleTier::new(
                "nitrogen and phosphorus, low potassium",
                vec![
                    Condition::above(Metric::Nitrogen, 40.0),
                    Condition::above(Metric::Phosphorus, 40.0),
                    Condition::below(Metric::Potassium, 30.0),
                ],
                FertilizerCategory::NitrogenPhosphorusBlend,
                TIER_CONFIDENCE,
            ),
            RuleTier::new(
                "uniformly low nutrients",
                vec![
                    Condition::below(Metric::Nitrogen, 30.0),
                    Condition::below(Metric::Phosphorus, 30.0),
                    Condition::below(Metric::Potassium, 30.0),
                ],
                FertilizerCategory::GeneralPurpose,
                TIER_CONFIDENCE,
            ),
        ],
        fallback: Fallback::new(
            "balanced default",
            FertilizerCategory::Balanced,
            TIER_CONFIDENCE,
        ),
    }
}

pub fn recommend_fertilizer_with(
    table: &RuleTable<FertilizerCategory>,
    query: &FertilizerQuery,
) -> FertilizerRecommendation {
    let matched = table.evaluate(query);
    FertilizerRecommendation {
        fertilizer: *matched.outcome,
        confidence: matched.confidence,
        matched_rule: matched.label.to_string(),
        tier: matched.tier,
    }
}
