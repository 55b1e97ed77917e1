use super::common::*;
use crate::advisory::rules::MatchedTier;
use crate::advisory::{
    recommend_fertilizer, AdvisoryEngine, FertilizerCategory, RecommendationKind,
    RecommendationResult,
};

#[test]
fn aliased_form_fields_recommend_urea() {
    let result = AdvisoryEngine::reference()
        .recommend(RecommendationKind::Fertilizer, &fertilizer_fields())
        .expect("fertilizer form evaluates");

    match result {
        RecommendationResult::Fertilizer(fertilizer) => {
            assert_eq!(fertilizer.fertilizer, FertilizerCategory::Urea);
            assert_eq!(fertilizer.confidence.percent(), 94.7);
            assert_eq!(fertilizer.tier, MatchedTier::Rule(0));
        }
        other => panic!("expected fertilizer result, got {other:?}"),
    }
}

#[test]
fn each_tier_is_reachable() {
    let cases = [
        ((70.0, 20.0, 35.0), FertilizerCategory::Urea),
        ((30.0, 70.0, 35.0), FertilizerCategory::DiammoniumPhosphate),
        ((50.0, 50.0, 20.0), FertilizerCategory::NitrogenPhosphorusBlend),
        ((20.0, 20.0, 20.0), FertilizerCategory::GeneralPurpose),
        ((50.0, 50.0, 50.0), FertilizerCategory::Balanced),
    ];

    for ((nitrogen, phosphorus, potassium), expected) in cases {
        let recommendation =
            recommend_fertilizer(&fertilizer_query(nitrogen, phosphorus, potassium));
        assert_eq!(
            recommendation.fertilizer, expected,
            "N={nitrogen} P={phosphorus} K={potassium}"
        );
    }
}

#[test]
fn boundary_values_fall_through_to_the_next_tier() {
    // N == 60 misses Urea, lands on the N/P blend.
    assert_eq!(
        recommend_fertilizer(&fertilizer_query(60.0, 45.0, 10.0)).fertilizer,
        FertilizerCategory::NitrogenPhosphorusBlend
    );
    // P == 30 misses Urea.
    assert_eq!(
        recommend_fertilizer(&fertilizer_query(70.0, 30.0, 50.0)).fertilizer,
        FertilizerCategory::Balanced
    );
    // K == 30 misses both the blend and the general purpose tier.
    assert_eq!(
        recommend_fertilizer(&fertilizer_query(20.0, 20.0, 30.0)).fertilizer,
        FertilizerCategory::Balanced
    );
}

#[test]
fn fallback_reports_its_label() {
    let recommendation = recommend_fertilizer(&fertilizer_query(50.0, 50.0, 50.0));
    assert_eq!(recommendation.tier, MatchedTier::Fallback);
    assert_eq!(recommendation.matched_rule, "balanced default");
}
