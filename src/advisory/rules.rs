use serde::{Deserialize, Serialize};

use super::result::Confidence;

/// Numeric reading a rule condition can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Nitrogen,
    Phosphorus,
    Potassium,
    Ph,
    OrganicCarbon,
    Rainfall,
    Temperature,
    Humidity,
    Moisture,
}

/// Anything a rule table can be evaluated against.
pub trait MetricSource {
    fn metric(&self, metric: Metric) -> Option<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Above,
    Below,
}

/// Strict threshold test on a single metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub metric: Metric,
    pub comparison: Comparison,
    pub threshold: f64,
}

impl Condition {
    pub const fn above(metric: Metric, threshold: f64) -> Self {
        Self {
            metric,
            comparison: Comparison::Above,
            threshold,
        }
    }

    pub const fn below(metric: Metric, threshold: f64) -> Self {
        Self {
            metric,
            comparison: Comparison::Below,
            threshold,
        }
    }

    /// A metric the source does not carry never satisfies the condition.
    pub fn holds<S: MetricSource + ?Sized>(&self, source: &S) -> bool {
        match source.metric(self.metric) {
            Some(value) => match self.comparison {
                Comparison::Above => value > self.threshold,
                Comparison::Below => value < self.threshold,
            },
            None => false,
        }
    }
}

/// One ordered entry of a rule table: all conditions must hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTier<O> {
    pub label: String,
    pub conditions: Vec<Condition>,
    pub outcome: O,
    pub confidence: Confidence,
}

impl<O> RuleTier<O> {
    pub fn new(
        label: impl Into<String>,
        conditions: Vec<Condition>,
        outcome: O,
        confidence: Confidence,
    ) -> Self {
        Self {
            label: label.into(),
            conditions,
            outcome,
            confidence,
        }
    }

    fn matches<S: MetricSource + ?Sized>(&self, source: &S) -> bool {
        self.conditions
            .iter()
            .all(|condition| condition.holds(source))
    }
}

/// Terminal rule returned when no tier matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fallback<O> {
    pub label: String,
    pub outcome: O,
    pub confidence: Confidence,
}

impl<O> Fallback<O> {
    pub fn new(label: impl Into<String>, outcome: O, confidence: Confidence) -> Self {
        Self {
            label: label.into(),
            outcome,
            confidence,
        }
    }
}

/// Which entry of a table produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "index")]
pub enum MatchedTier {
    Rule(usize),
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch<'a, O> {
    pub tier: MatchedTier,
    pub label: &'a str,
    pub outcome: &'a O,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleTableError {
    #[error("rule `{label}` has no conditions and would shadow every later rule")]
    UnconditionalTier { label: String },
    #[error("rule `{label}` uses a non-finite threshold")]
    NonFiniteThreshold { label: String },
    #[error("yield model parameter `{parameter}` must be a finite, non-negative number")]
    InvalidYieldParameter { parameter: &'static str },
}

/// Ordered threshold rules evaluated top-down; the first matching tier wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTable<O> {
    pub(crate) tiers: Vec<RuleTier<O>>,
    pub(crate) fallback: Fallback<O>,
}

impl<O> RuleTable<O> {
    pub fn new(tiers: Vec<RuleTier<O>>, fallback: Fallback<O>) -> Result<Self, RuleTableError> {
        let table = Self { tiers, fallback };
        table.validate()?;
        Ok(table)
    }

    /// Tables deserialized from configuration bypass `new`, so loaders call this.
    pub fn validate(&self) -> Result<(), RuleTableError> {
        for tier in &self.tiers {
            if tier.conditions.is_empty() {
                return Err(RuleTableError::UnconditionalTier {
                    label: tier.label.clone(),
                });
            }
            if tier
                .conditions
                .iter()
                .any(|condition| !condition.threshold.is_finite())
            {
                return Err(RuleTableError::NonFiniteThreshold {
                    label: tier.label.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn tiers(&self) -> &[RuleTier<O>] {
        &self.tiers
    }

    pub fn fallback(&self) -> &Fallback<O> {
        &self.fallback
    }

    pub fn evaluate<S: MetricSource + ?Sized>(&self, source: &S) -> RuleMatch<'_, O> {
        self.tiers
            .iter()
            .enumerate()
            .find(|(_, tier)| tier.matches(source))
            .map(|(index, tier)| RuleMatch {
                tier: MatchedTier::Rule(index),
                label: tier.label.as_str(),
                outcome: &tier.outcome,
                confidence: tier.confidence,
            })
            .unwrap_or_else(|| RuleMatch {
                tier: MatchedTier::Fallback,
                label: self.fallback.label.as_str(),
                outcome: &self.fallback.outcome,
                confidence: self.fallback.confidence,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Readings(HashMap<Metric, f64>);

    impl MetricSource for Readings {
        fn metric(&self, metric: Metric) -> Option<f64> {
            self.0.get(&metric).copied()
        }
    }

    fn readings(values: &[(Metric, f64)]) -> Readings {
        Readings(values.iter().copied().collect())
    }

    fn confidence(value: f64) -> Confidence {
        Confidence::new(value).expect("valid confidence")
    }

    fn table() -> RuleTable<&'static str> {
        RuleTable::new(
            vec![
                RuleTier::new(
                    "wet",
                    vec![Condition::above(Metric::Rainfall, 100.0)],
                    "wet",
                    confidence(80.0),
                ),
                RuleTier::new(
                    "wet-and-rich",
                    vec![
                        Condition::above(Metric::Rainfall, 100.0),
                        Condition::above(Metric::Nitrogen, 50.0),
                    ],
                    "rich",
                    confidence(90.0),
                ),
            ],
            Fallback::new("dry", "dry", confidence(50.0)),
        )
        .expect("valid table")
    }

    #[test]
    fn first_matching_tier_wins_even_when_later_tiers_match() {
        let table = table();
        let outcome = table.evaluate(&readings(&[
            (Metric::Rainfall, 150.0),
            (Metric::Nitrogen, 80.0),
        ]));

        assert_eq!(outcome.tier, MatchedTier::Rule(0));
        assert_eq!(*outcome.outcome, "wet");
        assert_eq!(outcome.confidence, confidence(80.0));
    }

    #[test]
    fn thresholds_are_strict() {
        let table = table();
        let outcome = table.evaluate(&readings(&[(Metric::Rainfall, 100.0)]));
        assert_eq!(outcome.tier, MatchedTier::Fallback);
        assert_eq!(outcome.label, "dry");
    }

    #[test]
    fn missing_metrics_never_match() {
        let condition = Condition::below(Metric::Humidity, 40.0);
        assert!(!condition.holds(&readings(&[])));
        assert!(condition.holds(&readings(&[(Metric::Humidity, 10.0)])));
    }

    #[test]
    fn rejects_tiers_without_conditions() {
        let result = RuleTable::new(
            vec![RuleTier::new("always", Vec::new(), 1, confidence(10.0))],
            Fallback::new("never", 0, confidence(10.0)),
        );

        assert_eq!(
            result.unwrap_err(),
            RuleTableError::UnconditionalTier {
                label: "always".to_string()
            }
        );
    }

    #[test]
    fn rejects_non_finite_thresholds() {
        let result = RuleTable::new(
            vec![RuleTier::new(
                "nan",
                vec![Condition::above(Metric::Ph, f64::NAN)],
                1,
                confidence(10.0),
            )],
            Fallback::new("default", 0, confidence(10.0)),
        );

        assert!(matches!(
            result,
            Err(RuleTableError::NonFiniteThreshold { .. })
        ));
    }

    #[test]
    fn tables_round_trip_through_json_configuration() {
        let json = r#"{
            "tiers": [
                {
                    "label": "acidic",
                    "conditions": [{ "metric": "ph", "comparison": "below", "threshold": 5.5 }],
                    "outcome": "lime",
                    "confidence": 70.0
                }
            ],
            "fallback": { "label": "none", "outcome": "nothing", "confidence": 60.0 }
        }"#;

        let table: RuleTable<String> = serde_json::from_str(json).expect("table parses");
        table.validate().expect("table validates");
        let outcome = table.evaluate(&readings(&[(Metric::Ph, 4.8)]));
        assert_eq!(outcome.outcome, "lime");
    }
}
