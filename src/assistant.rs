//! Keyword intent matching for the farm assistant chat.
//!
//! The presentation layer localizes the reply for the returned intent key.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantIntent {
    PredictYieldWheat,
    RecommendFertilizer,
    RecommendCrop,
    SoilPhInfo,
    Default,
}

impl AssistantIntent {
    pub const fn key(self) -> &'static str {
        match self {
            AssistantIntent::PredictYieldWheat => "predict_yield_wheat",
            AssistantIntent::RecommendFertilizer => "recommend_fertilizer",
            AssistantIntent::RecommendCrop => "recommend_crop",
            AssistantIntent::SoilPhInfo => "soil_ph_info",
            AssistantIntent::Default => "default",
        }
    }
}

impl fmt::Display for AssistantIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

struct KeywordRule {
    intent: AssistantIntent,
    keywords: &'static [&'static str],
}

// English, Punjabi and Hindi keywords. Order matters: first match wins.
const KEYWORD_RULES: [KeywordRule; 4] = [
    KeywordRule {
        intent: AssistantIntent::PredictYieldWheat,
        keywords: &["yield", "wheat", "ਝਾੜ", "उपज"],
    },
    KeywordRule {
        intent: AssistantIntent::RecommendFertilizer,
        keywords: &["fertilizer", "ਖਾਦ", "उर्वरक"],
    },
    KeywordRule {
        intent: AssistantIntent::RecommendCrop,
        keywords: &["crop", "next", "ਫਸਲ", "फसल"],
    },
    KeywordRule {
        intent: AssistantIntent::SoilPhInfo,
        keywords: &["ph", "soil", "ਮਿੱਟੀ"],
    },
];

/// Substring match on the lower-cased message.
pub fn classify_intent(message: &str) -> AssistantIntent {
    let lowered = message.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|rule| {
            rule.keywords
                .iter()
                .any(|keyword| lowered.contains(keyword))
        })
        .map(|rule| rule.intent)
        .unwrap_or(AssistantIntent::Default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_english_keywords_case_insensitively() {
        assert_eq!(
            classify_intent("What YIELD can I expect?"),
            AssistantIntent::PredictYieldWheat
        );
        assert_eq!(
            classify_intent("Which fertilizer should I buy"),
            AssistantIntent::RecommendFertilizer
        );
        assert_eq!(
            classify_intent("what should I plant next season"),
            AssistantIntent::RecommendCrop
        );
        assert_eq!(
            classify_intent("how acidic is my soil"),
            AssistantIntent::SoilPhInfo
        );
    }

    #[test]
    fn matches_punjabi_and_hindi_keywords() {
        assert_eq!(classify_intent("ਕਣਕ ਦਾ ਝਾੜ"), AssistantIntent::PredictYieldWheat);
        assert_eq!(classify_intent("उर्वरक बताओ"), AssistantIntent::RecommendFertilizer);
        assert_eq!(classify_intent("अगली फसल"), AssistantIntent::RecommendCrop);
        assert_eq!(classify_intent("ਮਿੱਟੀ ਦੀ ਜਾਂਚ"), AssistantIntent::SoilPhInfo);
    }

    #[test]
    fn earlier_rules_take_precedence() {
        assert_eq!(
            classify_intent("fertilizer for my wheat crop"),
            AssistantIntent::PredictYieldWheat
        );
        assert_eq!(
            classify_intent("soil fertilizer advice"),
            AssistantIntent::RecommendFertilizer
        );
    }

    #[test]
    fn unmatched_messages_fall_back_to_default() {
        assert_eq!(classify_intent("hello there"), AssistantIntent::Default);
        assert_eq!(classify_intent(""), AssistantIntent::Default);
        assert_eq!(AssistantIntent::Default.key(), "default");
    }
}
