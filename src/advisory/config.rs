use serde::{Deserialize, Serialize};

use super::crop::reference_crop_table;
use super::domain::{CropProfile, FertilizerCategory};
use super::fertilizer::reference_fertilizer_table;
use super::rules::{RuleTable, RuleTableError};
use super::yield_model::YieldModel;

/// Rule tables and yield model the engine evaluates against.
///
/// Every section is optional in a configuration file; omitted sections keep
/// the reference values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "reference_crop_table")]
    pub crop: RuleTable<CropProfile>,
    #[serde(default = "reference_fertilizer_table")]
    pub fertilizer: RuleTable<FertilizerCategory>,
    #[serde(default, rename = "yield")]
    pub yield_model: YieldModel,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), RuleTableError> {
        self.crop.validate()?;
        self.fertilizer.validate()?;
        self.yield_model.validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            crop: reference_crop_table(),
            fertilizer: reference_fertilizer_table(),
            yield_model: YieldModel::default(),
        }
    }
}
