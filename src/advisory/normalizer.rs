//! Validation of raw form fields into typed, bounded values.
//!
//! Normalization is all-or-nothing: the first offending field is reported and
//! no partially populated record escapes. Values are never clamped.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::domain::{
    Category, CropProfile, CropQuery, FertilizerCategory, FertilizerQuery, SoilSample,
    SoilTypeProfile, WeatherReading, YieldQuery,
};
use super::result::RecommendationKind;

/// Field name to raw string value, as submitted by a form.
pub type RawFields = BTreeMap<String, String>;

/// Every field the advisory forms can submit. Declaration order is the
/// order in which supplied fields are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Nitrogen,
    Phosphorus,
    Potassium,
    Ph,
    OrganicCarbon,
    Temperature,
    Humidity,
    Rainfall,
    Moisture,
    DaysToHarvest,
    Region,
    SoilType,
    Crop,
    FertilizerUsed,
}

impl Field {
    pub const ALL: [Field; 14] = [
        Field::Nitrogen,
        Field::Phosphorus,
        Field::Potassium,
        Field::Ph,
        Field::OrganicCarbon,
        Field::Temperature,
        Field::Humidity,
        Field::Rainfall,
        Field::Moisture,
        Field::DaysToHarvest,
        Field::Region,
        Field::SoilType,
        Field::Crop,
        Field::FertilizerUsed,
    ];

    /// Canonical name used in error reports.
    pub const fn name(self) -> &'static str {
        match self {
            Field::Nitrogen => "N",
            Field::Phosphorus => "P",
            Field::Potassium => "K",
            Field::Ph => "ph",
            Field::OrganicCarbon => "organic_carbon",
            Field::Temperature => "temperature",
            Field::Humidity => "humidity",
            Field::Rainfall => "rainfall",
            Field::Moisture => "moisture",
            Field::DaysToHarvest => "days_to_harvest",
            Field::Region => "region",
            Field::SoilType => "soil_type",
            Field::Crop => "crop",
            Field::FertilizerUsed => "fertilizer_used",
        }
    }

    /// Keys accepted from the different forms, canonical name first.
    const fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Nitrogen => &["N", "nitrogen"],
            Field::Phosphorus => &["P", "phosphorus", "phosphorous"],
            Field::Potassium => &["K", "potassium"],
            Field::Ph => &["ph"],
            Field::OrganicCarbon => &["organic_carbon", "organic_carbon_percent"],
            Field::Temperature => &["temperature", "temperature_celsius"],
            Field::Humidity => &["humidity"],
            Field::Rainfall => &["rainfall", "rainfall_mm"],
            Field::Moisture => &["moisture"],
            Field::DaysToHarvest => &["days_to_harvest"],
            Field::Region => &["region"],
            Field::SoilType => &["soil_type"],
            Field::Crop => &["crop", "crop_type"],
            Field::FertilizerUsed => &["fertilizer_used"],
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        let key = key.trim();
        Field::ALL.into_iter().find(|field| {
            field
                .aliases()
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(key))
        })
    }

    fn numeric_bounds(self) -> Option<NumericBounds> {
        let bounds = match self {
            Field::Nitrogen | Field::Phosphorus | Field::Potassium | Field::Rainfall => {
                NumericBounds::at_least(0.0)
            }
            Field::Ph => NumericBounds::between(0.0, 14.0),
            Field::OrganicCarbon | Field::Humidity | Field::Moisture => {
                NumericBounds::between(0.0, 100.0)
            }
            Field::Temperature => NumericBounds::between(-10.0, 55.0),
            Field::DaysToHarvest => NumericBounds {
                whole: true,
                ..NumericBounds::between(1.0, 730.0)
            },
            Field::Region | Field::SoilType | Field::Crop | Field::FertilizerUsed => return None,
        };
        Some(bounds)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy)]
struct NumericBounds {
    min: f64,
    max: Option<f64>,
    whole: bool,
}

impl NumericBounds {
    const fn at_least(min: f64) -> Self {
        Self {
            min,
            max: None,
            whole: false,
        }
    }

    const fn between(min: f64, max: f64) -> Self {
        Self {
            min,
            max: Some(max),
            whole: false,
        }
    }

    fn check(&self, field: Field, raw: &str) -> Result<f64, NormalizationError> {
        let parse_error = || NormalizationError::Parse {
            field,
            value: raw.to_string(),
        };

        let value = raw.trim().parse::<f64>().map_err(|_| parse_error())?;
        if !value.is_finite() || (self.whole && value.fract() != 0.0) {
            return Err(parse_error());
        }

        if value < self.min {
            return Err(NormalizationError::Range {
                field,
                value,
                bound: RangeBound::AtLeast(self.min),
            });
        }
        if let Some(max) = self.max {
            if value > max {
                return Err(NormalizationError::Range {
                    field,
                    value,
                    bound: RangeBound::AtMost(max),
                });
            }
        }

        Ok(value)
    }
}

/// Inclusive bound a numeric field violated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "limit")]
pub enum RangeBound {
    AtLeast(f64),
    AtMost(f64),
}

impl fmt::Display for RangeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeBound::AtLeast(min) => write!(f, ">= {min}"),
            RangeBound::AtMost(max) => write!(f, "<= {max}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizationError {
    #[error("required field `{field}` was not supplied")]
    MissingField { field: Field },
    #[error("field `{field}` is not a valid number: {value:?}")]
    Parse { field: Field, value: String },
    #[error("field `{field}` value {value} must be {bound}")]
    Range {
        field: Field,
        value: f64,
        bound: RangeBound,
    },
    #[error(
        "field `{field}` has unrecognised value {value:?} (expected one of: {})",
        .expected.join(", ")
    )]
    UnknownCategory {
        field: Field,
        value: String,
        expected: Vec<&'static str>,
    },
}

impl NormalizationError {
    pub fn field(&self) -> Field {
        match self {
            NormalizationError::MissingField { field }
            | NormalizationError::Parse { field, .. }
            | NormalizationError::Range { field, .. }
            | NormalizationError::UnknownCategory { field, .. } => *field,
        }
    }

    /// Stable machine-readable error code.
    pub const fn code(&self) -> &'static str {
        match self {
            NormalizationError::MissingField { .. } => "missing_field",
            NormalizationError::Parse { .. } => "parse_error",
            NormalizationError::Range { .. } => "range_error",
            NormalizationError::UnknownCategory { .. } => "unknown_category",
        }
    }
}

/// Validated, typed view of a form submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedInput {
    numeric: BTreeMap<Field, f64>,
    region: Option<String>,
    soil_type: Option<SoilTypeProfile>,
    crop: Option<CropProfile>,
    fertilizer_used: Option<FertilizerCategory>,
}

impl NormalizedInput {
    pub fn value(&self, field: Field) -> Option<f64> {
        self.numeric.get(&field).copied()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn soil_type(&self) -> Option<SoilTypeProfile> {
        self.soil_type
    }

    pub fn crop(&self) -> Option<CropProfile> {
        self.crop
    }

    pub fn fertilizer_used(&self) -> Option<FertilizerCategory> {
        self.fertilizer_used
    }

    fn require(&self, field: Field) -> Result<f64, NormalizationError> {
        self.value(field)
            .ok_or(NormalizationError::MissingField { field })
    }

    fn require_category<T>(value: Option<T>, field: Field) -> Result<T, NormalizationError> {
        value.ok_or(NormalizationError::MissingField { field })
    }

    pub fn soil_sample(&self) -> Result<SoilSample, NormalizationError> {
        Ok(SoilSample {
            nitrogen: self.require(Field::Nitrogen)?,
            phosphorus: self.require(Field::Phosphorus)?,
            potassium: self.require(Field::Potassium)?,
            ph: self.value(Field::Ph),
            organic_carbon: self.value(Field::OrganicCarbon),
        })
    }

    /// `None` when no weather field was supplied at all.
    pub fn weather(&self) -> Option<WeatherReading> {
        let reading = WeatherReading {
            temperature_c: self.value(Field::Temperature),
            humidity_pct: self.value(Field::Humidity),
            moisture_pct: self.value(Field::Moisture),
        };
        (!reading.is_empty()).then_some(reading)
    }

    pub fn crop_query(&self) -> Result<CropQuery, NormalizationError> {
        let soil = self.soil_sample()?;
        self.require(Field::Ph)?;
        Ok(CropQuery {
            soil,
            rainfall_mm: self.require(Field::Rainfall)?,
            weather: self.weather(),
        })
    }

    pub fn fertilizer_query(&self) -> Result<FertilizerQuery, NormalizationError> {
        Ok(FertilizerQuery {
            soil: self.soil_sample()?,
            soil_type: self.soil_type,
            crop: self.crop,
            weather: self.weather(),
        })
    }

    pub fn yield_query(&self) -> Result<YieldQuery, NormalizationError> {
        let region = self
            .region
            .clone()
            .ok_or(NormalizationError::MissingField {
                field: Field::Region,
            })?;
        Ok(YieldQuery {
            region,
            soil_type: Self::require_category(self.soil_type, Field::SoilType)?,
            crop: Self::require_category(self.crop, Field::Crop)?,
            rainfall_mm: self.require(Field::Rainfall)?,
            temperature_c: self.require(Field::Temperature)?,
            fertilizer_used: Self::require_category(self.fertilizer_used, Field::FertilizerUsed)?,
            days_to_harvest: self.require(Field::DaysToHarvest)? as u16,
        })
    }

    fn absorb(&mut self, field: Field, raw: &str) -> Result<(), NormalizationError> {
        match field {
            Field::Region => {
                let region = raw.split_whitespace().collect::<Vec<_>>().join(" ");
                if region.is_empty() {
                    return Err(NormalizationError::MissingField { field });
                }
                self.region = Some(region);
            }
            Field::SoilType => self.soil_type = Some(parse_category(field, raw)?),
            Field::Crop => self.crop = Some(parse_category(field, raw)?),
            Field::FertilizerUsed => self.fertilizer_used = Some(parse_category(field, raw)?),
            numeric => {
                if let Some(bounds) = numeric.numeric_bounds() {
                    let value = bounds.check(numeric, raw)?;
                    self.numeric.insert(numeric, value);
                }
            }
        }
        Ok(())
    }
}

fn parse_category<T: Category>(field: Field, raw: &str) -> Result<T, NormalizationError> {
    T::from_label(raw).ok_or_else(|| NormalizationError::UnknownCategory {
        field,
        value: raw.trim().to_string(),
        expected: T::labels(),
    })
}

/// Maps recognised keys onto fields. When several aliases of one field are
/// supplied, the first in key order wins. Unknown keys are ignored.
fn resolve_fields(raw: &RawFields) -> BTreeMap<Field, &str> {
    let mut resolved = BTreeMap::new();
    for (key, value) in raw {
        if let Some(field) = Field::from_key(key) {
            resolved.entry(field).or_insert(value.as_str());
        }
    }
    resolved
}

fn normalize_resolved(
    supplied: BTreeMap<Field, &str>,
) -> Result<NormalizedInput, NormalizationError> {
    let mut input = NormalizedInput::default();
    for (field, value) in supplied {
        input.absorb(field, value)?;
    }
    Ok(input)
}

/// Validates every recognised field present in `raw`.
pub fn normalize(raw: &RawFields) -> Result<NormalizedInput, NormalizationError> {
    normalize_resolved(resolve_fields(raw))
}

/// Like [`normalize`], but first requires the field set of `kind`.
pub fn normalize_for(
    kind: RecommendationKind,
    raw: &RawFields,
) -> Result<NormalizedInput, NormalizationError> {
    let supplied = resolve_fields(raw);
    if let Some(&field) = kind
        .required_fields()
        .iter()
        .find(|field| !supplied.contains_key(*field))
    {
        return Err(NormalizationError::MissingField { field });
    }
    normalize_resolved(supplied)
}
