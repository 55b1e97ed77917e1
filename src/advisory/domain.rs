use serde::{Deserialize, Serialize};
use std::fmt;

use super::rules::{Metric, MetricSource};

/// Closed enumeration parsed from a form select.
pub trait Category: Copy + Sized + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    /// Case-insensitive match against the display labels.
    fn from_label(raw: &str) -> Option<Self> {
        let needle = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.label().eq_ignore_ascii_case(needle))
    }

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|candidate| candidate.label()).collect()
    }
}

/// Crops offered by the recommendation and yield forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropProfile {
    Rice,
    Wheat,
    Maize,
    Cotton,
    Jute,
    Sugarcane,
    Pulses,
    Millets,
    Oilseeds,
}

impl Category for CropProfile {
    const ALL: &'static [Self] = &[
        CropProfile::Rice,
        CropProfile::Wheat,
        CropProfile::Maize,
        CropProfile::Cotton,
        CropProfile::Jute,
        CropProfile::Sugarcane,
        CropProfile::Pulses,
        CropProfile::Millets,
        CropProfile::Oilseeds,
    ];

    fn label(self) -> &'static str {
        match self {
            CropProfile::Rice => "Rice",
            CropProfile::Wheat => "Wheat",
            CropProfile::Maize => "Maize",
            CropProfile::Cotton => "Cotton",
            CropProfile::Jute => "Jute",
            CropProfile::Sugarcane => "Sugarcane",
            CropProfile::Pulses => "Pulses",
            CropProfile::Millets => "Millets",
            CropProfile::Oilseeds => "Oilseeds",
        }
    }
}

/// Soil texture classes used across the forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilTypeProfile {
    Alluvial,
    Black,
    Red,
    Laterite,
    Arid,
    Forest,
    Peat,
    Saline,
}

impl Category for SoilTypeProfile {
    const ALL: &'static [Self] = &[
        SoilTypeProfile::Alluvial,
        SoilTypeProfile::Black,
        SoilTypeProfile::Red,
        SoilTypeProfile::Laterite,
        SoilTypeProfile::Arid,
        SoilTypeProfile::Forest,
        SoilTypeProfile::Peat,
        SoilTypeProfile::Saline,
    ];

    fn label(self) -> &'static str {
        match self {
            SoilTypeProfile::Alluvial => "Alluvial",
            SoilTypeProfile::Black => "Black",
            SoilTypeProfile::Red => "Red",
            SoilTypeProfile::Laterite => "Laterite",
            SoilTypeProfile::Arid => "Arid",
            SoilTypeProfile::Forest => "Forest",
            SoilTypeProfile::Peat => "Peat",
            SoilTypeProfile::Saline => "Saline",
        }
    }
}

/// Fertilizer products the advisory can recommend or accept as "fertilizer used".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FertilizerCategory {
    #[serde(rename = "Urea")]
    Urea,
    #[serde(rename = "DAP")]
    DiammoniumPhosphate,
    #[serde(rename = "28-28-0")]
    NitrogenPhosphorusBlend,
    #[serde(rename = "20-20-20")]
    GeneralPurpose,
    #[serde(rename = "17-17-17")]
    Balanced,
    #[serde(rename = "Potash")]
    Potash,
}

impl FertilizerCategory {
    pub const fn nutrient_focus(self) -> &'static str {
        match self {
            FertilizerCategory::Urea => "nitrogen-heavy",
            FertilizerCategory::DiammoniumPhosphate => "phosphorus-heavy",
            FertilizerCategory::NitrogenPhosphorusBlend => "nitrogen/phosphorus blend",
            FertilizerCategory::GeneralPurpose => "general purpose",
            FertilizerCategory::Balanced => "balanced",
            FertilizerCategory::Potash => "potassium-heavy",
        }
    }
}

impl Category for FertilizerCategory {
    const ALL: &'static [Self] = &[
        FertilizerCategory::Urea,
        FertilizerCategory::DiammoniumPhosphate,
        FertilizerCategory::NitrogenPhosphorusBlend,
        FertilizerCategory::GeneralPurpose,
        FertilizerCategory::Balanced,
        FertilizerCategory::Potash,
    ];

    fn label(self) -> &'static str {
        match self {
            FertilizerCategory::Urea => "Urea",
            FertilizerCategory::DiammoniumPhosphate => "DAP",
            FertilizerCategory::NitrogenPhosphorusBlend => "28-28-0",
            FertilizerCategory::GeneralPurpose => "20-20-20",
            FertilizerCategory::Balanced => "17-17-17",
            FertilizerCategory::Potash => "Potash",
        }
    }
}

macro_rules! display_via_label {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )*
    };
}

display_via_label!(CropProfile, SoilTypeProfile, FertilizerCategory);

/// Nutrient and pH readings from a soil test, in kg/ha where applicable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilSample {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub ph: Option<f64>,
    pub organic_carbon: Option<f64>,
}

impl SoilSample {
    fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Nitrogen => Some(self.nitrogen),
            Metric::Phosphorus => Some(self.phosphorus),
            Metric::Potassium => Some(self.potassium),
            Metric::Ph => self.ph,
            Metric::OrganicCarbon => self.organic_carbon,
            Metric::Rainfall | Metric::Temperature | Metric::Humidity | Metric::Moisture => None,
        }
    }
}

/// Field conditions a signed-out farmer types in by hand.
///
/// Absent entirely when the caller already has a trusted weather source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub moisture_pct: Option<f64>,
}

impl WeatherReading {
    pub fn is_empty(&self) -> bool {
        self.temperature_c.is_none() && self.humidity_pct.is_none() && self.moisture_pct.is_none()
    }

    fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Temperature => self.temperature_c,
            Metric::Humidity => self.humidity_pct,
            Metric::Moisture => self.moisture_pct,
            _ => None,
        }
    }
}

/// Inputs of the crop recommendation form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropQuery {
    pub soil: SoilSample,
    pub rainfall_mm: f64,
    pub weather: Option<WeatherReading>,
}

impl MetricSource for CropQuery {
    fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Rainfall => Some(self.rainfall_mm),
            Metric::Temperature | Metric::Humidity | Metric::Moisture => {
                self.weather.and_then(|weather| weather.metric(metric))
            }
            _ => self.soil.metric(metric),
        }
    }
}

/// Inputs of the fertilizer recommendation form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FertilizerQuery {
    pub soil: SoilSample,
    pub soil_type: Option<SoilTypeProfile>,
    pub crop: Option<CropProfile>,
    pub weather: Option<WeatherReading>,
}

impl MetricSource for FertilizerQuery {
    fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Rainfall => None,
            Metric::Temperature | Metric::Humidity | Metric::Moisture => {
                self.weather.and_then(|weather| weather.metric(metric))
            }
            _ => self.soil.metric(metric),
        }
    }
}

/// Inputs of the yield prediction form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldQuery {
    pub region: String,
    pub soil_type: SoilTypeProfile,
    pub crop: CropProfile,
    pub rainfall_mm: f64,
    pub temperature_c: f64,
    pub fertilizer_used: FertilizerCategory,
    pub days_to_harvest: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_match_case_insensitively() {
        assert_eq!(CropProfile::from_label(" rice "), Some(CropProfile::Rice));
        assert_eq!(
            FertilizerCategory::from_label("dap"),
            Some(FertilizerCategory::DiammoniumPhosphate)
        );
        assert_eq!(
            SoilTypeProfile::from_label("LATERITE"),
            Some(SoilTypeProfile::Laterite)
        );
        assert_eq!(CropProfile::from_label("Barley"), None);
    }

    #[test]
    fn fertilizer_serializes_with_grade_labels() {
        let encoded = serde_json::to_string(&FertilizerCategory::NitrogenPhosphorusBlend)
            .expect("serializes");
        assert_eq!(encoded, "\"28-28-0\"");
    }

    #[test]
    fn crop_query_reports_missing_weather_metrics_as_absent() {
        let query = CropQuery {
            soil: SoilSample {
                nitrogen: 10.0,
                phosphorus: 20.0,
                potassium: 30.0,
                ph: Some(6.5),
                organic_carbon: None,
            },
            rainfall_mm: 120.0,
            weather: None,
        };

        assert_eq!(query.metric(Metric::Rainfall), Some(120.0));
        assert_eq!(query.metric(Metric::Potassium), Some(30.0));
        assert_eq!(query.metric(Metric::Temperature), None);
        assert_eq!(query.metric(Metric::OrganicCarbon), None);
    }
}
