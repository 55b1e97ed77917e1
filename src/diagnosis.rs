//! Leaf image diagnosis stub keyed on the uploaded file name.

use serde::{Deserialize, Serialize};

use crate::advisory::Confidence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disease {
    Healthy,
    LateBlight,
}

impl Disease {
    pub const fn label(self) -> &'static str {
        match self {
            Disease::Healthy => "Healthy",
            Disease::LateBlight => "Late Blight",
        }
    }

    const fn confidence(self) -> Confidence {
        match self {
            Disease::Healthy => Confidence::fixed(98.5),
            Disease::LateBlight => Confidence::fixed(95.2),
        }
    }

    const fn remedy(self) -> &'static str {
        match self {
            Disease::Healthy => "No action needed. Keep monitoring the crop.",
            Disease::LateBlight => {
                "Apply a fungicide containing mancozeb or chlorothalonil. \
                 Ensure proper spacing for air circulation."
            }
        }
    }

    const fn description(self) -> &'static str {
        match self {
            Disease::Healthy => {
                "The plant appears to be healthy with no visible signs of disease."
            }
            Disease::LateBlight => {
                "Late blight is a fungal disease that primarily affects potatoes and tomatoes, \
                 causing lesions on leaves, stems, and tubers."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisReport {
    pub disease: Disease,
    pub label: String,
    pub confidence: Confidence,
    pub remedy: String,
    pub description: String,
}

impl From<Disease> for DiagnosisReport {
    fn from(disease: Disease) -> Self {
        Self {
            disease,
            label: disease.label().to_string(),
            confidence: disease.confidence(),
            remedy: disease.remedy().to_string(),
            description: disease.description().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagnosisError {
    #[error("image name must not be empty")]
    EmptyImageName,
}

pub fn diagnose(image_name: &str) -> Result<DiagnosisReport, DiagnosisError> {
    let name = image_name.trim();
    if name.is_empty() {
        return Err(DiagnosisError::EmptyImageName);
    }

    let disease = if name.to_lowercase().contains("healthy") {
        Disease::Healthy
    } else {
        Disease::LateBlight
    };
    Ok(DiagnosisReport::from(disease))
}
