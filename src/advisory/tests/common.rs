use axum::response::Response;
use serde_json::Value;

use crate::advisory::{
    normalize_for, CropQuery, FertilizerQuery, RawFields, RecommendationKind, SoilSample,
    YieldQuery,
};

pub(super) fn raw(pairs: &[(&str, &str)]) -> RawFields {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

pub(super) fn crop_fields() -> RawFields {
    raw(&[
        ("N", "90"),
        ("P", "60"),
        ("K", "45"),
        ("ph", "6.5"),
        ("rainfall", "250"),
        ("temperature", "28"),
        ("humidity", "80"),
    ])
}

pub(super) fn fertilizer_fields() -> RawFields {
    raw(&[
        ("nitrogen", "70"),
        ("phosphorous", "20"),
        ("potassium", "35"),
        ("soil_type", "Alluvial"),
        ("crop_type", "wheat"),
    ])
}

pub(super) fn yield_fields() -> RawFields {
    raw(&[
        ("region", "  Punjab   North "),
        ("soil_type", "Alluvial"),
        ("crop", "Wheat"),
        ("rainfall", "650"),
        ("temperature", "25"),
        ("fertilizer_used", "Urea"),
        ("days_to_harvest", "120"),
    ])
}

pub(super) fn soil(nitrogen: f64, phosphorus: f64, potassium: f64) -> SoilSample {
    SoilSample {
        nitrogen,
        phosphorus,
        potassium,
        ph: Some(6.8),
        organic_carbon: None,
    }
}

pub(super) fn crop_query(nitrogen: f64, phosphorus: f64, potassium: f64, rainfall: f64) -> CropQuery {
    CropQuery {
        soil: soil(nitrogen, phosphorus, potassium),
        rainfall_mm: rainfall,
        weather: None,
    }
}

pub(super) fn fertilizer_query(nitrogen: f64, phosphorus: f64, potassium: f64) -> FertilizerQuery {
    FertilizerQuery {
        soil: soil(nitrogen, phosphorus, potassium),
        soil_type: None,
        crop: None,
        weather: None,
    }
}

pub(super) fn yield_query(rainfall: f64, temperature: f64) -> YieldQuery {
    let mut fields = yield_fields();
    fields.insert("rainfall".to_string(), rainfall.to_string());
    fields.insert("temperature".to_string(), temperature.to_string());
    normalize_for(RecommendationKind::Yield, &fields)
        .and_then(|input| input.yield_query())
        .expect("yield fixture normalizes")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
