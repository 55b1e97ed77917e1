use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;

use super::{SoilHistoryImportError, SoilTestRecord};
use crate::advisory::{normalize, RawFields};

#[derive(Debug, Deserialize)]
struct SoilTestRow {
    test_id: String,
    date: String,
    lab: String,
    ph: String,
    organic_carbon_percent: String,
    nitrogen_kg_ha: String,
    phosphorus_kg_ha: String,
    potassium_kg_ha: String,
    next_test_due: String,
}

impl SoilTestRow {
    fn raw_fields(&self) -> RawFields {
        [
            ("N", &self.nitrogen_kg_ha),
            ("P", &self.phosphorus_kg_ha),
            ("K", &self.potassium_kg_ha),
            ("ph", &self.ph),
            ("organic_carbon", &self.organic_carbon_percent),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Rows are 1-based and exclude the header in error reports.
pub(crate) fn parse_records<R: Read>(
    reader: R,
) -> Result<Vec<SoilTestRecord>, SoilHistoryImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<SoilTestRow>().enumerate() {
        let row = row?;
        let line = index + 1;

        let date = parse_date(&row.date)
            .map_err(|reason| SoilHistoryImportError::InvalidDate { row: line, reason })?;
        let next_test_due = parse_date(&row.next_test_due)
            .map_err(|reason| SoilHistoryImportError::InvalidDate { row: line, reason })?;

        let sample = normalize(&row.raw_fields())
            .and_then(|input| input.soil_sample())
            .map_err(|source| SoilHistoryImportError::InvalidSample {
                row: line,
                test_id: row.test_id.clone(),
                source,
            })?;

        records.push(SoilTestRecord {
            test_id: row.test_id,
            date,
            lab: row.lab,
            sample,
            next_test_due,
        });
    }

    Ok(records)
}
