//! Soil test history: CSV import, retest scheduling and a dosage plan per sample.

mod parser;

pub use parser::parse_date;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use crate::advisory::{NormalizationError, SoilSample};

/// Organic carbon percentage above which the lighter dosage plan applies.
const ORGANIC_CARBON_THRESHOLD: f64 = 0.7;

#[derive(Debug, thiserror::Error)]
pub enum SoilHistoryImportError {
    #[error("failed to read soil history: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid soil history CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {reason}")]
    InvalidDate { row: usize, reason: String },
    #[error("row {row} (test {test_id}): {source}")]
    InvalidSample {
        row: usize,
        test_id: String,
        source: NormalizationError,
    },
}

/// One laboratory soil test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilTestRecord {
    pub test_id: String,
    pub date: NaiveDate,
    pub lab: String,
    pub sample: SoilSample,
    pub next_test_due: NaiveDate,
}

/// Time left until a retest, counted in calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "months")]
pub enum NextTestStatus {
    InMonths(u32),
    DueNow,
}

impl NextTestStatus {
    pub fn label(self) -> String {
        match self {
            NextTestStatus::InMonths(months) => format!("{months} months"),
            NextTestStatus::DueNow => "due now".to_string(),
        }
    }
}

/// Compares year and month only; the day of month is ignored.
pub fn next_test_status(due: NaiveDate, today: NaiveDate) -> NextTestStatus {
    let months = (due.year() - today.year()) * 12 + (due.month() as i32 - today.month() as i32);
    if months > 0 {
        NextTestStatus::InMonths(months as u32)
    } else {
        NextTestStatus::DueNow
    }
}

/// Per-acre product quantities for the season, in kg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DosagePlan {
    pub urea_kg_per_acre: u16,
    pub dap_kg_per_acre: u16,
    pub potash_kg_per_acre: u16,
}

/// Soils richer in organic carbon get the lighter plan. A sample without an
/// organic carbon reading gets the heavier one.
pub fn dosage_plan(sample: &SoilSample) -> DosagePlan {
    let carbon_rich = sample
        .organic_carbon
        .map(|carbon| carbon > ORGANIC_CARBON_THRESHOLD)
        .unwrap_or(false);

    if carbon_rich {
        DosagePlan {
            urea_kg_per_acre: 45,
            dap_kg_per_acre: 20,
            potash_kg_per_acre: 15,
        }
    } else {
        DosagePlan {
            urea_kg_per_acre: 50,
            dap_kg_per_acre: 25,
            potash_kg_per_acre: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoilHistoryEntry {
    pub record: SoilTestRecord,
    pub next_test: NextTestStatus,
    pub dosage: DosagePlan,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoilHistoryReport {
    pub today: NaiveDate,
    pub entries: Vec<SoilHistoryEntry>,
    /// Retest status of the most recent test, if any.
    pub next_test: Option<NextTestStatus>,
}

/// Soil tests ordered most recent first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoilHistory {
    records: Vec<SoilTestRecord>,
}

impl SoilHistory {
    pub fn new(mut records: Vec<SoilTestRecord>) -> Self {
        records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.test_id.cmp(&b.test_id)));
        Self { records }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SoilHistoryImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SoilHistoryImportError> {
        parser::parse_records(reader).map(Self::new)
    }

    pub fn records(&self) -> &[SoilTestRecord] {
        &self.records
    }

    pub fn latest(&self) -> Option<&SoilTestRecord> {
        self.records.first()
    }

    pub fn report(&self, today: NaiveDate) -> SoilHistoryReport {
        let entries = self
            .records
            .iter()
            .map(|record| SoilHistoryEntry {
                record: record.clone(),
                next_test: next_test_status(record.next_test_due, today),
                dosage: dosage_plan(&record.sample),
            })
            .collect();

        SoilHistoryReport {
            today,
            entries,
            next_test: self
                .latest()
                .map(|record| next_test_status(record.next_test_due, today)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn sample(organic_carbon: Option<f64>) -> SoilSample {
        SoilSample {
            nitrogen: 280.0,
            phosphorus: 22.0,
            potassium: 180.0,
            ph: Some(7.1),
            organic_carbon,
        }
    }

    #[test]
    fn counts_calendar_months_until_retest() {
        let today = date(2025, 10, 30);
        assert_eq!(
            next_test_status(date(2026, 4, 1), today),
            NextTestStatus::InMonths(6)
        );
        assert_eq!(
            next_test_status(date(2025, 11, 1), today),
            NextTestStatus::InMonths(1)
        );
    }

    #[test]
    fn same_or_past_month_is_due_now() {
        let today = date(2025, 10, 1);
        assert_eq!(
            next_test_status(date(2025, 10, 31), today),
            NextTestStatus::DueNow
        );
        assert_eq!(
            next_test_status(date(2024, 12, 15), today),
            NextTestStatus::DueNow
        );
    }

    #[test]
    fn carbon_rich_soil_gets_lighter_dosage() {
        assert_eq!(dosage_plan(&sample(Some(0.82))).urea_kg_per_acre, 45);
        assert_eq!(dosage_plan(&sample(Some(0.7))).urea_kg_per_acre, 50);
        assert_eq!(dosage_plan(&sample(None)).potash_kg_per_acre, 20);
    }

    #[test]
    fn history_orders_most_recent_first() {
        let older = SoilTestRecord {
            test_id: "ST-1".to_string(),
            date: date(2024, 3, 10),
            lab: "District Lab".to_string(),
            sample: sample(Some(0.5)),
            next_test_due: date(2025, 3, 10),
        };
        let newer = SoilTestRecord {
            test_id: "ST-2".to_string(),
            date: date(2025, 3, 12),
            lab: "District Lab".to_string(),
            sample: sample(Some(0.8)),
            next_test_due: date(2026, 3, 12),
        };

        let history = SoilHistory::new(vec![older, newer]);
        let report = history.report(date(2025, 10, 1));

        assert_eq!(report.entries[0].record.test_id, "ST-2");
        assert_eq!(report.next_test, Some(NextTestStatus::InMonths(5)));
        assert_eq!(report.entries[1].next_test, NextTestStatus::DueNow);
    }
}
