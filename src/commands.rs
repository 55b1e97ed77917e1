use agri_advisor::advisory::{RawFields, RecommendationKind, RecommendationResult};
use agri_advisor::assistant::classify_intent;
use agri_advisor::config::AppConfig;
use agri_advisor::diagnosis::diagnose;
use agri_advisor::error::AppError;
use agri_advisor::soil::{SoilHistory, SoilHistoryReport};
use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum KindArg {
    Crop,
    Fertilizer,
    Yield,
}

impl From<KindArg> for RecommendationKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Crop => RecommendationKind::Crop,
            KindArg::Fertilizer => RecommendationKind::Fertilizer,
            KindArg::Yield => RecommendationKind::Yield,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Recommendation form to evaluate
    #[arg(value_enum)]
    pub(crate) kind: KindArg,
    /// Form field as key=value; repeat for each field
    #[arg(long = "field", value_parser = crate::infra::parse_field)]
    pub(crate) fields: Vec<(String, String)>,
    /// Print the full result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AskArgs {
    /// Chat message in English, Punjabi or Hindi
    #[arg(required = true)]
    pub(crate) message: Vec<String>,
}

#[derive(Args, Debug)]
pub(crate) struct DiagnoseArgs {
    /// File name of the uploaded leaf image
    pub(crate) image_name: String,
}

#[derive(Args, Debug)]
pub(crate) struct SoilHistoryArgs {
    /// Soil test CSV export
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Evaluation date for retest scheduling (defaults to today)
    #[arg(long, value_parser = agri_advisor::soil::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs { kind, fields, json } = args;
    let config = AppConfig::load()?;
    let engine = config.advisory.engine()?;

    let raw: RawFields = fields.into_iter().collect();
    let result = engine.recommend(kind.into(), &raw)?;

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(body) => println!("{body}"),
            Err(err) => println!("Result payload unavailable: {err}"),
        }
    } else {
        render_recommendation(&result);
    }
    Ok(())
}

fn render_recommendation(result: &RecommendationResult) {
    println!("{}", result.summary());
    match result {
        RecommendationResult::Crop(crop) => println!("- matched rule: {}", crop.matched_rule),
        RecommendationResult::Fertilizer(fertilizer) => {
            println!("- matched rule: {}", fertilizer.matched_rule)
        }
        RecommendationResult::Yield(estimate) => println!(
            "- base {:.0} kg/acre x rainfall {} x temperature {}",
            estimate.factors.base_kg_per_acre,
            estimate.factors.rainfall,
            estimate.factors.temperature
        ),
    }
}

pub(crate) fn run_ask(args: AskArgs) -> Result<(), AppError> {
    let message = args.message.join(" ");
    println!("{}", classify_intent(&message));
    Ok(())
}

pub(crate) fn run_diagnose(args: DiagnoseArgs) -> Result<(), AppError> {
    let report = diagnose(&args.image_name)?;
    println!("{} (confidence {})", report.label, report.confidence);
    println!("- {}", report.description);
    println!("- remedy: {}", report.remedy);
    Ok(())
}

pub(crate) fn run_soil_history(args: SoilHistoryArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let history = SoilHistory::from_path(&args.csv)?;
    render_soil_history(&history.report(today));
    Ok(())
}

fn render_soil_history(report: &SoilHistoryReport) {
    println!("Soil test history (evaluated {})", report.today);
    match report.next_test {
        Some(status) => println!("Next test: {}", status.label()),
        None => {
            println!("No soil tests recorded");
            return;
        }
    }

    for entry in &report.entries {
        let record = &entry.record;
        println!(
            "- {} on {} at {}: N {} / P {} / K {}",
            record.test_id,
            record.date,
            record.lab,
            record.sample.nitrogen,
            record.sample.phosphorus,
            record.sample.potassium
        );
        if let Some(ph) = record.sample.ph {
            println!("  pH {ph:.1}");
        }
        println!(
            "  dosage per acre: urea {} kg, DAP {} kg, potash {} kg",
            entry.dosage.urea_kg_per_acre,
            entry.dosage.dap_kg_per_acre,
            entry.dosage.potash_kg_per_acre
        );
        println!(
            "  retest due {} ({})",
            record.next_test_due,
            entry.next_test.label()
        );
    }
}
