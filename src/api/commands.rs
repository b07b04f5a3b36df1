use crate::api::cli::{AnalyzeArgs, BatchArgs, VocabularyArgs, VocabularyList};
use crate::api::infra::build_engine;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::screening::{
    AnalysisReport, BatchImporter, PatientIntake, PatientName, Recommendation,
};
use chrono::Local;
use std::collections::BTreeMap;

pub(crate) fn run_analyze(config: &AppConfig, args: AnalyzeArgs) -> Result<(), AppError> {
    let engine = build_engine(&config.screening)?;
    let generated_on = args.date.unwrap_or_else(|| Local::now().date_naive());
    let as_json = args.json;

    let intake = intake_from_args(args)?;
    let analysis = engine.analyze(intake)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!("{}", AnalysisReport::new(&analysis, generated_on));
    }

    Ok(())
}

pub(crate) fn run_batch(config: &AppConfig, args: BatchArgs) -> Result<(), AppError> {
    let engine = build_engine(&config.screening)?;
    let analyses = BatchImporter::from_path(&args.csv, &engine)?;

    println!("Batch screening: {} patient(s)", analyses.len());
    let mut tally: BTreeMap<&'static str, usize> = BTreeMap::new();
    for analysis in &analyses {
        println!(
            "- {}: {} finding(s); {}",
            analysis.patient.full_name(),
            analysis.matches.len(),
            analysis.message()
        );
        *tally.entry(recommendation_label(analysis.recommendation)).or_default() += 1;
    }

    if !tally.is_empty() {
        println!("\nRecommendations");
        for (label, count) in tally {
            println!("- {label}: {count}");
        }
    }

    Ok(())
}

pub(crate) fn run_vocabulary(config: &AppConfig, args: VocabularyArgs) -> Result<(), AppError> {
    let engine = build_engine(&config.screening)?;
    let knowledge = engine.knowledge();
    let query = args.search.unwrap_or_default();

    let entries = match args.list {
        VocabularyList::Symptoms => knowledge.search_symptoms(&query),
        VocabularyList::RiskFactors => knowledge.search_risk_factors(&query),
    };

    if entries.is_empty() {
        println!("No entries match '{query}'");
    }
    for entry in entries {
        println!("- {entry}");
    }

    Ok(())
}

fn intake_from_args(args: AnalyzeArgs) -> Result<PatientIntake, AppError> {
    if let Some(path) = args.input {
        let file = std::fs::File::open(path)?;
        return Ok(serde_json::from_reader(std::io::BufReader::new(file))?);
    }

    let name = PatientName::parse(args.name.as_deref().unwrap_or_default());
    Ok(PatientIntake {
        first_name: name.first_name,
        last_name: name.last_name,
        age: args.age,
        symptoms: args.symptoms,
        fasting_glucose: args.fasting_glucose,
        hba1c: args.hba1c,
        random_glucose: args.random_glucose,
        pregnancy: args.pregnancy,
        bmi: args.bmi,
        risk_factors: args.risk_factors,
    })
}

fn recommendation_label(recommendation: Recommendation) -> &'static str {
    match recommendation {
        Recommendation::DiabetesLikely => "diabetes likely",
        Recommendation::Prediabetes => "prediabetes",
        Recommendation::Emergency => "emergency",
        Recommendation::Monitor => "monitor",
    }
}
