use crate::api::commands::{run_analyze, run_batch, run_vocabulary};
use crate::api::infra::parse_date;
use crate::api::server;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::screening::{EvaluationMode, Pregnancy};
use crate::telemetry::{self, LogOutput};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Diabetes Screening",
    about = "Evaluate patient intake against the diabetes screening knowledge base",
    version
)]
struct Cli {
    /// Knowledge base JSON document (defaults to the bundled rules)
    #[arg(long, global = true)]
    knowledge_base: Option<PathBuf>,
    /// How multi-field conditions are read: first-entry or all-entries
    #[arg(long, global = true)]
    condition_mode: Option<EvaluationMode>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Analyse a single patient and print the report
    Analyze(AnalyzeArgs),
    /// Analyse every patient in a CSV export
    Batch(BatchArgs),
    /// List canonical vocabulary entries
    Vocabulary(VocabularyArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Intake JSON document; replaces the individual field flags
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Patient full name ("First Last")
    #[arg(long, required_unless_present = "input")]
    pub(crate) name: Option<String>,
    #[arg(long, default_value_t = 0)]
    pub(crate) age: u32,
    /// Reported symptom (repeatable)
    #[arg(long = "symptom")]
    pub(crate) symptoms: Vec<String>,
    /// Fasting plasma glucose in mg/dL
    #[arg(long, default_value_t = 0.0)]
    pub(crate) fasting_glucose: f64,
    /// HbA1c in percent
    #[arg(long, default_value_t = 0.0)]
    pub(crate) hba1c: f64,
    /// Random plasma glucose in mg/dL (omit when not measured)
    #[arg(long)]
    pub(crate) random_glucose: Option<f64>,
    /// yes or no
    #[arg(long, default_value = "no")]
    pub(crate) pregnancy: Pregnancy,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) bmi: f64,
    /// Risk factor (repeatable)
    #[arg(long = "risk-factor")]
    pub(crate) risk_factors: Vec<String>,
    /// Report date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Emit the analysis as JSON instead of the printable report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file with one patient per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct VocabularyArgs {
    #[arg(value_enum)]
    pub(crate) list: VocabularyList,
    /// Case-insensitive substring filter
    #[arg(long)]
    pub(crate) search: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum VocabularyList {
    Symptoms,
    RiskFactors,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    if let Some(path) = cli.knowledge_base {
        config.screening.knowledge_base = Some(path);
    }
    if let Some(mode) = cli.condition_mode {
        config.screening.condition_mode = mode;
    }

    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(config, args).await,
        Command::Analyze(args) => {
            telemetry::init(&config.telemetry, LogOutput::Stderr)?;
            run_analyze(&config, args)
        }
        Command::Batch(args) => {
            telemetry::init(&config.telemetry, LogOutput::Stderr)?;
            run_batch(&config, args)
        }
        Command::Vocabulary(args) => {
            telemetry::init(&config.telemetry, LogOutput::Stderr)?;
            run_vocabulary(&config, args)
        }
    }
}
