//! EmoS CLI - Command-line interface for the EmoS engine
//!
//! Commands:
//! - assess: Run a lifestyle assessment against the trained model
//! - phq9: Score a PHQ-9 questionnaire
//! - model: Inspect the model artifact
//! - doctor: Diagnose configuration and model health
//! - questions: Print the PHQ-9 questionnaire

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use emos_engine::config::{ConfigError, EngineConfig};
use emos_engine::encoder::ReportEncoder;
use emos_engine::phq9::{self, Phq9Result, PHQ9_OPTIONS, PHQ9_QUESTIONS};
use emos_engine::pipeline::phq9_from_json;
use emos_engine::telemetry::{self, TelemetryError};
use emos_engine::types::{ActivityLevel, AssessmentReport, LifestyleProfile};
use emos_engine::{AssessmentEngine, AssessmentError, RiskModel, ENGINE_VERSION, PRODUCER_NAME};

/// EmoS - Lifestyle risk assessment and PHQ-9 screening
#[derive(Parser)]
#[command(name = "emos")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Assess mental-health risk from lifestyle data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a lifestyle assessment
    Assess {
        /// Profile JSON file (use - for stdin); overrides the profile flags
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Model artifact path (defaults to EMOS_MODEL_PATH)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },

    /// Score a PHQ-9 questionnaire
    Phq9 {
        /// Nine comma-separated item scores, e.g. 0,1,2,0,1,0,0,1,0
        #[arg(short, long, value_delimiter = ',', required_unless_present = "input")]
        responses: Option<Vec<u8>>,

        /// Responses JSON file (use - for stdin)
        #[arg(short, long, conflicts_with = "responses")]
        input: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },

    /// Inspect the model artifact
    Model {
        /// Model artifact path (defaults to EMOS_MODEL_PATH)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Number of top features to list
        #[arg(long, default_value = "3")]
        top: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and model health
    Doctor {
        /// Model artifact path (defaults to EMOS_MODEL_PATH)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the PHQ-9 questionnaire
    Questions {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Lifestyle profile given as flags
#[derive(Args)]
struct ProfileArgs {
    /// Sleep per night (hours)
    #[arg(long, required_unless_present = "input")]
    sleep_duration: Option<f64>,

    /// Sleep quality (1-10)
    #[arg(long, required_unless_present = "input")]
    sleep_quality: Option<u8>,

    /// Physical activity level (low, moderate, high)
    #[arg(long, required_unless_present = "input")]
    physical_activity: Option<String>,

    /// Stress level (0-10)
    #[arg(long, required_unless_present = "input")]
    stress_level: Option<u8>,

    /// Resting heart rate (bpm)
    #[arg(long, default_value = "70")]
    heart_rate: u16,

    /// Average daily steps
    #[arg(long, default_value = "5000")]
    daily_steps: u32,

    /// Frequent mood swings
    #[arg(long)]
    mood_swings: bool,

    /// Daily screen time (hours)
    #[arg(long, default_value = "4.0")]
    screen_time: f64,

    /// Daily social interactions
    #[arg(long, default_value = "5")]
    social_interactions: u32,
}

impl ProfileArgs {
    fn into_profile(self) -> Result<LifestyleProfile, EmosCliError> {
        let physical_activity: ActivityLevel = self
            .physical_activity
            .ok_or(EmosCliError::MissingInput("--physical-activity"))?
            .parse()?;

        Ok(LifestyleProfile {
            sleep_duration: self
                .sleep_duration
                .ok_or(EmosCliError::MissingInput("--sleep-duration"))?,
            sleep_quality: self
                .sleep_quality
                .ok_or(EmosCliError::MissingInput("--sleep-quality"))?,
            physical_activity,
            stress_level: self
                .stress_level
                .ok_or(EmosCliError::MissingInput("--stress-level"))?,
            heart_rate: self.heart_rate,
            daily_steps: self.daily_steps,
            mood_swings: self.mood_swings,
            screen_time: self.screen_time,
            social_interactions: self.social_interactions,
        })
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Report envelope as pretty-printed JSON
    Json,
    /// Human-readable summary
    Text,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), EmosCliError> {
    let config = EngineConfig::from_env()?;
    telemetry::init(&config.log_level)?;

    match cli.command {
        Commands::Assess {
            input,
            profile,
            model,
            format,
        } => cmd_assess(input.as_deref(), profile, config.with_model_path(model), format),

        Commands::Phq9 {
            responses,
            input,
            format,
        } => cmd_phq9(responses, input.as_deref(), format),

        Commands::Model { model, top, json } => cmd_model(&config.with_model_path(model), top, json),

        Commands::Doctor { model, json } => cmd_doctor(&config.with_model_path(model), json),

        Commands::Questions { json } => cmd_questions(json),
    }
}

fn cmd_assess(
    input: Option<&Path>,
    profile_args: ProfileArgs,
    config: EngineConfig,
    format: OutputFormat,
) -> Result<(), EmosCliError> {
    let profile = match input {
        Some(path) => serde_json::from_str(&read_input(path)?)?,
        None => profile_args.into_profile()?,
    };

    let engine = AssessmentEngine::load(&config.model_path)?;
    let report = engine.assess(&profile)?;

    match format {
        OutputFormat::Json => println!("{}", ReportEncoder::new().assessment_to_json(&report)?),
        OutputFormat::Text => print_assessment(&report),
    }

    Ok(())
}

fn cmd_phq9(
    responses: Option<Vec<u8>>,
    input: Option<&Path>,
    format: OutputFormat,
) -> Result<(), EmosCliError> {
    let result = match (responses, input) {
        (Some(responses), _) => phq9::score(&responses)?,
        (None, Some(path)) => phq9_from_json(&read_input(path)?)?,
        (None, None) => return Err(EmosCliError::MissingInput("--responses or --input")),
    };

    match format {
        OutputFormat::Json => println!("{}", ReportEncoder::new().phq9_to_json(&result)?),
        OutputFormat::Text => print_phq9(&result),
    }

    Ok(())
}

fn cmd_model(config: &EngineConfig, top: usize, json: bool) -> Result<(), EmosCliError> {
    let model = RiskModel::from_path(&config.model_path)?;
    let info = ModelInfo {
        path: config.model_path.display().to_string(),
        trees: model.tree_count(),
        feature_names: model.feature_names().to_vec(),
        top_features: model
            .top_features(top)
            .into_iter()
            .map(|f| (f.feature, f.importance))
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Model: {}", info.path);
        println!("Trees: {}", info.trees);
        println!("\nTop {} features:", info.top_features.len());
        for (i, (feature, importance)) in info.top_features.iter().enumerate() {
            println!("  {}. {} ({:.3})", i + 1, feature, importance);
        }
    }

    Ok(())
}

fn cmd_doctor(config: &EngineConfig, json: bool) -> Result<(), EmosCliError> {
    let mut checks = Vec::new();

    checks.push(DoctorCheck {
        name: "version".to_string(),
        status: CheckStatus::Ok,
        message: format!("EmoS engine version {}", ENGINE_VERSION),
    });

    let log_check = match std::env::var("RUST_LOG") {
        Ok(filter) => DoctorCheck {
            name: "log_level".to_string(),
            status: CheckStatus::Warning,
            message: format!("RUST_LOG={} overrides EMOS_LOG_LEVEL={}", filter, config.log_level),
        },
        Err(_) => DoctorCheck {
            name: "log_level".to_string(),
            status: CheckStatus::Ok,
            message: format!("Log level: {}", config.log_level),
        },
    };
    checks.push(log_check);

    let model_check = if !config.model_path.exists() {
        DoctorCheck {
            name: "model".to_string(),
            status: CheckStatus::Error,
            message: format!("Model artifact not found at {}", config.model_path.display()),
        }
    } else {
        match RiskModel::from_path(&config.model_path) {
            Ok(model) => DoctorCheck {
                name: "model".to_string(),
                status: CheckStatus::Ok,
                message: format!(
                    "Model artifact valid ({} trees, {} features)",
                    model.tree_count(),
                    model.feature_names().len()
                ),
            },
            Err(e) => DoctorCheck {
                name: "model".to_string(),
                status: CheckStatus::Error,
                message: e.to_string(),
            },
        }
    };
    checks.push(model_check);

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (use flags or --input FILE)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (--input - ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: ENGINE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("EmoS Doctor Report");
        println!("==================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(EmosCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_questions(json: bool) -> Result<(), EmosCliError> {
    if json {
        let payload = serde_json::json!({
            "questions": PHQ9_QUESTIONS,
            "options": PHQ9_OPTIONS,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Over the last 2 weeks, how often have you been bothered by any of the following problems?");
    println!();
    for (i, question) in PHQ9_QUESTIONS.iter().enumerate() {
        println!("{}. {}", i + 1, question);
    }
    println!();
    println!("Answer each item with:");
    for (score, option) in PHQ9_OPTIONS.iter().enumerate() {
        println!("  {} = {}", score, option);
    }

    Ok(())
}

// Helper functions

fn read_input(path: &Path) -> Result<String, EmosCliError> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn print_assessment(report: &AssessmentReport) {
    println!("Risk:       {} ({:.1}% confidence)", report.risk.label, report.risk.confidence * 100.0);
    println!("  low risk  {:.1}%", report.risk.probabilities.low_risk * 100.0);
    println!("  high risk {:.1}%", report.risk.probabilities.high_risk * 100.0);
    println!("Wellness:   {}/100 ({:?})", report.wellness_score, report.wellness_band);
    println!("Sleep:      {:?}", report.sleep_quality_rating);

    if report.recommendations.is_empty() {
        println!("\nNo recommendations - keep it up.");
    } else {
        println!("\nRecommendations:");
        for (i, rec) in report.recommendations.iter().enumerate() {
            println!("  {}. {}", i + 1, rec);
        }
    }
}

fn print_phq9(result: &Phq9Result) {
    println!("PHQ-9 score: {}/{}", result.score, result.max_score);
    println!("Severity:    {}", result.severity);
    println!("{}", result.interpretation());
    println!("\nRecommendations:");
    for rec in &result.recommendations {
        println!("  - {}", rec);
    }
}

// Error types

#[derive(Debug)]
enum EmosCliError {
    Io(io::Error),
    Assessment(AssessmentError),
    Json(serde_json::Error),
    Config(ConfigError),
    Telemetry(TelemetryError),
    MissingInput(&'static str),
    DoctorFailed,
}

impl From<io::Error> for EmosCliError {
    fn from(e: io::Error) -> Self {
        EmosCliError::Io(e)
    }
}

impl From<AssessmentError> for EmosCliError {
    fn from(e: AssessmentError) -> Self {
        EmosCliError::Assessment(e)
    }
}

impl From<serde_json::Error> for EmosCliError {
    fn from(e: serde_json::Error) -> Self {
        EmosCliError::Json(e)
    }
}

impl From<ConfigError> for EmosCliError {
    fn from(e: ConfigError) -> Self {
        EmosCliError::Config(e)
    }
}

impl From<TelemetryError> for EmosCliError {
    fn from(e: TelemetryError) -> Self {
        EmosCliError::Telemetry(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<EmosCliError> for CliError {
    fn from(e: EmosCliError) -> Self {
        match e {
            EmosCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            EmosCliError::Assessment(e) => {
                let hint = match &e {
                    AssessmentError::InvalidInput(_) => "Check value ranges; run 'emos questions' for PHQ-9 items",
                    AssessmentError::DivisionUndefined(_) => "Sleep duration must be greater than zero",
                    AssessmentError::ModelUnavailable(_) => "Set EMOS_MODEL_PATH or pass --model; run 'emos doctor'",
                    AssessmentError::JsonError(_) => "Check JSON syntax and field names",
                };
                CliError {
                    code: e.code().to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            EmosCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            EmosCliError::Config(e) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check EMOS_* environment variables and .env".to_string()),
            },
            EmosCliError::Telemetry(e) => CliError {
                code: "TELEMETRY_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check EMOS_LOG_LEVEL or RUST_LOG".to_string()),
            },
            EmosCliError::MissingInput(what) => CliError {
                code: "MISSING_INPUT".to_string(),
                message: format!("Missing {}", what),
                hint: Some("Pass the flag or use --input FILE".to_string()),
            },
            EmosCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ModelInfo {
    path: String,
    trees: usize,
    feature_names: Vec<String>,
    top_features: Vec<(String, f64)>,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
