//! EmoS Engine - Lifestyle risk assessment and depression screening
//!
//! The engine turns a self-reported lifestyle profile into an assessment
//! report through a deterministic pipeline: validation → feature derivation
//! → risk classification → wellness scoring → recommendations. It also
//! scores the nine-item PHQ-9 questionnaire.
//!
//! ## Modules
//!
//! - **Assessment Pipeline**: Profile to [`AssessmentReport`] via a trained classifier
//! - **PHQ-9 Screening**: Questionnaire scoring and severity banding

pub mod classifier;
pub mod config;
pub mod encoder;
pub mod error;
pub mod features;
pub mod phq9;
pub mod pipeline;
pub mod recommendations;
pub mod types;
pub mod wellness;

#[cfg(feature = "cli")]
pub mod telemetry;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use classifier::{Predictor, RiskModel};
pub use config::{ConfigError, EngineConfig};
pub use error::AssessmentError;
pub use phq9::{Phq9Result, Phq9Severity};
pub use pipeline::{phq9_from_json, phq9_to_json, AssessmentEngine};
pub use types::{ActivityLevel, AssessmentReport, LifestyleProfile, RiskLabel};

/// Engine version embedded in all report envelopes
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report envelopes
pub const PRODUCER_NAME: &str = "emos-engine";
