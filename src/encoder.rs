//! Report encoding
//!
//! This module wraps assessment and screening results into JSON envelopes
//! carrying producer metadata and the computation timestamp.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AssessmentError;
use crate::phq9::Phq9Result;
use crate::types::AssessmentReport;
use crate::{ENGINE_VERSION, PRODUCER_NAME};

/// Schema tag for lifestyle assessment envelopes
pub const ASSESSMENT_SCHEMA: &str = "emos.assessment.v1";

/// Schema tag for PHQ-9 envelopes
pub const PHQ9_SCHEMA: &str = "emos.phq9.v1";

/// Producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Producer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Envelope around a single result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEnvelope<T> {
    pub schema: String,
    pub producer: Producer,
    pub computed_at_utc: String,
    pub result: T,
}

/// Encoder for result envelopes
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Wrap an assessment report
    pub fn encode_assessment(&self, report: &AssessmentReport) -> ReportEnvelope<AssessmentReport> {
        self.envelope(ASSESSMENT_SCHEMA, report.clone())
    }

    /// Wrap a PHQ-9 result
    pub fn encode_phq9(&self, result: &Phq9Result) -> ReportEnvelope<Phq9Result> {
        self.envelope(PHQ9_SCHEMA, result.clone())
    }

    /// Encode an assessment report to JSON
    pub fn assessment_to_json(&self, report: &AssessmentReport) -> Result<String, AssessmentError> {
        serde_json::to_string_pretty(&self.encode_assessment(report)).map_err(AssessmentError::JsonError)
    }

    /// Encode a PHQ-9 result to JSON
    pub fn phq9_to_json(&self, result: &Phq9Result) -> Result<String, AssessmentError> {
        serde_json::to_string_pretty(&self.encode_phq9(result)).map_err(AssessmentError::JsonError)
    }

    fn envelope<T>(&self, schema: &str, result: T) -> ReportEnvelope<T> {
        ReportEnvelope {
            schema: schema.to_string(),
            producer: Producer {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            result,
        }
    }
}
