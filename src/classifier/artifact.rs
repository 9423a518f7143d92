//! Persisted model artifact
//!
//! The offline training run exports one JSON document holding the fitted
//! scaler, the classifier, the feature list it was trained on and the feature
//! importance ranking. The artifact is loaded once and shared read-only.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::forest::RandomForest;
use super::scaler::StandardScaler;
use super::Predictor;
use crate::error::AssessmentError;
use crate::features::FEATURE_NAMES;
use crate::types::{FeatureVector, Prediction, FEATURE_COUNT};

/// Importance of one feature in the trained classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Classifier families the artifact can carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ClassifierModel {
    RandomForest(RandomForest),
}

/// Loaded model artifact: scaler + classifier
///
/// Deserialization always validates, so every `RiskModel` value is usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRiskModel")]
pub struct RiskModel {
    feature_names: Vec<String>,
    scaler: StandardScaler,
    model: ClassifierModel,
    feature_importance: Vec<FeatureImportance>,
}

/// Artifact as written on disk, before validation
#[derive(Deserialize)]
struct RawRiskModel {
    feature_names: Vec<String>,
    scaler: StandardScaler,
    model: ClassifierModel,
    #[serde(default)]
    feature_importance: Vec<FeatureImportance>,
}

impl TryFrom<RawRiskModel> for RiskModel {
    type Error = AssessmentError;

    fn try_from(raw: RawRiskModel) -> Result<Self, Self::Error> {
        let model = Self {
            feature_names: raw.feature_names,
            scaler: raw.scaler,
            model: raw.model,
            feature_importance: raw.feature_importance,
        };
        model.validate()?;
        Ok(model)
    }
}

impl RiskModel {
    /// Build a model from its parts, validating them
    pub fn new(
        scaler: StandardScaler,
        forest: RandomForest,
        feature_importance: Vec<FeatureImportance>,
    ) -> Result<Self, AssessmentError> {
        let model = Self {
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            scaler,
            model: ClassifierModel::RandomForest(forest),
            feature_importance,
        };
        model.validate()?;
        Ok(model)
    }

    /// Load and validate an artifact from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AssessmentError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            AssessmentError::ModelUnavailable(format!(
                "cannot read model artifact {}: {e}",
                path.display()
            ))
        })?;

        let model = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            trees = model.tree_count(),
            "loaded risk model"
        );
        Ok(model)
    }

    /// Parse and validate an artifact from JSON
    pub fn from_json(json: &str) -> Result<Self, AssessmentError> {
        serde_json::from_str(json).map_err(|e| {
            AssessmentError::ModelUnavailable(format!("corrupt model artifact: {e}"))
        })
    }

    /// Serialize the artifact to JSON
    pub fn to_json(&self) -> Result<String, AssessmentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), AssessmentError> {
        if self.feature_names.len() != FEATURE_COUNT
            || self
                .feature_names
                .iter()
                .zip(FEATURE_NAMES.iter())
                .any(|(actual, expected)| actual != expected)
        {
            return Err(AssessmentError::ModelUnavailable(format!(
                "model was trained on features {:?}, expected {:?}",
                self.feature_names, FEATURE_NAMES
            )));
        }

        self.scaler.validate()?;

        match &self.model {
            ClassifierModel::RandomForest(forest) => forest.validate()?,
        }

        Ok(())
    }

    /// Feature names in training order
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Number of trees in the ensemble
    pub fn tree_count(&self) -> usize {
        match &self.model {
            ClassifierModel::RandomForest(forest) => forest.trees.len(),
        }
    }

    /// Top `n` features by importance, descending
    pub fn top_features(&self, n: usize) -> Vec<FeatureImportance> {
        let mut ranked = self.feature_importance.clone();
        ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
        ranked.truncate(n);
        ranked
    }
}

impl Predictor for RiskModel {
    fn scale(&self, features: &FeatureVector) -> Result<[f64; FEATURE_COUNT], AssessmentError> {
        self.scaler.transform(features)
    }

    fn predict(&self, scaled: &[f64; FEATURE_COUNT]) -> Result<Prediction, AssessmentError> {
        match &self.model {
            ClassifierModel::RandomForest(forest) => forest.predict(scaled),
        }
    }
}
