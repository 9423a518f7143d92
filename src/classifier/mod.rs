//! Risk classification
//!
//! The classifier itself is trained offline and persisted as a model artifact.
//! This module defines the capability the engine depends on ([`Predictor`]),
//! the adapter that drives it and the concrete artifact-backed implementation.

mod artifact;
mod forest;
mod scaler;

pub use artifact::{FeatureImportance, RiskModel};
pub use forest::{DecisionTree, RandomForest, TreeNode};
pub use scaler::StandardScaler;

use crate::error::AssessmentError;
use crate::types::{FeatureVector, Prediction, RiskAssessment, FEATURE_COUNT};

/// A fitted scaler + classifier pair
pub trait Predictor: Send + Sync {
    /// Apply the fitted feature scaling
    fn scale(&self, features: &FeatureVector) -> Result<[f64; FEATURE_COUNT], AssessmentError>;

    /// Predict a label and class distribution for scaled features
    fn predict(&self, scaled: &[f64; FEATURE_COUNT]) -> Result<Prediction, AssessmentError>;
}

/// Classify a feature vector: scale first, then predict
pub fn classify(
    features: &FeatureVector,
    predictor: &dyn Predictor,
) -> Result<RiskAssessment, AssessmentError> {
    let scaled = predictor.scale(features)?;
    let prediction = predictor.predict(&scaled)?;

    Ok(RiskAssessment {
        label: prediction.label,
        confidence: prediction.probabilities.of(prediction.label),
        probabilities: prediction.probabilities,
    })
}
