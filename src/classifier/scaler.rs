//! Feature scaling
//!
//! Standard scaling fitted offline: each position is centred on the training
//! mean and divided by the training standard deviation.

use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;
use crate::types::{FeatureVector, FEATURE_COUNT};

/// Per-feature affine normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Training mean per feature
    pub mean: Vec<f64>,
    /// Training standard deviation per feature
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Check the scaler matches the feature vector layout
    pub fn validate(&self) -> Result<(), AssessmentError> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(AssessmentError::ModelUnavailable(format!(
                "scaler must have {FEATURE_COUNT} mean and scale entries, got {} and {}",
                self.mean.len(),
                self.scale.len()
            )));
        }

        if self
            .mean
            .iter()
            .chain(self.scale.iter())
            .any(|v| !v.is_finite())
        {
            return Err(AssessmentError::ModelUnavailable(
                "scaler contains non-finite values".to_string(),
            ));
        }

        Ok(())
    }

    /// Scale a feature vector
    pub fn transform(&self, features: &FeatureVector) -> Result<[f64; FEATURE_COUNT], AssessmentError> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(AssessmentError::ModelUnavailable(format!(
                "scaler has {} mean and {} scale entries for {FEATURE_COUNT} features",
                self.mean.len(),
                self.scale.len()
            )));
        }

        let mut scaled = [0.0; FEATURE_COUNT];
        for (slot, ((value, mean), scale)) in scaled
            .iter_mut()
            .zip(features.0.iter().zip(&self.mean).zip(&self.scale))
        {
            *slot = scale_value(*value, *mean, *scale);
        }
        Ok(scaled)
    }
}

/// Constant training features have zero spread; treat their scale as 1
fn scale_value(value: f64, mean: f64, scale: f64) -> f64 {
    let scale = if scale == 0.0 { 1.0 } else { scale };
    (value - mean) / scale
}
