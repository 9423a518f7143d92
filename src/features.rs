//! Feature derivation
//!
//! This module maps a lifestyle profile onto the fixed-order feature vector the
//! risk classifier was trained on, including three derived features:
//! - Sleep efficiency
//! - Activity/stress ratio
//! - Sleep quality ratio

use crate::error::AssessmentError;
use crate::types::{FeatureVector, LifestyleProfile, FEATURE_COUNT};

/// Feature names in vector order, as recorded by the training run
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Sleep Duration",
    "Quality of Sleep",
    "Physical Activity Level",
    "Stress Level",
    "Heart Rate",
    "Daily Steps",
    "sleep_efficiency",
    "activity_stress_ratio",
    "sleep_quality_ratio",
];

/// Builder for classifier feature vectors
pub struct FeatureBuilder;

impl FeatureBuilder {
    /// Build the feature vector for a profile
    pub fn build(profile: &LifestyleProfile) -> Result<FeatureVector, AssessmentError> {
        let activity_level = profile.physical_activity.numeric();
        let sleep_quality = f64::from(profile.sleep_quality);
        let stress_level = f64::from(profile.stress_level);

        let sleep_efficiency = compute_sleep_efficiency(profile.sleep_duration, sleep_quality);
        let activity_stress_ratio = compute_activity_stress_ratio(activity_level, stress_level);
        let sleep_quality_ratio = compute_sleep_quality_ratio(sleep_quality, profile.sleep_duration)?;

        Ok(FeatureVector([
            profile.sleep_duration,
            sleep_quality,
            activity_level,
            stress_level,
            f64::from(profile.heart_rate),
            f64::from(profile.daily_steps),
            sleep_efficiency,
            activity_stress_ratio,
            sleep_quality_ratio,
        ]))
    }
}

/// Sleep efficiency: duration weighted by quality on a 0-10 scale
fn compute_sleep_efficiency(sleep_duration: f64, sleep_quality: f64) -> f64 {
    sleep_duration * sleep_quality / 10.0
}

/// Activity level relative to stress; the +1 keeps zero stress defined
fn compute_activity_stress_ratio(activity_level: f64, stress_level: f64) -> f64 {
    activity_level / (stress_level + 1.0)
}

/// Sleep quality per hour slept
fn compute_sleep_quality_ratio(
    sleep_quality: f64,
    sleep_duration: f64,
) -> Result<f64, AssessmentError> {
    if sleep_duration == 0.0 {
        return Err(AssessmentError::DivisionUndefined(
            "sleep_quality_ratio requires a non-zero sleep_duration".to_string(),
        ));
    }
    Ok(sleep_quality / sleep_duration)
}
