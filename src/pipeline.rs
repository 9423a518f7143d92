//! Pipeline orchestration
//!
//! This module provides the public API of the engine. It orchestrates a
//! lifestyle assessment from profile to report, and exposes JSON entry points
//! for shells that speak JSON only.

use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use crate::classifier::{classify, Predictor, RiskModel};
use crate::encoder::ReportEncoder;
use crate::error::AssessmentError;
use crate::features::FeatureBuilder;
use crate::phq9::{self, PHQ9_MAX_ITEM_SCORE};
use crate::recommendations::RecommendationEngine;
use crate::types::{AssessmentReport, LifestyleProfile, SleepQualityRating, WellnessBand};
use crate::wellness::WellnessScorer;

/// Score PHQ-9 responses given as JSON and return an encoded result.
///
/// Accepts a bare array (`[0, 1, ...]`) or an object (`{"responses": [...]}`).
///
/// # Example
/// ```ignore
/// let json = phq9_to_json("[0, 1, 2, 0, 1, 0, 0, 1, 0]")?;
/// ```
pub fn phq9_to_json(responses_json: &str) -> Result<String, AssessmentError> {
    let result = phq9_from_json(responses_json)?;
    ReportEncoder::new().phq9_to_json(&result)
}

/// Score PHQ-9 responses given as JSON, in either accepted shape
pub fn phq9_from_json(responses_json: &str) -> Result<phq9::Phq9Result, AssessmentError> {
    let request: Phq9Request = serde_json::from_str(responses_json)?;
    phq9::score(&request.responses()?)
}

/// Raw responses are read as wide integers so out-of-range items are
/// reported per item rather than as a parse failure.
#[derive(Deserialize)]
#[serde(untagged)]
enum Phq9Request {
    Bare(Vec<i64>),
    Wrapped { responses: Vec<i64> },
}

impl Phq9Request {
    fn responses(self) -> Result<Vec<u8>, AssessmentError> {
        let raw = match self {
            Phq9Request::Bare(responses) => responses,
            Phq9Request::Wrapped { responses } => responses,
        };

        raw.into_iter()
            .enumerate()
            .map(|(index, value)| {
                u8::try_from(value)
                    .ok()
                    .filter(|item| *item <= PHQ9_MAX_ITEM_SCORE)
                    .ok_or_else(|| {
                        AssessmentError::InvalidInput(format!(
                            "PHQ-9 response {} must be between 0 and {PHQ9_MAX_ITEM_SCORE}, got {value}",
                            index + 1
                        ))
                    })
            })
            .collect()
    }
}

/// Assessment context holding the loaded predictor.
///
/// Construct once at startup and share; clones reuse the same predictor.
#[derive(Clone)]
pub struct AssessmentEngine {
    predictor: Arc<dyn Predictor>,
    encoder: Arc<ReportEncoder>,
}

impl AssessmentEngine {
    /// Load the persisted model artifact and build an engine around it
    pub fn load(model_path: impl AsRef<Path>) -> Result<Self, AssessmentError> {
        let model = RiskModel::from_path(model_path)?;
        Ok(Self::with_predictor(model))
    }

    /// Build an engine around any predictor
    pub fn with_predictor(predictor: impl Predictor + 'static) -> Self {
        Self {
            predictor: Arc::new(predictor),
            encoder: Arc::new(ReportEncoder::new()),
        }
    }

    /// Run a full lifestyle assessment.
    ///
    /// Stages:
    /// 1. Validate the profile
    /// 2. FeatureBuilder - build the classifier feature vector
    /// 3. classify - scale and predict
    /// 4. WellnessScorer - point-based wellness score
    /// 5. RecommendationEngine - ordered advisories
    pub fn assess(&self, profile: &LifestyleProfile) -> Result<AssessmentReport, AssessmentError> {
        profile.validate()?;

        let features = FeatureBuilder::build(profile)?;
        let risk = classify(&features, self.predictor.as_ref())?;

        let wellness_score = WellnessScorer::score(profile);
        let recommendations = RecommendationEngine::recommend(profile, risk.label);

        tracing::debug!(
            risk = %risk.label,
            confidence = risk.confidence,
            wellness_score,
            recommendations = recommendations.len(),
            "assessment complete"
        );

        Ok(AssessmentReport {
            risk,
            wellness_score,
            wellness_band: WellnessBand::from_score(wellness_score),
            sleep_quality_rating: SleepQualityRating::from_quality(profile.sleep_quality),
            recommendations,
        })
    }

    /// Assess a profile given as JSON and return an encoded report
    pub fn assess_json(&self, profile_json: &str) -> Result<String, AssessmentError> {
        let profile: LifestyleProfile = serde_json::from_str(profile_json)?;
        let report = self.assess(&profile)?;
        self.encoder.assessment_to_json(&report)
    }

    /// Score PHQ-9 responses; independent of the loaded model
    pub fn screen_phq9(&self, responses: &[u8]) -> Result<phq9::Phq9Result, AssessmentError> {
        phq9::score(responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        ActivityLevel, ClassProbabilities, FeatureVector, Prediction, RiskLabel, FEATURE_COUNT,
    };

    /// Predictor that always returns the same label
    struct FixedPredictor(RiskLabel);

    impl Predictor for FixedPredictor {
        fn scale(&self, features: &FeatureVector) -> Result<[f64; FEATURE_COUNT], AssessmentError> {
            Ok(features.0)
        }

        fn predict(&self, _scaled: &[f64; FEATURE_COUNT]) -> Result<Prediction, AssessmentError> {
            let probabilities = match self.0 {
                RiskLabel::LowRisk => ClassProbabilities {
                    low_risk: 0.9,
                    high_risk: 0.1,
                },
                RiskLabel::HighRisk => ClassProbabilities {
                    low_risk: 0.3,
                    high_risk: 0.7,
                },
            };
            Ok(Prediction {
                label: self.0,
                probabilities,
            })
        }
    }

    fn sample_profile() -> LifestyleProfile {
        LifestyleProfile {
            sleep_duration: 7.0,
            sleep_quality: 8,
            physical_activity: ActivityLevel::High,
            stress_level: 3,
            heart_rate: 64,
            daily_steps: 10000,
            mood_swings: false,
            screen_time: 6.0,
            social_interactions: 8,
        }
    }

    fn sample_profile_json() -> &'static str {
        r#"{
            "sleep_duration": 6.0,
            "sleep_quality": 5,
            "physical_activity": "Moderate",
            "stress_level": 6,
            "heart_rate": 80,
            "daily_steps": 4000,
            "mood_swings": true,
            "screen_time": 9,
            "social_interactions": 2
        }"#
    }

    #[test]
    fn test_assess_low_risk() {
        let engine = AssessmentEngine::with_predictor(FixedPredictor(RiskLabel::LowRisk));
        let report = engine.assess(&sample_profile()).unwrap();

        assert_eq!(report.risk.label, RiskLabel::LowRisk);
        assert_eq!(report.risk.confidence, 0.9);
        assert_eq!(report.wellness_score, 100);
        assert_eq!(report.wellness_band, WellnessBand::Good);
        assert_eq!(report.sleep_quality_rating, SleepQualityRating::Excellent);
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_assess_high_risk_adds_risk_advice() {
        let engine = AssessmentEngine::with_predictor(FixedPredictor(RiskLabel::HighRisk));
        let report = engine.assess(&sample_profile()).unwrap();

        assert_eq!(report.risk.label, RiskLabel::HighRisk);
        assert_eq!(report.risk.confidence, 0.7);
        assert_eq!(report.recommendations.len(), 2);
        assert!(report.recommendations[0].starts_with("Professional Help"));
    }

    #[test]
    fn test_zero_sleep_is_division_undefined() {
        let engine = AssessmentEngine::with_predictor(FixedPredictor(RiskLabel::LowRisk));
        let profile = LifestyleProfile {
            sleep_duration: 0.0,
            ..sample_profile()
        };

        let result = engine.assess(&profile);
        assert!(matches!(result, Err(AssessmentError::DivisionUndefined(_))));
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let engine = AssessmentEngine::with_predictor(FixedPredictor(RiskLabel::LowRisk));
        let profile = LifestyleProfile {
            sleep_quality: 11,
            ..sample_profile()
        };

        let result = engine.assess(&profile);
        assert!(matches!(result, Err(AssessmentError::InvalidInput(_))));
    }

    #[test]
    fn test_assess_json() {
        let engine = AssessmentEngine::with_predictor(FixedPredictor(RiskLabel::HighRisk));
        let json = engine.assess_json(sample_profile_json()).unwrap();

        let payload: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(payload["schema"], "emos.assessment.v1");
        assert_eq!(payload["producer"]["name"], "emos-engine");

        let result = &payload["result"];
        assert_eq!(result["risk"]["label"], "high_risk");
        // 15 + 10 + 5 + 0 + 0
        assert_eq!(result["wellness_score"], 30);
        assert_eq!(result["wellness_band"], "poor");
        assert_eq!(result["sleep_quality_rating"], "poor");
        assert_eq!(result["recommendations"].as_array().unwrap().len(), 8);
    }

    #[test]
    fn test_assess_json_rejects_bad_json() {
        let engine = AssessmentEngine::with_predictor(FixedPredictor(RiskLabel::LowRisk));
        let result = engine.assess_json("not valid json");
        assert!(matches!(result, Err(AssessmentError::JsonError(_))));

        let result = engine.assess_json(r#"{"sleep_duration": 7.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_engine_clones_share_predictor() {
        let engine = AssessmentEngine::with_predictor(FixedPredictor(RiskLabel::LowRisk));
        let clone = engine.clone();
        assert!(Arc::ptr_eq(&engine.predictor, &clone.predictor));

        let handle = std::thread::spawn(move || clone.assess(&sample_profile()).map(|r| r.wellness_score));
        assert_eq!(handle.join().unwrap().unwrap(), 100);
    }

    #[test]
    fn test_load_missing_model() {
        let path = std::env::temp_dir().join(format!("emos-absent-{}.json", uuid::Uuid::new_v4()));
        let result = AssessmentEngine::load(&path);
        assert!(matches!(result, Err(AssessmentError::ModelUnavailable(_))));
    }

    #[test]
    fn test_phq9_to_json_shapes() {
        let bare = phq9_to_json("[0, 1, 2, 0, 1, 0, 0, 1, 0]").unwrap();
        let payload: serde_json::Value = serde_json::from_str(&bare).unwrap();
        assert_eq!(payload["result"]["score"], 5);
        assert_eq!(payload["result"]["severity"], "mild");

        let wrapped = phq9_to_json(r#"{"responses": [3, 3, 3, 3, 3, 3, 3, 3, 3]}"#).unwrap();
        let payload: serde_json::Value = serde_json::from_str(&wrapped).unwrap();
        assert_eq!(payload["result"]["severity"], "severe");
    }

    #[test]
    fn test_phq9_to_json_errors() {
        assert!(matches!(
            phq9_to_json("[0, 0, 0]"),
            Err(AssessmentError::InvalidInput(_))
        ));
        assert!(phq9_to_json("not json").is_err());
    }

    #[test]
    fn test_phq9_out_of_range_items_are_invalid_input() {
        for json in [
            "[0, 0, 0, 0, 0, 0, 0, 0, -1]",
            "[0, 0, 0, 0, 0, 0, 0, 0, 4]",
            "[0, 0, 0, 0, 0, 0, 0, 0, 256]",
            r#"{"responses": [0, 0, 0, 0, -3, 0, 0, 0, 0]}"#,
        ] {
            match phq9_from_json(json) {
                Err(AssessmentError::InvalidInput(msg)) => assert!(msg.contains("PHQ-9 response")),
                other => panic!("expected InvalidInput for {json}, got {other:?}"),
            }
        }

        match phq9_from_json("[0, 0, 0, 0, 0, 0, 0, 0, -1]") {
            Err(AssessmentError::InvalidInput(msg)) => assert!(msg.contains("response 9")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_screen_phq9() {
        let engine = AssessmentEngine::with_predictor(FixedPredictor(RiskLabel::LowRisk));
        let result = engine.screen_phq9(&[2, 2, 2, 2, 2, 2, 2, 1, 0]).unwrap();
        assert_eq!(result.score, 15);
        assert_eq!(result.severity, phq9::Phq9Severity::ModeratelySevere);
    }
}
