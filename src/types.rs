//! Core types for the EmoS engine
//!
//! This module defines the data structures that flow through each stage of an
//! assessment: the lifestyle profile, the feature vector handed to the
//! classifier, the risk assessment it produces and the combined report.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AssessmentError;

/// Number of positions in the classifier feature vector
pub const FEATURE_COUNT: usize = 9;

/// Self-reported physical activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    Low,
    Moderate,
    High,
}

impl ActivityLevel {
    /// Numeric activity level the classifier was trained on
    pub fn numeric(&self) -> f64 {
        match self {
            ActivityLevel::Low => 30.0,
            ActivityLevel::Moderate => 50.0,
            ActivityLevel::High => 75.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Low => "Low",
            ActivityLevel::Moderate => "Moderate",
            ActivityLevel::High => "High",
        }
    }
}

impl std::str::FromStr for ActivityLevel {
    type Err = AssessmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(ActivityLevel::Low),
            "moderate" => Ok(ActivityLevel::Moderate),
            "high" => Ok(ActivityLevel::High),
            _ => Err(AssessmentError::InvalidInput(format!(
                "unknown physical activity level '{s}'"
            ))),
        }
    }
}

/// Lifestyle inputs for a single assessment request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifestyleProfile {
    /// Sleep per night (hours)
    pub sleep_duration: f64,
    /// Self-reported sleep quality (1-10)
    pub sleep_quality: u8,
    /// Physical activity level
    pub physical_activity: ActivityLevel,
    /// Perceived stress (0-10)
    pub stress_level: u8,
    /// Resting heart rate (bpm)
    pub heart_rate: u16,
    /// Average daily step count
    pub daily_steps: u32,
    /// Whether frequent mood swings are experienced
    pub mood_swings: bool,
    /// Daily screen time (hours)
    pub screen_time: f64,
    /// Daily social interactions (people)
    pub social_interactions: u32,
}

impl LifestyleProfile {
    /// Check value ranges.
    ///
    /// A zero sleep duration passes here; the feature builder reports it as
    /// [`AssessmentError::DivisionUndefined`].
    pub fn validate(&self) -> Result<(), AssessmentError> {
        if !self.sleep_duration.is_finite() || self.sleep_duration < 0.0 {
            return Err(AssessmentError::InvalidInput(format!(
                "sleep_duration must be a non-negative number of hours, got {}",
                self.sleep_duration
            )));
        }

        if !(1..=10).contains(&self.sleep_quality) {
            return Err(AssessmentError::InvalidInput(format!(
                "sleep_quality must be between 1 and 10, got {}",
                self.sleep_quality
            )));
        }

        if self.stress_level > 10 {
            return Err(AssessmentError::InvalidInput(format!(
                "stress_level must be between 0 and 10, got {}",
                self.stress_level
            )));
        }

        if !self.screen_time.is_finite() || self.screen_time < 0.0 {
            return Err(AssessmentError::InvalidInput(format!(
                "screen_time must be a non-negative number of hours, got {}",
                self.screen_time
            )));
        }

        Ok(())
    }
}

/// Fixed-order numeric encoding of a lifestyle profile
///
/// Positions: sleep duration, sleep quality, activity level, stress level,
/// heart rate, daily steps, sleep efficiency, activity/stress ratio,
/// sleep quality ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn sleep_efficiency(&self) -> f64 {
        self.0[6]
    }

    pub fn activity_stress_ratio(&self) -> f64 {
        self.0[7]
    }

    pub fn sleep_quality_ratio(&self) -> f64 {
        self.0[8]
    }
}

/// Binary classifier output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    LowRisk,
    HighRisk,
}

impl RiskLabel {
    /// Class index used by the persisted model
    pub fn class_index(&self) -> usize {
        match self {
            RiskLabel::LowRisk => 0,
            RiskLabel::HighRisk => 1,
        }
    }

    pub fn from_class_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(RiskLabel::LowRisk),
            1 => Some(RiskLabel::HighRisk),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLabel::LowRisk => write!(f, "LOW RISK"),
            RiskLabel::HighRisk => write!(f, "HIGH RISK"),
        }
    }
}

/// Probability distribution over the two risk classes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub low_risk: f64,
    pub high_risk: f64,
}

impl ClassProbabilities {
    pub fn of(&self, label: RiskLabel) -> f64 {
        match label {
            RiskLabel::LowRisk => self.low_risk,
            RiskLabel::HighRisk => self.high_risk,
        }
    }
}

/// Discrete prediction returned by a predictor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: RiskLabel,
    pub probabilities: ClassProbabilities,
}

/// Risk classification for one lifestyle profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub label: RiskLabel,
    /// Probability of the predicted label (0-1)
    pub confidence: f64,
    pub probabilities: ClassProbabilities,
}

/// Colour band the dashboard applies to a wellness score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WellnessBand {
    /// 80 and above
    Good,
    /// 60-79
    Fair,
    /// Below 60
    Poor,
}

impl WellnessBand {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            WellnessBand::Good
        } else if score >= 60 {
            WellnessBand::Fair
        } else {
            WellnessBand::Poor
        }
    }
}

/// Rating of the self-reported sleep quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepQualityRating {
    Excellent,
    Good,
    Poor,
}

impl SleepQualityRating {
    pub fn from_quality(quality: u8) -> Self {
        if quality >= 8 {
            SleepQualityRating::Excellent
        } else if quality >= 6 {
            SleepQualityRating::Good
        } else {
            SleepQualityRating::Poor
        }
    }
}

/// Combined output of a lifestyle assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub risk: RiskAssessment,
    pub wellness_score: u8,
    pub wellness_band: WellnessBand,
    pub sleep_quality_rating: SleepQualityRating,
    pub recommendations: Vec<String>,
}
