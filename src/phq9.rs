//! PHQ-9 depression screening
//!
//! Scores the nine-item Patient Health Questionnaire: responses are summed
//! into a 0-27 total, mapped onto a severity band and paired with a fixed set
//! of recommendations.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AssessmentError;

/// Number of questionnaire items
pub const PHQ9_ITEM_COUNT: usize = 9;

/// Highest possible total score
pub const PHQ9_MAX_SCORE: u8 = 27;

/// Highest score a single item can take
pub const PHQ9_MAX_ITEM_SCORE: u8 = 3;

/// Questionnaire items, in order
pub const PHQ9_QUESTIONS: [&str; PHQ9_ITEM_COUNT] = [
    "Little interest or pleasure in doing things?",
    "Feeling down, depressed, or hopeless?",
    "Trouble falling or staying asleep, or sleeping too much?",
    "Feeling tired or having little energy?",
    "Poor appetite or overeating?",
    "Feeling bad about yourself - or that you are a failure or have let yourself or your family down?",
    "Trouble concentrating on things, such as reading the newspaper or watching television?",
    "Moving or speaking slowly enough that other people could have noticed? Or the opposite - being so fidgety or restless that you have been moving around a lot more than usual?",
    "Thoughts that you would be better off dead or of hurting yourself in some way?",
];

/// Answer options; the index is the item score
pub const PHQ9_OPTIONS: [&str; 4] = [
    "Not at all (0 points)",
    "Several days (1 point)",
    "More than half the days (2 points)",
    "Nearly every day (3 points)",
];

/// Depression severity band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phq9Severity {
    Minimal,
    Mild,
    Moderate,
    ModeratelySevere,
    Severe,
}

impl Phq9Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Phq9Severity::Minimal => "Minimal depression",
            Phq9Severity::Mild => "Mild depression",
            Phq9Severity::Moderate => "Moderate depression",
            Phq9Severity::ModeratelySevere => "Moderately severe depression",
            Phq9Severity::Severe => "Severe depression",
        }
    }

    /// Band containing `score`, if it lies within 0-27
    pub fn from_score(score: u8) -> Option<Self> {
        SEVERITY_BANDS
            .iter()
            .find(|(lo, hi, _)| (*lo..=*hi).contains(&score))
            .map(|(_, _, severity)| *severity)
    }
}

impl fmt::Display for Phq9Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive score ranges per band; contiguous over 0-27
pub const SEVERITY_BANDS: [(u8, u8, Phq9Severity); 5] = [
    (0, 4, Phq9Severity::Minimal),
    (5, 9, Phq9Severity::Mild),
    (10, 14, Phq9Severity::Moderate),
    (15, 19, Phq9Severity::ModeratelySevere),
    (20, 27, Phq9Severity::Severe),
];

const MINIMAL_RECOMMENDATIONS: &[&str] = &[
    "Continue maintaining good mental health practices",
    "Regular exercise and social activities",
    "Maintain healthy sleep patterns",
];

const MILD_RECOMMENDATIONS: &[&str] = &[
    "Consider talking to a trusted friend or family member",
    "Practice stress-reduction techniques (meditation, deep breathing)",
    "Maintain regular sleep schedule",
    "Consider professional counseling if symptoms persist",
];

const MODERATE_RECOMMENDATIONS: &[&str] = &[
    "Strongly consider professional mental health evaluation",
    "Contact a mental health professional",
    "Practice self-care and stress management",
    "Consider medication evaluation with a psychiatrist",
];

const URGENT_RECOMMENDATIONS: &[&str] = &[
    "Immediate professional mental health evaluation recommended",
    "Contact a mental health professional or crisis hotline",
    "Consider emergency mental health services if needed",
    "Do not hesitate to seek help - you deserve support",
];

/// Scored questionnaire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phq9Result {
    pub score: u8,
    pub severity: Phq9Severity,
    pub recommendations: Vec<String>,
    pub max_score: u8,
}

impl Phq9Result {
    /// One-line reading of the score
    pub fn interpretation(&self) -> &'static str {
        match self.score {
            0..=4 => "Minimal depression - Continue maintaining good mental health!",
            5..=9 => "Mild depression - Consider talking to someone you trust",
            10..=14 => "Moderate depression - Professional help recommended",
            _ => "Severe depression - Immediate professional evaluation needed",
        }
    }

    /// Fraction of the maximum score (0-1)
    pub fn progress(&self) -> f64 {
        f64::from(self.score) / f64::from(self.max_score)
    }
}

/// Score a full set of PHQ-9 responses
pub fn score(responses: &[u8]) -> Result<Phq9Result, AssessmentError> {
    if responses.len() != PHQ9_ITEM_COUNT {
        return Err(AssessmentError::InvalidInput(format!(
            "PHQ-9 requires exactly {PHQ9_ITEM_COUNT} responses, got {}",
            responses.len()
        )));
    }

    if let Some((index, value)) = responses
        .iter()
        .enumerate()
        .find(|(_, value)| **value > PHQ9_MAX_ITEM_SCORE)
    {
        return Err(AssessmentError::InvalidInput(format!(
            "PHQ-9 response {} must be between 0 and {PHQ9_MAX_ITEM_SCORE}, got {value}",
            index + 1
        )));
    }

    let total: u8 = responses.iter().sum();
    let severity = Phq9Severity::from_score(total).ok_or_else(|| {
        AssessmentError::InvalidInput(format!("PHQ-9 score {total} is outside 0-{PHQ9_MAX_SCORE}"))
    })?;

    Ok(Phq9Result {
        score: total,
        severity,
        recommendations: recommendations_for(total)
            .iter()
            .map(|r| r.to_string())
            .collect(),
        max_score: PHQ9_MAX_SCORE,
    })
}

/// Recommendations for a total score
pub fn recommendations_for(score: u8) -> &'static [&'static str] {
    if score <= 4 {
        MINIMAL_RECOMMENDATIONS
    } else if score <= 9 {
        MILD_RECOMMENDATIONS
    } else if score <= 14 {
        MODERATE_RECOMMENDATIONS
    } else {
        URGENT_RECOMMENDATIONS
    }
}
