//! Wellness scoring
//!
//! A heuristic 0-100 composite of five lifestyle factors, independent of the
//! risk classifier. Each factor is a step function evaluated top-down.

use crate::types::{ActivityLevel, LifestyleProfile};

/// Upper bound of the wellness score
pub const MAX_WELLNESS_SCORE: u8 = 100;

/// Point-based wellness scorer
pub struct WellnessScorer;

impl WellnessScorer {
    /// Score a profile (0-100)
    pub fn score(profile: &LifestyleProfile) -> u8 {
        let total = sleep_points(profile.sleep_duration)
            + activity_points(profile.physical_activity)
            + stress_points(profile.stress_level)
            + mood_points(profile.mood_swings)
            + screen_time_points(profile.screen_time);

        // Factor maxima sum to exactly 100 today; the clamp holds if thresholds move.
        total.min(MAX_WELLNESS_SCORE)
    }
}

fn sleep_points(hours: f64) -> u8 {
    if hours >= 7.0 {
        25
    } else if hours >= 6.0 {
        15
    } else if hours >= 5.0 {
        5
    } else {
        0
    }
}

fn activity_points(level: ActivityLevel) -> u8 {
    match level {
        ActivityLevel::High => 20,
        ActivityLevel::Moderate => 10,
        ActivityLevel::Low => 0,
    }
}

fn stress_points(stress: u8) -> u8 {
    if stress <= 3 {
        25
    } else if stress <= 5 {
        15
    } else if stress <= 7 {
        5
    } else {
        0
    }
}

fn mood_points(mood_swings: bool) -> u8 {
    if mood_swings {
        0
    } else {
        15
    }
}

fn screen_time_points(hours: f64) -> u8 {
    if hours <= 6.0 {
        15
    } else if hours <= 8.0 {
        8
    } else {
        0
    }
}
