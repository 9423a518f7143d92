//! Personalized recommendations
//!
//! An ordered rule table evaluated against a lifestyle profile and the risk
//! label. Rules fire independently; output order follows table order, which
//! shells render as a numbered list.

use crate::types::{ActivityLevel, LifestyleProfile, RiskLabel};

/// A single advisory rule
struct Rule {
    trigger: fn(&LifestyleProfile, RiskLabel) -> bool,
    advice: &'static [&'static str],
}

const RULES: &[Rule] = &[
    Rule {
        trigger: |p, _| p.sleep_duration < 7.0,
        advice: &["Sleep: Aim for 7-9 hours of sleep per night for better mental health"],
    },
    Rule {
        trigger: |p, _| p.stress_level > 5,
        advice: &["Stress Management: Practice meditation, deep breathing, or yoga"],
    },
    Rule {
        trigger: |p, _| p.physical_activity != ActivityLevel::High,
        advice: &["Exercise: Increase physical activity to reduce stress and improve mood"],
    },
    Rule {
        trigger: |p, _| p.mood_swings,
        advice: &["Mood Tracking: Keep a mood journal to identify patterns and triggers"],
    },
    Rule {
        trigger: |p, _| p.screen_time > 6.0,
        advice: &["Digital Wellness: Reduce screen time and take regular breaks"],
    },
    Rule {
        trigger: |p, _| p.social_interactions < 5,
        advice: &["Social Connection: Increase social interactions for better mental well-being"],
    },
    Rule {
        trigger: |_, risk| risk == RiskLabel::HighRisk,
        advice: &[
            "Professional Help: Consider consulting a mental health professional",
            "Support: Reach out to friends, family, or mental health hotlines",
        ],
    },
];

/// Rule-based recommendation engine
pub struct RecommendationEngine;

impl RecommendationEngine {
    /// Advisories for a profile, in rule order
    pub fn recommend(profile: &LifestyleProfile, risk: RiskLabel) -> Vec<String> {
        RULES
            .iter()
            .filter(|rule| (rule.trigger)(profile, risk))
            .flat_map(|rule| rule.advice.iter().map(|a| a.to_string()))
            .collect()
    }
}
