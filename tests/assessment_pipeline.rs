use emos_engine::types::{ActivityLevel, LifestyleProfile, SleepQualityRating, WellnessBand};
use emos_engine::{AssessmentEngine, AssessmentError, Phq9Severity, RiskLabel};
use pretty_assertions::assert_eq;

const DEMO_MODEL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/models/demo_model.json");

fn healthy_profile() -> LifestyleProfile {
    LifestyleProfile {
        sleep_duration: 8.0,
        sleep_quality: 8,
        physical_activity: ActivityLevel::High,
        stress_level: 2,
        heart_rate: 62,
        daily_steps: 11000,
        mood_swings: false,
        screen_time: 3.0,
        social_interactions: 10,
    }
}

fn strained_profile() -> LifestyleProfile {
    LifestyleProfile {
        sleep_duration: 5.0,
        sleep_quality: 4,
        physical_activity: ActivityLevel::Low,
        stress_level: 8,
        heart_rate: 88,
        daily_steps: 2500,
        mood_swings: true,
        screen_time: 9.5,
        social_interactions: 1,
    }
}

#[test]
fn test_healthy_profile_end_to_end() {
    let engine = AssessmentEngine::load(DEMO_MODEL).unwrap();
    let report = engine.assess(&healthy_profile()).unwrap();

    assert_eq!(report.risk.label, RiskLabel::LowRisk);
    assert!(report.risk.confidence > 0.9);
    assert_eq!(report.wellness_score, 100);
    assert_eq!(report.wellness_band, WellnessBand::Good);
    assert_eq!(report.sleep_quality_rating, SleepQualityRating::Excellent);
    assert_eq!(report.recommendations, Vec::<String>::new());
}

#[test]
fn test_strained_profile_end_to_end() {
    let engine = AssessmentEngine::load(DEMO_MODEL).unwrap();
    let report = engine.assess(&strained_profile()).unwrap();

    assert_eq!(report.risk.label, RiskLabel::HighRisk);
    assert_eq!(report.wellness_score, 5);
    assert_eq!(report.wellness_band, WellnessBand::Poor);
    assert_eq!(report.sleep_quality_rating, SleepQualityRating::Poor);

    let topics: Vec<&str> = report
        .recommendations
        .iter()
        .filter_map(|r| r.split(':').next())
        .collect();
    assert_eq!(
        topics,
        vec![
            "Sleep",
            "Stress Management",
            "Exercise",
            "Mood Tracking",
            "Digital Wellness",
            "Social Connection",
            "Professional Help",
            "Support",
        ]
    );
}

#[test]
fn test_probabilities_are_a_distribution() {
    let engine = AssessmentEngine::load(DEMO_MODEL).unwrap();

    for profile in [healthy_profile(), strained_profile()] {
        let risk = engine.assess(&profile).unwrap().risk;
        let sum = risk.probabilities.low_risk + risk.probabilities.high_risk;
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(risk.confidence >= 0.5);
    }
}

#[test]
fn test_zero_sleep_reports_division_undefined() {
    let engine = AssessmentEngine::load(DEMO_MODEL).unwrap();
    let profile = LifestyleProfile {
        sleep_duration: 0.0,
        ..healthy_profile()
    };

    assert!(matches!(
        engine.assess(&profile),
        Err(AssessmentError::DivisionUndefined(_))
    ));
}

#[test]
fn test_json_boundary() {
    let engine = AssessmentEngine::load(DEMO_MODEL).unwrap();
    let json = engine
        .assess_json(&serde_json::to_string(&strained_profile()).unwrap())
        .unwrap();

    let payload: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(payload["schema"], "emos.assessment.v1");
    assert_eq!(payload["result"]["risk"]["label"], "high_risk");
}

#[test]
fn test_phq9_screening() {
    let result = emos_engine::phq9::score(&[3, 3, 2, 2, 2, 2, 2, 2, 2]).unwrap();
    assert_eq!(result.score, 20);
    assert_eq!(result.severity, Phq9Severity::Severe);
    assert_eq!(result.recommendations.len(), 4);

    assert!(emos_engine::phq9::score(&[0, 0, 0, 0, 0, 0, 0, 0, 4]).is_err());
}

#[test]
fn test_model_unavailable() {
    let missing = concat!(env!("CARGO_MANIFEST_DIR"), "/models/does_not_exist.json");
    assert!(matches!(
        AssessmentEngine::load(missing),
        Err(AssessmentError::ModelUnavailable(_))
    ));
}
