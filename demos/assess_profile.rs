//! Assess a sample profile against the bundled demo model

use emos_engine::types::{ActivityLevel, LifestyleProfile};
use emos_engine::AssessmentEngine;

fn main() {
    let model_path = concat!(env!("CARGO_MANIFEST_DIR"), "/models/demo_model.json");

    let engine = match AssessmentEngine::load(model_path) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {e}");
            return;
        }
    };

    let profile = LifestyleProfile {
        sleep_duration: 6.5,
        sleep_quality: 6,
        physical_activity: ActivityLevel::Moderate,
        stress_level: 6,
        heart_rate: 74,
        daily_steps: 6500,
        mood_swings: false,
        screen_time: 7.0,
        social_interactions: 4,
    };

    match engine.assess(&profile) {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error: {e:?}"),
        },
        Err(e) => eprintln!("Error: {e:?}"),
    }

    match emos_engine::phq9_to_json("[1, 2, 1, 1, 0, 1, 0, 0, 0]") {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error: {e:?}"),
    }
}
