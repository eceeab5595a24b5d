use squat_core::config::AnalysisConfig;
use squat_core::{
    AnalysisSession, CountingMode, EarSide, HeadRule, HeelRule, IncompletePolicy, KneeRule,
    TrunkRule,
};

#[test]
fn empty_toml_maps_to_engine_defaults() {
    let cfg = squat_config::load_toml("").unwrap();
    let engine = AnalysisConfig::from(&cfg);
    let d = AnalysisConfig::default();
    assert_eq!(engine.phase.ear, d.phase.ear);
    assert_eq!(engine.rules.head, d.rules.head);
    assert_eq!(engine.rules.trunk, d.rules.trunk);
    assert_eq!(engine.rules.knee, d.rules.knee);
    assert_eq!(engine.rules.heel, d.rules.heel);
    assert_eq!(engine.debounce.mode, CountingMode::Consecutive);
    assert_eq!(engine.finalize.incomplete, IncompletePolicy::Record);
}

#[test]
fn every_alternative_rule_converts() {
    let toml = r#"
        [phase]
        descent_threshold = 0.08
        ascent_return_threshold = 0.03
        ear = "left"

        [debounce]
        head = 3
        trunk = 4
        knee = 6
        heel = 7
        mode = "per_frame"

        [rules.head]
        kind = "ear_eye_level"
        max_tilt_deg = 6.0

        [rules.trunk]
        kind = "angle_window"
        min_deg = 65.0
        max_deg = 115.0

        [rules.knee]
        kind = "hip_ankle_corridor"
        margin_x = 0.04

        [rules.heel]
        kind = "calibrated_height"
        tolerance = 0.02

        [finalize]
        incomplete = "discard"
    "#;
    let cfg = squat_config::load_toml(toml).unwrap();
    cfg.validate().unwrap();
    let engine = AnalysisConfig::from(&cfg);

    assert_eq!(engine.phase.ear, EarSide::Left);
    assert_eq!(engine.debounce.knee, 6);
    assert_eq!(engine.debounce.mode, CountingMode::PerFrame);
    assert_eq!(engine.rules.head, HeadRule::EarEyeLevel { max_tilt_deg: 6.0 });
    assert_eq!(
        engine.rules.trunk,
        TrunkRule::AngleWindow {
            min_deg: 65.0,
            max_deg: 115.0
        }
    );
    assert_eq!(engine.rules.knee, KneeRule::HipAnkleCorridor { margin_x: 0.04 });
    assert_eq!(engine.rules.heel, HeelRule::CalibratedHeight { tolerance: 0.02 });
    assert_eq!(engine.finalize.incomplete, IncompletePolicy::Discard);

    // a validated TOML config always builds
    AnalysisSession::builder().with_config(engine).build().unwrap();
}
