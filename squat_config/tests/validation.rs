use rstest::rstest;
use squat_config::{CountingMode, EarSide, KneeRuleToml, load_toml};

#[test]
fn accepts_full_document() {
    let toml = r#"
[phase]
descent_threshold = 0.06
ascent_return_threshold = 0.015
ear = "left"

[debounce]
head = 3
trunk = 4
knee = 5
heel = 6
mode = "per_frame"

[rules.head]
kind = "ear_eye_level"
max_tilt_deg = 7.5

[rules.trunk]
kind = "tibia_parallel"
position_gate = 0.08

[rules.knee]
kind = "hip_ankle_corridor"

[rules.heel]
kind = "ankle_lift"
max_lift = 0.02

[finalize]
incomplete = "discard"

[input]
fps = 60.0

[logging]
level = "debug"
rotation = "daily"
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.phase.ear, EarSide::Left);
    assert_eq!(cfg.debounce.mode, CountingMode::PerFrame);
    assert_eq!(cfg.debounce.heel, 6);
    assert_eq!(
        cfg.rules.knee,
        KneeRuleToml::HipAnkleCorridor { margin_x: 0.03 }
    );
}

#[rstest]
#[case("[debounce]\nhead = 0", "debounce.head must be >= 1")]
#[case("[debounce]\nheel = 0", "debounce.heel must be >= 1")]
#[case("[phase]\ndescent_threshold = 0.0", "phase.descent_threshold")]
#[case("[phase]\ndescent_threshold = 1.5", "phase.descent_threshold")]
#[case(
    "[phase]\ndescent_threshold = 0.02\nascent_return_threshold = 0.03",
    "must be below phase.descent_threshold"
)]
#[case(
    "[rules.trunk]\nkind = \"angle_window\"\nmin_deg = 120.0\nmax_deg = 100.0",
    "rules.trunk.min_deg must be <="
)]
#[case("[rules.knee]\nkind = \"toe_travel\"\nfoot_fraction = -0.1", "rules.knee.foot_fraction")]
#[case("[input]\nfps = 0.0", "input.fps must be > 0")]
#[case("[logging]\nrotation = \"weekly\"", "logging.rotation")]
fn rejects_out_of_range(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(
        format!("{err}").contains(needle),
        "error '{err}' should mention '{needle}'"
    );
}

#[test]
fn unknown_rule_kind_is_a_parse_error() {
    let err = load_toml("[rules.head]\nkind = \"chin_tuck\"\n").expect_err("unknown kind");
    assert!(err.to_string().contains("chin_tuck") || err.to_string().contains("variant"));
}
