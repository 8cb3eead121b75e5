use super::*;
use serial_test::serial;
use std::env;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    clear_selector_env();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    clear_selector_env();
    result
}

fn clear_selector_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for key in SelectorConfig::ENV_VARS {
        unsafe { env::remove_var(key) };
    }
}

#[test]
fn test_default_config() {
    let config = SelectorConfig::default();

    assert_eq!(config.thresholds.high, 80);
    assert_eq!(config.thresholds.medium, 50);
    assert_eq!(config.ambiguity_gap, 10);
    assert_eq!(config.scoring_mode, ScoringMode::Legacy);
    assert_eq!(config.low_confidence_action, LowConfidenceAction::Review);
    assert_eq!(config.weights.version, "2024-06.1");
    assert!(config.weight_overrides.is_none());
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_selector_env();

    let config = SelectorConfig::from_env().expect("should parse with defaults");
    assert_eq!(config, SelectorConfig::default());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    let config = with_env_vars(
        &[
            ("SELECTOR_HIGH_THRESHOLD", "85"),
            ("SELECTOR_MEDIUM_THRESHOLD", " 55 "),
            ("SELECTOR_AMBIGUITY_GAP", "15"),
            ("SELECTOR_SCORING_MODE", "multi_signal"),
            ("SELECTOR_LOW_CONFIDENCE_ACTION", "hard_stop"),
        ],
        SelectorConfig::from_env,
    )
    .expect("should parse overrides");

    assert_eq!(config.thresholds, Thresholds { high: 85, medium: 55 });
    assert_eq!(config.ambiguity_gap, 15);
    assert_eq!(config.scoring_mode, ScoringMode::MultiSignal);
    assert_eq!(config.low_confidence_action, LowConfidenceAction::HardStop);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_blank_values_fall_back_to_defaults() {
    let config = with_env_vars(
        &[("SELECTOR_HIGH_THRESHOLD", "   "), ("SELECTOR_SCORING_MODE", "")],
        SelectorConfig::from_env,
    )
    .expect("blank values are unset");

    assert_eq!(config.thresholds.high, 80);
    assert_eq!(config.scoring_mode, ScoringMode::Legacy);
}

#[test]
#[serial]
fn test_invalid_integer() {
    let result = with_env_vars(
        &[("SELECTOR_HIGH_THRESHOLD", "eighty")],
        SelectorConfig::from_env,
    );

    match result {
        Err(ConfigError::InvalidInteger { var, value, .. }) => {
            assert_eq!(var, "SELECTOR_HIGH_THRESHOLD");
            assert_eq!(value, "eighty");
        }
        other => panic!("expected InvalidInteger, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_unknown_scoring_mode() {
    let result = with_env_vars(&[("SELECTOR_SCORING_MODE", "fuzzy")], SelectorConfig::from_env);
    assert!(matches!(result, Err(ConfigError::UnknownScoringMode { value }) if value == "fuzzy"));
}

#[test]
#[serial]
fn test_unknown_low_confidence_action() {
    let result = with_env_vars(
        &[("SELECTOR_LOW_CONFIDENCE_ACTION", "panic")],
        SelectorConfig::from_env,
    );
    assert!(matches!(
        result,
        Err(ConfigError::UnknownLowConfidenceAction { .. })
    ));
}

#[test]
#[serial]
fn test_weights_from_env_require_version_bump() {
    let unbumped = with_env_vars(
        &[("SELECTOR_TOKEN_WEIGHT", "0.55"), ("SELECTOR_LAYOUT_WEIGHT", "0.05")],
        SelectorConfig::from_env,
    )
    .expect("should parse weights");
    assert!(matches!(
        unbumped.validate(),
        Err(ConfigError::WeightsVersionNotBumped { .. })
    ));

    let bumped = with_env_vars(
        &[
            ("SELECTOR_TOKEN_WEIGHT", "0.55"),
            ("SELECTOR_LAYOUT_WEIGHT", "0.05"),
            ("SELECTOR_WEIGHTS_VERSION", "2024-09.1"),
            ("SELECTOR_WEIGHTS_EFFECTIVE_AT", "2024-09-01T00:00:00Z"),
        ],
        SelectorConfig::from_env,
    )
    .expect("should parse weights");
    assert!(bumped.validate().is_ok());
    assert_eq!(bumped.weights.token_weight, 0.55);
    assert_eq!(bumped.weights.version, "2024-09.1");
    assert_eq!(
        bumped.weights.effective_at.to_rfc3339(),
        "2024-09-01T00:00:00+00:00"
    );
}

#[test]
#[serial]
fn test_invalid_weight_and_timestamp() {
    let result = with_env_vars(&[("SELECTOR_ROI_WEIGHT", "lots")], SelectorConfig::from_env);
    assert!(matches!(result, Err(ConfigError::InvalidFloat { var, .. }) if var == "SELECTOR_ROI_WEIGHT"));

    let result = with_env_vars(
        &[("SELECTOR_WEIGHTS_EFFECTIVE_AT", "June 2024")],
        SelectorConfig::from_env,
    );
    assert!(matches!(result, Err(ConfigError::InvalidTimestamp { .. })));
}

#[test]
fn test_validate_threshold_errors() {
    let inverted = SelectorConfig {
        thresholds: Thresholds { high: 50, medium: 80 },
        ..Default::default()
    };
    assert!(matches!(
        inverted.validate(),
        Err(ConfigError::ThresholdOrder { high: 50, medium: 80 })
    ));

    let zero = SelectorConfig {
        thresholds: Thresholds { high: 80, medium: 0 },
        ..Default::default()
    };
    assert!(matches!(
        zero.validate(),
        Err(ConfigError::InvalidThreshold { value: 0, .. })
    ));

    let too_high = SelectorConfig {
        thresholds: Thresholds { high: 101, medium: 50 },
        ..Default::default()
    };
    assert!(too_high.validate().is_err());

    let wide_gap = SelectorConfig {
        ambiguity_gap: 200,
        ..Default::default()
    };
    assert!(matches!(
        wide_gap.validate(),
        Err(ConfigError::InvalidThreshold { name: "ambiguity gap", .. })
    ));
}

#[test]
fn test_validate_weight_errors() {
    let mut config = SelectorConfig::default();
    config.weights.roi_weight = -0.1;
    config.weights.version = "custom".into();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidWeight { signal: "roi", .. })
    ));

    let mut config = SelectorConfig::default();
    config.weights.token_weight = f64::NAN;
    config.weights.version = "custom".into();
    assert!(config.validate().is_err());

    let mut config = SelectorConfig::default();
    config.weights.token_weight = 0.0;
    config.weights.layout_weight = 0.0;
    config.weights.roi_weight = 0.0;
    config.weights.plausibility_weight = 0.0;
    config.weights.version = "off".into();
    assert!(matches!(config.validate(), Err(ConfigError::ZeroTotalWeight)));
}

#[test]
fn test_validate_rejects_bad_weight_overrides() {
    let with_overrides = |overrides: WeightOverrides| SelectorConfig {
        scoring_mode: ScoringMode::MultiSignal,
        weight_overrides: Some(overrides),
        ..Default::default()
    };

    let config = with_overrides(WeightOverrides {
        token: Some(-0.5),
        ..Default::default()
    });
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidWeight { signal: "token", .. })
    ));

    let config = with_overrides(WeightOverrides {
        roi: Some(1.5),
        ..Default::default()
    });
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidWeight { signal: "roi", .. })
    ));

    let config = with_overrides(WeightOverrides {
        plausibility: Some(f64::INFINITY),
        ..Default::default()
    });
    assert!(config.validate().is_err());

    let config = with_overrides(WeightOverrides {
        token: Some(0.0),
        layout: Some(0.0),
        roi: Some(0.0),
        plausibility: Some(0.0),
    });
    assert!(matches!(config.validate(), Err(ConfigError::ZeroTotalWeight)));

    let config = with_overrides(WeightOverrides {
        layout: Some(0.0),
        ..Default::default()
    });
    assert!(config.validate().is_ok());
    assert_eq!(config.effective_weights(), config.ranker().effective_weights());
}

#[test]
fn test_policy_and_ranker_follow_config() {
    let config = SelectorConfig {
        thresholds: Thresholds { high: 90, medium: 60 },
        ambiguity_gap: 5,
        scoring_mode: ScoringMode::MultiSignal,
        low_confidence_action: LowConfidenceAction::HardStop,
        ..Default::default()
    };

    let policy = config.policy();
    assert_eq!(policy.thresholds.high, 90);
    assert_eq!(policy.ambiguity_gap, 5);
    assert_eq!(policy.low_confidence_action, LowConfidenceAction::HardStop);
    assert_eq!(config.ranker().mode(), ScoringMode::MultiSignal);
}

#[test]
fn test_ranker_applies_overrides() {
    let config = SelectorConfig {
        weight_overrides: Some(WeightOverrides {
            layout: Some(0.0),
            ..Default::default()
        }),
        ..Default::default()
    };
    assert_eq!(config.ranker().effective_weights().version, "2024-06.1+override");
}

#[test]
fn test_summary() {
    let summary = SelectorConfig::default().summary();
    assert!(summary.contains("mode=legacy"));
    assert!(summary.contains("gap=10"));
    assert!(summary.contains("weights=2024-06.1"));
}

#[test]
fn test_error_messages() {
    let err = ConfigError::ThresholdOrder { high: 50, medium: 80 };
    assert_eq!(
        err.to_string(),
        "medium threshold 80 must be below high threshold 50"
    );
    let err = ConfigError::WeightsVersionNotBumped {
        version: "2024-06.1".into(),
    };
    assert!(err.to_string().contains("SELECTOR_WEIGHTS_VERSION"));
}
