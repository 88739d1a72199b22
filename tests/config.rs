//! Tests for config module

use trackclean::{PipelineConfig, TrackError};

#[test]
fn test_default_config() {
    let config = PipelineConfig::default();
    assert!(config.enabled);
    assert!(!config.transform.enabled);
    assert!(!config.filter.enabled);
    assert!(config.simplify.enabled);
    assert!(config.statistics.enabled);
    assert!(config.statistics.formatted_output);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_json_fills_defaults() {
    let config = PipelineConfig::from_json_str(
        r#"{
            "filter": {"enabled": true, "max_speed": 120.0},
            "simplify": {"algorithm": "visvalingam"}
        }"#,
    )
    .unwrap();

    assert!(config.filter.enabled);
    assert_eq!(config.filter.max_speed, 120.0);
    assert_eq!(config.filter.min_speed, 0.5);
    assert_eq!(config.simplify.algorithm, "visvalingam");
    assert_eq!(config.simplify.tolerance, 5.0);
    assert_eq!(config.transform.source, "WGS84");
    assert!(config.validate().is_ok());
}

#[test]
fn test_json_roundtrip() {
    let mut config = PipelineConfig::default();
    config.transform.enabled = true;
    config.transform.target = "BD09".to_string();
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(PipelineConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn test_malformed_json() {
    let err = PipelineConfig::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, TrackError::Json(_)));
}

#[test]
fn test_missing_file() {
    let path = std::env::temp_dir().join("trackclean-config-that-does-not-exist.json");
    let err = PipelineConfig::from_json_file(&path).unwrap_err();
    assert!(matches!(err, TrackError::Io(_)));
}

#[test]
fn test_from_json_file() {
    let path = std::env::temp_dir().join(format!(
        "trackclean-config-test-{}.json",
        std::process::id()
    ));
    std::fs::write(&path, r#"{"simplify": {"tolerance": 25.0}}"#).unwrap();
    let config = PipelineConfig::from_json_file(&path);
    let _ = std::fs::remove_file(&path);

    assert_eq!(config.unwrap().simplify.tolerance, 25.0);
}

#[test]
fn test_invalid_datum_rejected_when_enabled() {
    let mut config = PipelineConfig::default();
    config.transform.target = "UTM".to_string();
    assert!(config.validate().is_ok());

    config.transform.enabled = true;
    let err = config.validate().unwrap_err();
    assert!(matches!(err, TrackError::UnsupportedDatum(ref s) if s == "UTM"));
}

#[test]
fn test_datum_tokens_must_match_exactly() {
    let mut config = PipelineConfig::default();
    config.transform.enabled = true;
    config.transform.source = "GCJ02".to_string();
    config.transform.target = "BD09".to_string();
    assert!(config.validate().is_ok());

    config.transform.target = "bd09".to_string();
    assert!(matches!(
        config.validate(),
        Err(TrackError::UnsupportedDatum(ref s)) if s == "bd09"
    ));

    let config = PipelineConfig::from_json_str(
        r#"{"transform": {"enabled": true, "source": " wgs84 ", "target": "gcj02"}}"#,
    )
    .unwrap();
    assert!(matches!(
        config.validate(),
        Err(TrackError::UnsupportedDatum(ref s)) if s == " wgs84 "
    ));
}

#[test]
fn test_filter_thresholds_must_be_positive() {
    let mut config = PipelineConfig::default();
    config.filter.max_speed = 0.0;
    assert!(config.validate().is_ok());

    config.filter.enabled = true;
    assert!(matches!(
        config.validate(),
        Err(TrackError::NonPositiveThreshold { name: "max_speed", .. })
    ));

    config.filter.max_speed = 180.0;
    config.filter.max_time_interval = 0;
    assert!(matches!(
        config.validate(),
        Err(TrackError::NonPositiveThreshold {
            name: "max_time_interval",
            ..
        })
    ));

    config.filter.max_time_interval = 1000;
    config.filter.max_distance = -5.0;
    assert!(matches!(
        config.validate(),
        Err(TrackError::NonPositiveThreshold {
            name: "max_distance",
            ..
        })
    ));

    config.filter.max_distance = 100.0;
    config.filter.max_accuracy = f64::NAN;
    assert!(matches!(
        config.validate(),
        Err(TrackError::NonPositiveThreshold {
            name: "max_accuracy",
            ..
        })
    ));
}

#[test]
fn test_min_speed_may_be_zero_but_not_negative() {
    let mut config = PipelineConfig::default();
    config.filter.enabled = true;
    config.filter.min_speed = 0.0;
    assert!(config.validate().is_ok());

    config.filter.min_speed = -1.0;
    assert!(matches!(
        config.validate(),
        Err(TrackError::NegativeThreshold {
            name: "min_speed",
            ..
        })
    ));
}

#[test]
fn test_simplify_validation() {
    let mut config = PipelineConfig::default();
    config.simplify.tolerance = 0.0;
    assert!(matches!(
        config.validate(),
        Err(TrackError::NonPositiveThreshold {
            name: "tolerance",
            ..
        })
    ));

    config.simplify.tolerance = 5.0;
    config.simplify.min_point_count = 1;
    assert!(matches!(
        config.validate(),
        Err(TrackError::MinPointCount(1))
    ));

    config.simplify.min_point_count = 2;
    config.simplify.algorithm = "INVALID".to_string();
    assert!(matches!(
        config.validate(),
        Err(TrackError::UnsupportedAlgorithm(_))
    ));

    config.simplify.enabled = false;
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_summary_text() {
    let mut config = PipelineConfig::default();
    config.transform.enabled = true;
    let text = config.summary();

    assert!(text.contains("transform: enabled (WGS84 -> GCJ02)"));
    assert!(text.contains("filter: disabled"));
    assert!(text.contains("DOUGLAS_PEUCKER"));
    assert!(text.contains("statistics: enabled"));
}
