//! Tests for filter module

use trackclean::filter::*;
use trackclean::GeoPoint;

const LAT: f64 = 39.9;
const LNG: f64 = 116.4;

/// Degrees of latitude per meter
const DEG_PER_M: f64 = 1.0 / 111_195.0;

fn origin() -> GeoPoint {
    GeoPoint::new(LAT, LNG, 0)
}

/// Point `meters` north of the origin at `t` ms.
fn north(meters: f64, t: i64) -> GeoPoint {
    GeoPoint::new(LAT + meters * DEG_PER_M, LNG, t)
}

fn config() -> FilterConfig {
    FilterConfig {
        enabled: true,
        ..FilterConfig::default()
    }
}

#[test]
fn test_filter_config_defaults() {
    let c = FilterConfig::default();
    assert!(!c.enabled);
    assert_eq!(c.max_speed, 180.0);
    assert_eq!(c.min_speed, 0.5);
    assert_eq!(c.max_accuracy, 100.0);
    assert_eq!(c.max_time_interval, 300_000);
    assert_eq!(c.max_distance, 10_000.0);
}

#[test]
fn test_400km_jump_in_one_second_rejected() {
    let points = vec![origin(), north(400_000.0, 1000)];
    let filtered = filter_noise(&points, &config());
    assert_eq!(filtered, vec![origin()]);
}

#[test]
fn test_fewer_than_two_points_unchanged() {
    assert!(filter_noise(&[], &config()).is_empty());
    let single = vec![origin().with_accuracy(500.0)];
    assert_eq!(filter_noise(&single, &config()), single);
}

#[test]
fn test_first_point_always_kept() {
    let points = vec![origin().with_accuracy(500.0), north(50.0, 10_000)];
    let filtered = filter_noise(&points, &config());
    assert_eq!(filtered.len(), 2);
    assert_eq!(filtered[0], points[0]);
}

#[test]
fn test_each_rejection_reason() {
    let c = config();
    let last = origin().with_altitude(100.0);

    let cases = [
        (north(10.0, 1000).with_accuracy(150.0), Rejection::Accuracy),
        (north(50.0, 600_000), Rejection::TimeGap),
        (north(20_000.0, 200_000), Rejection::DistanceJump),
        (north(1000.0, 10_000), Rejection::TooFast),
        (north(1.0, 10_000), Rejection::Stationary),
        (north(50.0, 10_000).with_altitude(1500.0), Rejection::AltitudeJump),
    ];

    for (candidate, expected) in cases {
        assert_eq!(check_transition(&candidate, &last, &c), Err(expected));
    }
}

#[test]
fn test_checks_run_in_fixed_order() {
    // Fails accuracy and time gap; accuracy is checked first
    let candidate = north(50.0, 600_000).with_accuracy(150.0);
    assert_eq!(
        check_transition(&candidate, &origin(), &config()),
        Err(Rejection::Accuracy)
    );

    // Fails distance and speed; distance is checked first
    let candidate = north(400_000.0, 1000);
    assert_eq!(
        check_transition(&candidate, &origin(), &config()),
        Err(Rejection::DistanceJump)
    );
}

#[test]
fn test_slow_hop_beyond_stationary_radius_accepted() {
    // 20 m in 200 s is 0.36 km/h, below min_speed but farther than 10 m
    let candidate = north(20.0, 200_000);
    assert!(candidate.average_speed_to(&origin()) < 0.5);
    assert_eq!(check_transition(&candidate, &origin(), &config()), Ok(()));
}

#[test]
fn test_same_timestamp_skips_speed_checks() {
    let candidate = north(5.0, 0);
    assert_eq!(check_transition(&candidate, &origin(), &config()), Ok(()));
}

#[test]
fn test_altitude_check_needs_both_readings() {
    let last = origin();
    let candidate = north(50.0, 10_000).with_altitude(5000.0);
    assert_eq!(check_transition(&candidate, &last, &config()), Ok(()));
}

#[test]
fn test_altitude_jump_over_long_hop_accepted() {
    let last = origin().with_altitude(100.0);
    let candidate = north(500.0, 60_000).with_altitude(1500.0);
    assert_eq!(check_transition(&candidate, &last, &config()), Ok(()));
}

#[test]
fn test_rejected_point_is_not_a_reference() {
    let points = vec![
        origin(),
        north(400_000.0, 1000),
        north(50.0, 10_000),
        north(100.0, 20_000),
    ];
    let filtered = filter_noise(&points, &config());
    assert_eq!(filtered, vec![points[0], points[2], points[3]]);
}

#[test]
fn test_filter_is_idempotent() {
    let points = vec![
        origin(),
        north(10.0, 1000).with_accuracy(150.0),
        north(30.0, 5000),
        north(30.5, 10_000),
        north(2000.0, 12_000),
        north(80.0, 15_000).with_altitude(10.0),
        north(90.0, 20_000).with_altitude(2000.0),
        north(150.0, 30_000),
        north(150.0, 30_000),
        north(300.0, 700_000),
    ];
    let once = filter_noise(&points, &config());
    let twice = filter_noise(&once, &config());
    assert!(once.len() < points.len());
    assert_eq!(once, twice);
}

#[test]
fn test_filter_stats() {
    let points = vec![
        origin(),
        north(10.0, 1000).with_accuracy(150.0),
        north(1000.0, 10_000),
        north(50.0, 20_000),
    ];
    let (kept, stats) = filter_noise_with_stats(&points, &config());

    assert_eq!(kept, vec![points[0], points[3]]);
    assert_eq!(stats.original_count, 4);
    assert_eq!(stats.kept_count, 2);
    assert_eq!(stats.removed_count, 2);
    assert!((stats.removal_rate - 50.0).abs() < 1e-9);
    assert_eq!(stats.rejections.get(&Rejection::Accuracy), Some(&1));
    assert_eq!(stats.rejections.get(&Rejection::TooFast), Some(&1));
    assert_eq!(stats.rejections.get(&Rejection::TimeGap), None);
}

#[test]
fn test_filter_by_speed() {
    // Zero time delta is accepted regardless of distance
    let points = vec![origin(), north(1000.0, 0)];
    assert_eq!(filter_by_speed(&points, 180.0).len(), 2);

    let points = vec![origin(), north(1000.0, 10_000), north(100.0, 20_000)];
    assert_eq!(filter_by_speed(&points, 180.0), vec![points[0], points[2]]);
}

#[test]
fn test_filter_by_accuracy_is_per_point() {
    let points = vec![
        origin().with_accuracy(500.0),
        north(10.0, 1000),
        north(20.0, 2000).with_accuracy(50.0),
        north(30.0, 3000).with_accuracy(150.0),
    ];
    let filtered = filter_by_accuracy(&points, 100.0);
    assert_eq!(filtered, vec![points[1], points[2]]);
}

#[test]
fn test_filter_by_distance() {
    let points = vec![origin(), north(400_000.0, 1000), north(50.0, 2000)];
    assert_eq!(filter_by_distance(&points, 10_000.0), vec![points[0], points[2]]);
}

#[test]
fn test_filter_by_time_interval() {
    let points = vec![origin(), north(10.0, 600_000), north(20.0, 10_000)];
    assert_eq!(
        filter_by_time_interval(&points, 300_000),
        vec![points[0], points[2]]
    );
}

#[test]
fn test_rejection_names() {
    assert_eq!(Rejection::TooFast.to_string(), "too_fast");
    assert_eq!(
        serde_json::to_string(&Rejection::AltitudeJump).unwrap(),
        "\"altitude_jump\""
    );
}
