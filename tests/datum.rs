//! Tests for datum module

use trackclean::datum::*;
use trackclean::{GeoPoint, TrackError};

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

fn beijing_track() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new(39.9042, 116.4074, 1000)
            .with_altitude(44.0)
            .with_accuracy(5.0),
        GeoPoint::new(39.9092, 116.3974, 2000).with_speed(30.0),
        GeoPoint::new(39.9150, 116.4040, 3000).with_bearing(90.0),
    ]
}

#[test]
fn test_parse_datum_tokens() {
    assert_eq!("WGS84".parse::<Datum>().unwrap(), Datum::Wgs84);
    assert_eq!("GCJ02".parse::<Datum>().unwrap(), Datum::Gcj02);
    assert_eq!("BD09".parse::<Datum>().unwrap(), Datum::Bd09);
}

#[test]
fn test_parse_datum_rejects_other_spellings() {
    for token in ["gcj02", "Bd09", " WGS84", "WGS84 ", "wgs-84"] {
        assert!(matches!(
            token.parse::<Datum>(),
            Err(TrackError::UnsupportedDatum(ref s)) if s == token
        ));
    }
}

#[test]
fn test_parse_unknown_datum() {
    let err = "UTM".parse::<Datum>().unwrap_err();
    assert!(matches!(err, TrackError::UnsupportedDatum(ref s) if s == "UTM"));
    assert!(!Datum::is_supported("ETRS89"));
    assert!(Datum::is_supported("WGS84"));
    assert!(!Datum::is_supported("wgs84"));
}

#[test]
fn test_datum_display_roundtrip() {
    for datum in Datum::ALL {
        assert_eq!(datum.to_string().parse::<Datum>().unwrap(), datum);
    }
}

#[test]
fn test_transform_config_defaults() {
    let config = TransformConfig::default();
    assert!(!config.enabled);
    assert_eq!(config.source, "WGS84");
    assert_eq!(config.target, "GCJ02");
}

#[test]
fn test_same_datum_is_identity() {
    let track = beijing_track();
    for datum in Datum::ALL {
        assert_eq!(transform(&track, datum, datum), track);
    }
}

#[test]
fn test_transform_keeps_non_coordinate_fields() {
    let track = beijing_track();
    let shifted = transform(&track, Datum::Wgs84, Datum::Gcj02);

    assert_eq!(shifted.len(), track.len());
    for (before, after) in track.iter().zip(&shifted) {
        assert_ne!(before.latitude, after.latitude);
        assert_ne!(before.longitude, after.longitude);
        assert_eq!(before.timestamp, after.timestamp);
        assert_eq!(before.altitude, after.altitude);
        assert_eq!(before.speed, after.speed);
        assert_eq!(before.bearing, after.bearing);
        assert_eq!(before.accuracy, after.accuracy);
    }
}

#[test]
fn test_wgs84_to_gcj02_offset_magnitude() {
    let p = GeoPoint::new(39.9042, 116.4074, 0);
    let (lat, lng) = transform_point(p.latitude, p.longitude, Datum::Wgs84, Datum::Gcj02);
    let shift = p.distance_to(&GeoPoint::new(lat, lng, 0));
    // Offset in Beijing is a few hundred meters
    assert!(shift > 200.0 && shift < 1000.0, "shift was {}", shift);
}

#[test]
fn test_gcj02_roundtrip_within_a_few_meters() {
    let (lat, lng) = (31.2304, 121.4737);
    let (g_lat, g_lng) = transform_point(lat, lng, Datum::Wgs84, Datum::Gcj02);
    let (w_lat, w_lng) = transform_point(g_lat, g_lng, Datum::Gcj02, Datum::Wgs84);
    assert!(approx_eq(w_lat, lat, 1e-4));
    assert!(approx_eq(w_lng, lng, 1e-4));
}

#[test]
fn test_bd09_roundtrip_within_a_few_meters() {
    let (lat, lng) = (22.5431, 114.0579);
    let (b_lat, b_lng) = transform_point(lat, lng, Datum::Wgs84, Datum::Bd09);
    let (w_lat, w_lng) = transform_point(b_lat, b_lng, Datum::Bd09, Datum::Wgs84);
    assert!(approx_eq(w_lat, lat, 1e-4));
    assert!(approx_eq(w_lng, lng, 1e-4));
}

#[test]
fn test_wgs84_to_bd09_composes_through_gcj02() {
    let (lat, lng) = (39.9042, 116.4074);
    let direct = transform_point(lat, lng, Datum::Wgs84, Datum::Bd09);
    let (g_lat, g_lng) = transform_point(lat, lng, Datum::Wgs84, Datum::Gcj02);
    let composed = transform_point(g_lat, g_lng, Datum::Gcj02, Datum::Bd09);
    assert_eq!(direct, composed);
}

#[test]
fn test_transform_named_matches_typed() {
    let track = beijing_track();
    assert_eq!(
        transform_named(&track, "WGS84", "BD09"),
        transform(&track, Datum::Wgs84, Datum::Bd09)
    );
}

#[test]
fn test_transform_named_unknown_datum_passes_through() {
    let track = beijing_track();
    assert_eq!(transform_named(&track, "WGS84", "UTM"), track);
    assert_eq!(transform_named(&track, "", "GCJ02"), track);
    assert_eq!(transform_named(&track, "wgs84", "GCJ02"), track);
}

#[test]
fn test_transform_empty() {
    assert!(transform(&[], Datum::Wgs84, Datum::Gcj02).is_empty());
}
