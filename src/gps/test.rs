use crate::gps::*;

use serde_json::json;
use serde_json::Value;

#[test]
fn test_fix_json() {
    let fix = Fix {
        flags: LocationFlags::LAT_LONG | LocationFlags::SPEED,
        latitude: 48.1173,
        longitude: -11.5,
        altitude: 545.4,
        speed: 2.0,
        bearing: 84.0,
        accuracy: 1.5,
        timestamp: 1_026_159_330_000,
    };

    let expected = json!({
        "class": "TPV",
        "time":  "2002-07-08T20:15:30+00:00",
        "lat":   48.1173,
        "lon":   -11.5,
        "speed": 2.0,
    });

    assert_eq!(expected, Value::from(&fix));
}

#[test]
fn test_fix_validity() {
    let mut fix = Fix::default();

    assert!(!fix.is_valid());

    fix.flags |= LocationFlags::ACCURACY;

    assert!(fix.is_valid());
    assert!(fix.has(LocationFlags::ACCURACY));
    assert!(!fix.has(LocationFlags::ACCURACY | LocationFlags::BEARING));
}

#[test]
fn test_used_in_fix() {
    let mut status = SatelliteStatus::default();
    status.used_in_fix_mask = 0x8000_0001;

    assert!(status.used_in_fix(1));
    assert!(status.used_in_fix(32));
    assert!(!status.used_in_fix(2));
    assert!(!status.used_in_fix(0));
    assert!(!status.used_in_fix(33));
}

#[test]
fn test_satellite_limit() {
    let mut status = SatelliteStatus::default();

    for prn in 1..=MAX_SATELLITES as u32 {
        assert!(status.push(SatelliteInfo {
            prn: Some(prn),
            ..SatelliteInfo::default()
        }));
    }

    assert!(status.is_full());
    assert!(!status.push(SatelliteInfo::default()));
    assert_eq!(MAX_SATELLITES, status.len());

    status.clear();

    assert!(status.is_empty());
}

#[test]
fn test_satellite_status_json() {
    let mut status = SatelliteStatus::default();
    status.used_in_fix_mask = prn_bit(7).unwrap();

    status.push(SatelliteInfo {
        prn: Some(7),
        elevation: 40.0,
        azimuth: 83.0,
        snr: 46.0,
    });

    status.push(SatelliteInfo {
        prn: None,
        elevation: 17.0,
        azimuth: 308.0,
        snr: 0.0,
    });

    let expected = json!({
        "class": "SKY",
        "satellites": [
            { "PRN": 7,    "el": 40.0, "az": 83.0,  "ss": 46.0, "used": true },
            { "PRN": null, "el": 17.0, "az": 308.0, "ss": 0.0,  "used": false },
        ],
    });

    assert_eq!(expected, Value::from(&status));
}
