use crate::nmea::field::*;

#[test]
fn test_parse_int() {
    assert_eq!(Some(0), parse_int(b"0"));
    assert_eq!(Some(12), parse_int(b"12"));
    assert_eq!(Some(2026), parse_int(b"2026"));
}

#[test]
fn test_parse_int_rejects() {
    assert_eq!(None, parse_int(b""));
    assert_eq!(None, parse_int(b"-1"));
    assert_eq!(None, parse_int(b"1.5"));
    assert_eq!(None, parse_int(b"12a"));
    assert_eq!(None, parse_int(b" 12"));
    assert_eq!(None, parse_int(b"99999999999"));
}

#[test]
fn test_parse_float() {
    assert_approx_eq!(545.4, parse_float(b"545.4"));
    assert_approx_eq!(-17.3, parse_float(b"-17.3"));
    assert_approx_eq!(4807.038, parse_float(b"4807.038"));
    assert_approx_eq!(7.0, parse_float(b"07"));
}

#[test]
fn test_parse_float_prefix() {
    assert_approx_eq!(12.5, parse_float(b"12.5M"));
}

#[test]
fn test_parse_float_rejects() {
    assert_eq!(0.0, parse_float(b""));
    assert_eq!(0.0, parse_float(b"M"));
    assert_eq!(0.0, parse_float(b"1234567890.123456"));
}
