use crate::nmea::*;

const GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

// Push every byte, collecting completed lines
fn lines(framer: &mut LineFramer, input: &[u8]) -> Vec<Vec<u8>> {
    input
        .iter()
        .filter_map(|&b| framer.push(b).map(|l| l.to_vec()))
        .collect()
}

#[test]
fn test_push() {
    let mut framer = LineFramer::new();

    let (last, rest) = GGA.split_last().unwrap();

    for &b in rest {
        assert_eq!(None, framer.push(b));
    }

    assert_eq!(rest.len(), framer.pending());
    assert_eq!(Some(GGA), framer.push(*last));
    assert_eq!(0, framer.pending());
}

#[test]
fn test_push_many() {
    let mut framer = LineFramer::new();

    let mut input = GGA.to_vec();
    input.extend_from_slice(b"$GPGLL,4916.45,N,12311.12,W,225444,A*31\n");

    let lines = lines(&mut framer, &input);

    assert_eq!(2, lines.len());
    assert_eq!(GGA, &lines[0][..]);
    assert_eq!(b"$GPGLL,4916.45,N,12311.12,W,225444,A*31\n", &lines[1][..]);
}

#[test]
fn test_push_longest() {
    let mut framer = LineFramer::new();

    let mut line = vec![b'x'; NMEA_MAX_SIZE - 1];
    line.push(b'\n');

    assert_eq!(vec![line.clone()], lines(&mut framer, &line));
}

#[test]
fn test_push_overflow() {
    let mut framer = LineFramer::new();

    let mut input = vec![b'x'; 100];
    input.extend_from_slice(b"\r\n");

    assert!(lines(&mut framer, &input[..90]).is_empty());
    assert!(framer.is_overflowed());

    assert!(lines(&mut framer, &input[90..]).is_empty());
    assert!(!framer.is_overflowed());

    assert_eq!(vec![GGA.to_vec()], lines(&mut framer, GGA));
}

#[test]
fn test_push_overflow_on_newline() {
    let mut framer = LineFramer::new();

    let mut input = vec![b'x'; NMEA_MAX_SIZE];
    input.push(b'\n');
    input.extend_from_slice(GGA);

    assert_eq!(vec![GGA.to_vec()], lines(&mut framer, &input));
}
