use crate::nmea::*;

const GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

fn strings(tokenizer: &Tokenizer) -> Vec<String> {
    tokenizer
        .iter()
        .map(|t| String::from_utf8_lossy(t.as_bytes()).to_string())
        .collect()
}

#[test]
fn test_tokenize() {
    let tokenizer = Tokenizer::new(GGA);

    assert_eq!(13, tokenizer.len());
    assert_eq!(
        vec![
            "GPGGA", "123519", "4807.038", "N", "01131.000", "E", "1", "08", "0.9", "545.4", "M",
            "46.9", "M"
        ],
        strings(&tokenizer)
    );
}

#[test]
fn test_tokenize_sentence_type() {
    let tokenizer = Tokenizer::new(GGA);
    let id = tokenizer.get(0).unwrap();

    assert_eq!(b"GPGGA", id.as_bytes());
    assert_eq!(Some(SentenceType::GGA), SentenceType::from_id(id));
}

#[test]
fn test_tokenize_newline_only() {
    let tokenizer = Tokenizer::new(b"GPZDA,201530.00,04,07,2002,00,00*60\n");

    assert_eq!(7, tokenizer.len());
    assert_eq!(b"00", tokenizer.get(6).unwrap().as_bytes());
}

#[test]
fn test_tokenize_no_checksum() {
    let tokenizer = Tokenizer::new(b"$GPZDA,201530.00,04,07,2002,00,00\r\n");

    assert_eq!(7, tokenizer.len());
    assert_eq!(b"00", tokenizer.get(6).unwrap().as_bytes());
}

#[test]
fn test_tokenize_star_not_checksum() {
    let tokenizer = Tokenizer::new(b"GPXXX,1*4");

    assert_eq!(2, tokenizer.len());
    assert_eq!(b"1*4", tokenizer.get(1).unwrap().as_bytes());
}

#[test]
fn test_tokenize_drops_empty() {
    let tokenizer = Tokenizer::new(b"$GPGSA,A,3,04,,,09*00\r\n");

    assert_eq!(vec!["GPGSA", "A", "3", "04", "09"], strings(&tokenizer));
}

#[test]
fn test_tokenize_limit() {
    let tokenizer = Tokenizer::new(b"GPGSV,3,1,11,03,03,111,00,04,15,270,00,06,01,010,00,13,06,292,00");

    assert_eq!(MAX_TOKENS, tokenizer.len());
    assert_eq!(b"00", tokenizer.get(15).unwrap().as_bytes());
    assert_eq!(None, tokenizer.get(16));
}

#[test]
fn test_tokenize_out_of_range() {
    let tokenizer = Tokenizer::new(b"$\r\n");

    assert!(tokenizer.is_empty());
    assert_eq!(None, tokenizer.get(0));
}

#[test]
fn test_token() {
    let tokenizer = Tokenizer::new(b"GPRMC,A,230394");
    let date = tokenizer.get(2).unwrap();

    assert_eq!(b'A', tokenizer.get(1).unwrap().first());
    assert_eq!(Some(&b"03"[..]), date.slice(2, 4));
    assert_eq!(None, date.slice(4, 7));
    assert_eq!(Some(230394), date.to_int());
}

#[test]
fn test_sentence_type() {
    let tokenizer = Tokenizer::new(b"GNRMC,GLZDA,GPTXT,GP");

    let kind = |i| SentenceType::from_id(tokenizer.get(i).unwrap());

    assert_eq!(Some(SentenceType::RMC), kind(0));
    assert_eq!(Some(SentenceType::ZDA), kind(1));
    assert_eq!(Some(SentenceType::Unrecognized), kind(2));
    assert_eq!(None, kind(3));
}
