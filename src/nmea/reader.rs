use crate::gps::prn_bit;
use crate::gps::Fix;
use crate::gps::LocationFlags;
use crate::gps::SatelliteInfo;
use crate::gps::SatelliteStatus;
use crate::gps::NO_ACCURACY;
use crate::nmea::field::parse_float;
use crate::nmea::field::parse_int;
use crate::nmea::field::FieldError;
use crate::nmea::LineFramer;
use crate::nmea::SentenceType;
use crate::nmea::Token;
use crate::nmea::Tokenizer;

use chrono::naive::NaiveDate;
use chrono::naive::NaiveDateTime;
use chrono::naive::NaiveTime;
use chrono::Duration;
use chrono::Local;
use chrono::Offset;
use chrono::TimeZone;
use chrono::Utc;

use tracing::debug;
use tracing::trace;

/// Lines shorter than this cannot hold a sentence worth parsing
pub const MIN_SENTENCE_LEN: usize = 9;

/// Satellites listed in one GSV sentence
const SATELLITES_PER_GSV: usize = 4;

type FieldResult = Result<(), FieldError>;

/// Cumulative state built from received sentences.
///
/// Date and time arrive in different sentences, so the last known date is cached and merged with
/// each time of day.
#[derive(Debug)]
pub struct ReaderState {
    date: Option<NaiveDate>,
    utc_diff: i64,
    sv_status_changed: bool,
    fix: Fix,
    sv_status: SatelliteStatus,
}

impl ReaderState {
    /// Create a reader, snapshotting the current UTC offset of the local clock
    pub fn new() -> Self {
        ReaderState::with_utc_diff(current_utc_diff())
    }

    /// Create a reader whose local clock is `utc_diff` seconds behind UTC
    pub fn with_utc_diff(utc_diff: i64) -> Self {
        ReaderState {
            date: None,
            utc_diff,
            sv_status_changed: false,
            fix: Fix::default(),
            sv_status: SatelliteStatus::default(),
        }
    }

    pub fn fix(&self) -> &Fix {
        &self.fix
    }

    pub fn satellite_status(&self) -> &SatelliteStatus {
        &self.sv_status
    }

    pub fn satellite_status_changed(&self) -> bool {
        self.sv_status_changed
    }

    /// UTC date of the last dated sentence, if any
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Seconds between UTC and the local clock at startup
    pub fn utc_diff(&self) -> i64 {
        self.utc_diff
    }

    /// Copy out the fix and mark it consumed, `None` when nothing is valid
    pub fn take_fix(&mut self) -> Option<Fix> {
        if !self.fix.is_valid() {
            return None;
        }

        let fix = self.fix.clone();
        self.fix.flags = LocationFlags::empty();

        Some(fix)
    }

    /// Copy out the satellite status if it changed since the last call
    pub fn take_satellite_status(&mut self) -> Option<SatelliteStatus> {
        if !self.sv_status_changed {
            return None;
        }

        self.sv_status_changed = false;

        Some(self.sv_status.clone())
    }

    /// Parse one complete line and apply it.
    pub fn parse(&mut self, line: &[u8]) {
        trace!("received {:?}", String::from_utf8_lossy(line));

        if line.len() < MIN_SENTENCE_LEN {
            trace!("too short, discarded");
            return;
        }

        let tokens = Tokenizer::new(line);
        trace!("found {} tokens", tokens.len());

        let id = match tokens.get(0) {
            Some(id) => id,
            None => return,
        };

        let kind = match SentenceType::from_id(id) {
            Some(kind) => kind,
            None => {
                debug!("sentence id {:?} too short, ignored", id);
                return;
            }
        };

        match kind {
            SentenceType::GGA => self.gga(&tokens),
            SentenceType::GLL => self.gll(&tokens),
            SentenceType::GSA => self.gsa(&tokens),
            SentenceType::GSV => self.gsv(&tokens),
            SentenceType::RMC => self.rmc(&tokens),
            SentenceType::VTG => self.vtg(&tokens),
            SentenceType::ZDA => self.zda(&tokens),
            SentenceType::Unrecognized => debug!("unknown sentence {:?}", id),
        }

        if self.fix.is_valid() {
            trace!("fix now {:?}", self.fix);
        }
    }

    fn gga(&mut self, tokens: &Tokenizer) {
        skipped("time", self.update_time(tokens.get(1)));
        skipped(
            "position",
            self.update_latlong(tokens.get(2), tokens.get(3), tokens.get(4), tokens.get(5)),
        );
        skipped("altitude", self.update_altitude(tokens.get(9)));
    }

    fn gll(&mut self, tokens: &Tokenizer) {
        // a time of day is meaningless until a date has been seen
        if indicator(tokens.get(6)) != Some(b'A') || self.date.is_none() {
            return;
        }

        skipped("time", self.update_time(tokens.get(5)));
        skipped(
            "position",
            self.update_latlong(tokens.get(1), tokens.get(2), tokens.get(3), tokens.get(4)),
        );
    }

    fn gsa(&mut self, tokens: &Tokenizer) {
        match indicator(tokens.get(2)) {
            Some(mode) if mode != b'1' => (),
            _ => return,
        }

        skipped("accuracy", self.update_accuracy(tokens.get(15)));

        self.sv_status.used_in_fix_mask = 0;

        for prn in (3..=14).filter_map(|i| tokens.get(i)).filter_map(|t| t.to_int()) {
            if let Some(bit) = prn_bit(prn) {
                self.sv_status.used_in_fix_mask |= bit;
                self.sv_status_changed = true;
            }
        }

        trace!("used in fix mask {:#010x}", self.sv_status.used_in_fix_mask);
    }

    fn gsv(&mut self, tokens: &Tokenizer) {
        let total = match int(tokens.get(3)) {
            Some(total) if total > 0 => total as usize,
            _ => return,
        };

        let sentences = int(tokens.get(1));
        let sentence = int(tokens.get(2));

        if sentence == Some(1) {
            self.sv_status_changed = false;
            self.sv_status.clear();
        }

        for i in 0..SATELLITES_PER_GSV {
            if self.sv_status.len() >= total {
                break;
            }

            let base = 4 + i * 4;

            let satellite = SatelliteInfo {
                prn: int(tokens.get(base)),
                elevation: float(tokens.get(base + 1)) as f32,
                azimuth: float(tokens.get(base + 2)) as f32,
                snr: float(tokens.get(base + 3)) as f32,
            };

            if !self.sv_status.push(satellite) {
                break;
            }
        }

        if sentence.is_some() && sentence == sentences {
            self.sv_status_changed = true;
        }

        trace!(
            "GSV {:?} of {:?}, {} of {} satellites",
            sentence,
            sentences,
            self.sv_status.len(),
            total
        );
    }

    fn rmc(&mut self, tokens: &Tokenizer) {
        if indicator(tokens.get(2)) != Some(b'A') {
            return;
        }

        skipped("date", self.update_date(tokens.get(9), tokens.get(1)));
        skipped(
            "position",
            self.update_latlong(tokens.get(3), tokens.get(4), tokens.get(5), tokens.get(6)),
        );
        skipped("bearing", self.update_bearing(tokens.get(8)));
        skipped("speed", self.update_speed(tokens.get(7)));
    }

    fn vtg(&mut self, tokens: &Tokenizer) {
        match indicator(tokens.get(9)) {
            Some(mode) if mode != b'N' => (),
            _ => return,
        }

        skipped("bearing", self.update_bearing(tokens.get(1)));
        skipped("speed", self.update_speed(tokens.get(5)));
    }

    fn zda(&mut self, tokens: &Tokenizer) {
        let time = tokens.get(1);
        let year = tokens.get(4);

        if time.is_none() || year.is_none() {
            return;
        }

        skipped(
            "date",
            self.update_calendar_date(tokens.get(2), tokens.get(3), year, time),
        );
    }

    // The cached date, seeded from the wall clock if no sentence has provided one yet
    fn current_date(&mut self) -> NaiveDate {
        match self.date {
            Some(date) => date,
            None => {
                let now = Local::now().naive_local() + Duration::seconds(self.utc_diff);
                let date = now.date();

                debug!("no date received yet, using {}", date);
                self.date = Some(date);

                date
            }
        }
    }

    fn set_timestamp(&mut self, date: NaiveDate, time: NaiveTime) {
        let fix_time = Utc.from_utc_datetime(&NaiveDateTime::new(date, time));

        self.fix.timestamp = fix_time.timestamp_millis();
    }

    fn update_time(&mut self, token: Option<Token>) -> FieldResult {
        let token = time_token(token)?;
        let date = self.current_date();
        let time = parse_time(token)?;

        self.set_timestamp(date, time);

        Ok(())
    }

    // RMC date, ddmmyy
    fn update_date(&mut self, date: Option<Token>, time: Option<Token>) -> FieldResult {
        let date = date.ok_or(FieldError::Missing)?;

        if date.len() != 6 {
            trace!("date not properly formatted: {:?}", date);
            return Err(FieldError::Malformed);
        }

        let day = digits(date, 0, 2)?;
        let month = digits(date, 2, 4)?;
        let year = digits(date, 4, 6)? + 2000;

        let date = ymd(year, month, day)?;
        let time = parse_time(time_token(time)?)?;

        self.date = Some(date);
        self.set_timestamp(date, time);

        Ok(())
    }

    // ZDA date, separate dd, mm and yyyy fields
    fn update_calendar_date(
        &mut self,
        day: Option<Token>,
        month: Option<Token>,
        year: Option<Token>,
        time: Option<Token>,
    ) -> FieldResult {
        let day = day.ok_or(FieldError::Missing)?;
        let month = month.ok_or(FieldError::Missing)?;
        let year = year.ok_or(FieldError::Missing)?;

        if day.len() < 2 || month.len() < 2 || year.len() < 4 {
            return Err(FieldError::TooShort);
        }

        let date = ymd(digits(year, 0, 4)?, digits(month, 0, 2)?, digits(day, 0, 2)?)?;
        let time = parse_time(time_token(time)?)?;

        self.date = Some(date);
        self.set_timestamp(date, time);

        Ok(())
    }

    fn update_latlong(
        &mut self,
        latitude: Option<Token>,
        latitude_hemisphere: Option<Token>,
        longitude: Option<Token>,
        longitude_hemisphere: Option<Token>,
    ) -> FieldResult {
        let mut lat = coordinate(latitude)?;
        if indicator(latitude_hemisphere) == Some(b'S') {
            lat = -lat;
        }

        let mut lon = coordinate(longitude)?;
        if indicator(longitude_hemisphere) == Some(b'W') {
            lon = -lon;
        }

        self.fix.flags |= LocationFlags::LAT_LONG;
        self.fix.latitude = lat;
        self.fix.longitude = lon;

        Ok(())
    }

    fn update_altitude(&mut self, altitude: Option<Token>) -> FieldResult {
        let altitude = altitude.ok_or(FieldError::Missing)?;

        self.fix.flags |= LocationFlags::ALTITUDE;
        self.fix.altitude = altitude.to_float();

        Ok(())
    }

    fn update_bearing(&mut self, bearing: Option<Token>) -> FieldResult {
        let bearing = bearing.ok_or(FieldError::Missing)?;

        self.fix.flags |= LocationFlags::BEARING;
        self.fix.bearing = bearing.to_float() as f32;

        Ok(())
    }

    fn update_speed(&mut self, speed: Option<Token>) -> FieldResult {
        let speed = speed.ok_or(FieldError::Missing)?;

        self.fix.flags |= LocationFlags::SPEED;
        self.fix.speed = speed.to_float() as f32;

        Ok(())
    }

    fn update_accuracy(&mut self, accuracy: Option<Token>) -> FieldResult {
        let accuracy = accuracy.ok_or(FieldError::Missing)?;

        self.fix.accuracy = accuracy.to_float() as f32;

        // the receiver's way of saying it has no estimate
        if self.fix.accuracy == NO_ACCURACY {
            return Ok(());
        }

        self.fix.flags |= LocationFlags::ACCURACY;

        Ok(())
    }
}

impl Default for ReaderState {
    fn default() -> Self {
        ReaderState::new()
    }
}

/// The line framer and the state it feeds
#[derive(Debug, Default)]
pub struct NmeaReader {
    framer: LineFramer,
    state: ReaderState,
}

impl NmeaReader {
    pub fn new(state: ReaderState) -> Self {
        NmeaReader {
            framer: LineFramer::new(),
            state,
        }
    }

    /// Add one received byte, parsing the line it completes
    pub fn add(&mut self, byte: u8) {
        if let Some(line) = self.framer.push(byte) {
            self.state.parse(line);
        }
    }

    /// Add received bytes in order
    pub fn extend(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.add(byte);
        }
    }

    pub fn framer(&self) -> &LineFramer {
        &self.framer
    }

    pub fn state(&self) -> &ReaderState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ReaderState {
        &mut self.state
    }
}

fn current_utc_diff() -> i64 {
    -i64::from(Local::now().offset().fix().local_minus_utc())
}

fn skipped(field: &str, result: FieldResult) {
    if let Err(e) = result {
        trace!("{} not updated: {}", field, e);
    }
}

fn indicator(token: Option<Token>) -> Option<u8> {
    token.map(|t| t.first())
}

fn int(token: Option<Token>) -> Option<u32> {
    token.and_then(|t| t.to_int())
}

fn float(token: Option<Token>) -> f64 {
    token.map(|t| t.to_float()).unwrap_or(0.0)
}

fn digits(token: Token, start: usize, end: usize) -> Result<u32, FieldError> {
    token
        .slice(start, end)
        .and_then(parse_int)
        .ok_or(FieldError::Malformed)
}

fn ymd(year: u32, month: u32, day: u32) -> Result<NaiveDate, FieldError> {
    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or(FieldError::Malformed)
}

fn time_token(token: Option<Token>) -> Result<Token, FieldError> {
    let token = token.ok_or(FieldError::Missing)?;

    if token.len() < 6 {
        return Err(FieldError::TooShort);
    }

    Ok(token)
}

// hhmmss with optional fractional seconds
fn parse_time(token: Token) -> Result<NaiveTime, FieldError> {
    let hour = digits(token, 0, 2)?;
    let minute = digits(token, 2, 4)?;
    let seconds = token
        .slice(4, token.len())
        .map(parse_float)
        .unwrap_or(0.0);

    if seconds < 0.0 {
        return Err(FieldError::Malformed);
    }

    let millis = (seconds * 1000.0).round() as u32;

    NaiveTime::from_hms_milli_opt(hour, minute, millis / 1000, millis % 1000)
        .ok_or(FieldError::Malformed)
}

// ddmm.mmmm or dddmm.mmmm to decimal degrees
fn coordinate(token: Option<Token>) -> Result<f64, FieldError> {
    let token = token.ok_or(FieldError::Missing)?;

    if token.len() < 6 {
        trace!("coordinate is too short: {:?}", token);
        return Err(FieldError::TooShort);
    }

    let value = token.to_float();
    let degrees = (value.floor() / 100.0).trunc();
    let minutes = value - degrees * 100.0;

    Ok(degrees + minutes / 60.0)
}
