use chrono::TimeZone;
use chrono::Utc;

use serde_json::json;
use serde_json::Map;
use serde_json::Value;

bitflags! {
    /// Fields of a [`Fix`] holding a value from the most recent relevant sentence
    #[derive(Default)]
    pub struct LocationFlags: u16 {
        const LAT_LONG = 0x0001;
        const ALTITUDE = 0x0002;
        const SPEED    = 0x0004;
        const BEARING  = 0x0008;
        const ACCURACY = 0x0010;
    }
}

/// The receiver's accuracy value when it has none
pub const NO_ACCURACY: f32 = 99.99;

/// A position and velocity solution.
///
/// Only fields named in `flags` carry data; the rest hold whatever the last sentence left behind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fix {
    pub flags: LocationFlags,
    /// Degrees, negative south
    pub latitude: f64,
    /// Degrees, negative west
    pub longitude: f64,
    /// Meters above mean sea level
    pub altitude: f64,
    /// Knots over ground, as reported
    pub speed: f32,
    /// Degrees true
    pub bearing: f32,
    /// Dilution of precision, as reported
    pub accuracy: f32,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl Fix {
    pub fn has(&self, flags: LocationFlags) -> bool {
        self.flags.contains(flags)
    }

    pub fn is_valid(&self) -> bool {
        !self.flags.is_empty()
    }
}

impl From<&Fix> for Value {
    fn from(fix: &Fix) -> Value {
        let mut tpv = Map::new();

        tpv.insert("class".to_string(), json!("TPV"));

        if let Some(time) = Utc.timestamp_millis_opt(fix.timestamp).single() {
            tpv.insert("time".to_string(), json!(time.to_rfc3339()));
        }

        if fix.has(LocationFlags::LAT_LONG) {
            tpv.insert("lat".to_string(), json!(fix.latitude));
            tpv.insert("lon".to_string(), json!(fix.longitude));
        }

        if fix.has(LocationFlags::ALTITUDE) {
            tpv.insert("altMSL".to_string(), json!(fix.altitude));
        }

        if fix.has(LocationFlags::SPEED) {
            tpv.insert("speed".to_string(), json!(fix.speed));
        }

        if fix.has(LocationFlags::BEARING) {
            tpv.insert("track".to_string(), json!(fix.bearing));
        }

        if fix.has(LocationFlags::ACCURACY) {
            tpv.insert("dop".to_string(), json!(fix.accuracy));
        }

        Value::Object(tpv)
    }
}
