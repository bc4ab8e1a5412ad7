use serde_json::json;
use serde_json::Value;

/// Most satellites tracked at once
pub const MAX_SATELLITES: usize = 32;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SatelliteInfo {
    /// `None` when the PRN field was missing or malformed
    pub prn: Option<u32>,
    /// Degrees
    pub elevation: f32,
    /// Degrees true
    pub azimuth: f32,
    /// dB-Hz
    pub snr: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SatelliteStatus {
    satellites: Vec<SatelliteInfo>,
    /// Bit `prn - 1` is set for each satellite used in the current fix
    pub used_in_fix_mask: u32,
}

impl SatelliteStatus {
    pub fn satellites(&self) -> &[SatelliteInfo] {
        &self.satellites
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.satellites.len() >= MAX_SATELLITES
    }

    pub(crate) fn clear(&mut self) {
        self.satellites.clear();
    }

    pub(crate) fn push(&mut self, satellite: SatelliteInfo) -> bool {
        if self.is_full() {
            return false;
        }

        self.satellites.push(satellite);

        true
    }

    pub fn used_in_fix(&self, prn: u32) -> bool {
        match prn_bit(prn) {
            Some(bit) => self.used_in_fix_mask & bit != 0,
            None => false,
        }
    }
}

/// Mask bit for `prn`, `None` for PRNs the mask cannot hold
pub(crate) fn prn_bit(prn: u32) -> Option<u32> {
    if (1..=32).contains(&prn) {
        Some(1 << (prn - 1))
    } else {
        None
    }
}

impl From<&SatelliteStatus> for Value {
    fn from(status: &SatelliteStatus) -> Value {
        let satellites: Vec<Value> = status
            .satellites
            .iter()
            .map(|s| {
                json!({
                    "PRN":  s.prn,
                    "el":   s.elevation,
                    "az":   s.azimuth,
                    "ss":   s.snr,
                    "used": s.prn.map(|p| status.used_in_fix(p)).unwrap_or(false),
                })
            })
            .collect();

        json!({
            "class":      "SKY".to_string(),
            "satellites": satellites,
        })
    }
}
