#![no_main]
use libfuzzer_sys::fuzz_target;

use gps_engine::nmea::NmeaReader;
use gps_engine::nmea::ReaderState;

fuzz_target!(|input: &[u8]| {
    let mut reader = NmeaReader::new(ReaderState::with_utc_diff(0));

    reader.extend(input);

    let state = reader.state_mut();
    let _ = state.take_fix();
    let _ = state.take_satellite_status();
});
