pub mod configuration;
pub mod device;
pub mod engine;
pub mod gps;
pub mod nmea;

#[macro_use]
extern crate bitflags;

#[cfg(test)]
#[macro_use]
extern crate assert_approx_eq;
