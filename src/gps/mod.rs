mod fix;
mod satellite;
mod status;

pub use fix::Fix;
pub use fix::LocationFlags;
pub use fix::NO_ACCURACY;
pub use satellite::SatelliteInfo;
pub use satellite::SatelliteStatus;
pub use satellite::MAX_SATELLITES;
pub use status::Capabilities;
pub use status::Status;

pub(crate) use satellite::prn_bit;

#[cfg(test)]
mod test;
