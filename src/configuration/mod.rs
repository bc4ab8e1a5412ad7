mod configuration;
mod configuration_error;
mod gps_config;

pub use configuration::Configuration;
pub use configuration_error::ConfigurationError;
pub use gps_config::GpsConfig;
