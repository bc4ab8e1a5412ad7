use crate::configuration::ConfigurationError;
use crate::engine::Options;

use serde::Deserialize;

use std::convert::TryFrom;
use std::time::Duration;

use tokio_serial::DataBits;
use tokio_serial::FlowControl;
use tokio_serial::Parity;
use tokio_serial::SerialPortBuilder;
use tokio_serial::StopBits;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct GpsConfig {
    pub device: String,
    pub baud_rate: Option<u32>,
    pub framing: Option<String>,
    pub flow_control: Option<String>,
    /// Milliseconds between fix deliveries
    pub min_interval: Option<u64>,
    /// sysfs GPIO value file that toggles receiver power
    pub power_gpio: Option<String>,
}

impl GpsConfig {
    pub fn options(&self) -> Options {
        let mut options = Options::default();

        if let Some(i) = self.min_interval {
            options.min_interval = Duration::from_millis(i);
        }

        options
    }
}

impl TryFrom<GpsConfig> for SerialPortBuilder {
    type Error = ConfigurationError;

    fn try_from(device: GpsConfig) -> Result<SerialPortBuilder, ConfigurationError> {
        let mut baud_rate = 9600;
        let mut data_bits = DataBits::Eight;
        let mut flow_control = FlowControl::None;
        let mut parity = Parity::None;
        let mut stop_bits = StopBits::Two;

        if let Some(b) = device.baud_rate {
            baud_rate = b;
        }

        if let Some(f) = device.framing {
            let framing: Vec<char> = f.chars().collect();

            if framing.len() != 3 {
                return Err(ConfigurationError::InvalidFraming(f));
            }

            data_bits = match framing[0] {
                '8' => DataBits::Eight,
                '7' => DataBits::Seven,
                '6' => DataBits::Six,
                '5' => DataBits::Five,
                c => return Err(ConfigurationError::InvalidDataBits(c)),
            };

            parity = match framing[1] {
                'N' => Parity::None,
                'O' => Parity::Odd,
                'E' => Parity::Even,
                c => return Err(ConfigurationError::InvalidParity(c)),
            };

            stop_bits = match framing[2] {
                '1' => StopBits::One,
                '2' => StopBits::Two,
                c => return Err(ConfigurationError::InvalidStopBits(c)),
            };
        };

        if let Some(f) = device.flow_control {
            flow_control = match f.as_str() {
                "H" => FlowControl::Hardware,
                "S" => FlowControl::Software,
                "N" => FlowControl::None,
                _ => return Err(ConfigurationError::InvalidFlowControl(f)),
            };
        }

        Ok(tokio_serial::new(device.device, baud_rate)
            .data_bits(data_bits)
            .flow_control(flow_control)
            .parity(parity)
            .stop_bits(stop_bits))
    }
}
