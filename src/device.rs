use crate::configuration::GpsConfig;

use anyhow::Context;
use anyhow::Result;

use std::convert::TryFrom;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Read;
use std::io::Write;
use std::os::unix::io::AsRawFd;
use std::os::unix::io::FromRawFd;
use std::os::unix::io::IntoRawFd;
use std::os::unix::io::RawFd;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use tokio_serial::SerialPortBuilder;

use tracing::debug;
use tracing::error;
use tracing::info;

/// A byte source the engine reads NMEA sentences from.
///
/// The engine makes the descriptor non-blocking and only reads from it.  Powering the receiver
/// and starting or stopping its output are left to the hooks, which default to doing nothing.
pub trait Device: Read + AsRawFd + Send + 'static {
    /// Called once on the reactor thread before the first read
    fn power_on(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Called once on the reactor thread after the last read
    fn power_off(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Called when a session starts
    fn start(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Called when a session stops
    fn stop(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Pulse length on the power line
const PULSE: Duration = Duration::from_micros(110);

/// Time the receiver needs after a power pulse
const SETTLE: Duration = Duration::from_secs(1);

/// A receiver whose power is toggled by pulsing a sysfs GPIO value file.
///
/// The same pulse switches the receiver on and off.
#[derive(Debug)]
pub struct PowerToggle {
    path: PathBuf,
    warned: bool,
}

impl PowerToggle {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        PowerToggle {
            path: path.into(),
            warned: false,
        }
    }

    pub fn toggle(&mut self) -> io::Result<()> {
        self.write(1)?;
        thread::sleep(PULSE);
        self.write(0)?;

        thread::sleep(SETTLE);

        debug!("toggled GPS power via {}", self.path.display());

        Ok(())
    }

    fn write(&mut self, value: u8) -> io::Result<()> {
        let mut file = match OpenOptions::new().read(true).write(true).open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                if !self.warned {
                    error!("unable to open {}: {}", self.path.display(), e);
                    self.warned = true;
                }

                return Err(e);
            }
        };

        file.write_all(format!("{}\n", value).as_bytes())
    }
}

/// A receiver attached to a serial port
#[derive(Debug)]
pub struct SerialDevice {
    pub name: String,
    file: File,
    power: Option<PowerToggle>,
}

impl SerialDevice {
    /// Open and configure the serial port named by `config`
    pub fn open(config: &GpsConfig) -> Result<Self> {
        let builder = SerialPortBuilder::try_from(config.clone())?;

        let port = builder
            .open_native()
            .with_context(|| format!("Failed to open GPS device {}", config.device))?;

        // Safety: the descriptor was just released by the serial port and is owned by nobody else
        let file = unsafe { File::from_raw_fd(port.into_raw_fd()) };

        info!("Opened NMEA serial port {}", config.device);

        Ok(SerialDevice {
            name: config.device.clone(),
            file,
            power: config.power_gpio.as_ref().map(PowerToggle::new),
        })
    }

    fn toggle_power(&mut self) -> io::Result<()> {
        match self.power.as_mut() {
            Some(power) => power.toggle(),
            None => Ok(()),
        }
    }
}

impl Read for SerialDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl AsRawFd for SerialDevice {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl Device for SerialDevice {
    fn power_on(&mut self) -> io::Result<()> {
        debug!("powering on {}", self.name);

        self.toggle_power()
    }

    fn power_off(&mut self) -> io::Result<()> {
        debug!("powering off {}", self.name);

        self.toggle_power()
    }

    fn start(&mut self) -> io::Result<()> {
        debug!("GPS device {} start", self.name);

        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        debug!("GPS device {} stop", self.name);

        Ok(())
    }
}
