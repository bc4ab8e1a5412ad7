use anyhow::Context;
use anyhow::Result;

use clap::Parser;

use gps_engine::configuration::Configuration;
use gps_engine::device::SerialDevice;
use gps_engine::engine::Callbacks;
use gps_engine::engine::Engine;
use gps_engine::gps::Capabilities;
use gps_engine::gps::Fix;
use gps_engine::gps::SatelliteStatus;
use gps_engine::gps::Status;

use serde_json::Value;

use std::convert::TryFrom;
use std::path::PathBuf;

use tokio::runtime;
use tokio::signal;

use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::Level;

use tracing_subscriber::filter::EnvFilter;

/// Print GPS fixes as JSON
#[derive(Parser)]
#[clap(about)]
struct Args {
    /// Configuration file
    config: PathBuf,
    /// Also print satellites in view
    #[clap(long)]
    satellites: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Configuration::load(&args.config)
        .with_context(|| format!("failed to load configuration file {}", args.config.display()))?;

    start_tracing(&config);

    let device = SerialDevice::open(&config.gps)?;

    let mut engine = Engine::init(device, callbacks(args.satellites), config.gps.options())?;

    engine.start()?;

    let runtime = runtime::Builder::new_current_thread().enable_all().build()?;

    runtime.block_on(signal::ctrl_c())?;

    info!("interrupted, stopping");

    engine.stop()?;
    engine.cleanup();

    Ok(())
}

fn start_tracing(config: &Configuration) {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .finish();

    let filter = tracing::subscriber::with_default(subscriber, || {
        match EnvFilter::try_from(config.clone()) {
            Ok(f) => f,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        }
    });

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber).expect("no global subscriber has been set");
}

fn callbacks(satellites: bool) -> Callbacks {
    let mut callbacks = Callbacks {
        location: Some(Box::new(|fix: &Fix| println!("{}", Value::from(fix)))),
        status: Some(Box::new(|status: Status| info!("GPS status {:?}", status))),
        capabilities: Some(Box::new(|capabilities: Capabilities| {
            debug!("GPS capabilities {:?}", capabilities)
        })),
        ..Callbacks::default()
    };

    if satellites {
        callbacks.satellite_status = Some(Box::new(|status: &SatelliteStatus| {
            println!("{}", Value::from(status))
        }));
    }

    callbacks
}
