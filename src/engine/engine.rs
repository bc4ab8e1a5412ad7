use crate::device::Device;
use crate::engine::callbacks;
use crate::engine::callbacks::Callbacks;
use crate::engine::context::EngineContext;
use crate::engine::context::Lifecycle;
use crate::engine::context::DEFAULT_INTERVAL;
use crate::engine::reactor::Reactor;
use crate::engine::spawner::Spawner;
use crate::engine::spawner::StdSpawner;
use crate::engine::spawner::DELIVERY_THREAD;
use crate::engine::spawner::REACTOR_THREAD;
use crate::engine::Command;
use crate::engine::CommandError;
use crate::nmea::NmeaReader;
use crate::nmea::ReaderState;

use nix::errno::Errno;
use nix::fcntl::fcntl;
use nix::fcntl::FcntlArg;
use nix::fcntl::OFlag;

use std::io;
use std::os::unix::io::AsRawFd;
use std::os::unix::io::RawFd;
use std::os::unix::net::UnixStream;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use thiserror::Error;

use tracing::debug;
use tracing::error;
use tracing::info;

/// Notifications that may wait for the delivery thread before producers block
const QUEUE_DEPTH: usize = 16;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unable to create control channel: {0}")]
    ControlChannel(#[source] io::Error),
    #[error("unable to make {0} non-blocking: {1}")]
    NonBlocking(&'static str, #[source] Errno),
    #[error("unable to start {0} thread: {1}")]
    Spawn(&'static str, #[source] io::Error),
    #[error("engine is not initialized")]
    NotInitialized,
    #[error(transparent)]
    Command(#[from] CommandError),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Options {
    /// Time between deliveries while a session is active
    pub min_interval: Duration,
    /// Notifications queued for delivery at most
    pub queue_depth: usize,
    /// Seconds the local clock is behind UTC, taken from the system clock when `None`
    pub utc_diff: Option<i64>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            min_interval: DEFAULT_INTERVAL,
            queue_depth: QUEUE_DEPTH,
            utc_diff: None,
        }
    }
}

/// Handle to a running GPS engine.
///
/// Creating the engine starts its reactor and delivery threads and powers the device on.
/// `start` and `stop` control sessions, during which fixes are delivered every `min_interval`.
/// Dropping the engine shuts it down.
pub struct Engine {
    control: Option<UnixStream>,
    reactor: Option<JoinHandle<()>>,
    delivery: Option<JoinHandle<()>>,
    context: Arc<EngineContext>,
}

impl Engine {
    pub fn init<D: Device>(
        device: D,
        callbacks: Callbacks,
        options: Options,
    ) -> Result<Engine, EngineError> {
        Engine::with_spawner(device, callbacks, options, Arc::new(StdSpawner))
    }

    /// Start an engine whose threads are created by `spawner`
    pub fn with_spawner<D: Device>(
        device: D,
        callbacks: Callbacks,
        options: Options,
        spawner: Arc<dyn Spawner>,
    ) -> Result<Engine, EngineError> {
        set_nonblocking(device.as_raw_fd()).map_err(|e| EngineError::NonBlocking("device", e))?;

        let (control, reactor_control) = UnixStream::pair().map_err(EngineError::ControlChannel)?;

        reactor_control
            .set_nonblocking(true)
            .map_err(EngineError::ControlChannel)?;

        let state = match options.utc_diff {
            Some(utc_diff) => ReaderState::with_utc_diff(utc_diff),
            None => ReaderState::new(),
        };

        let context = Arc::new(EngineContext::new(
            NmeaReader::new(state),
            options.min_interval,
        ));

        let (notifier, delivery) = callbacks::channel(callbacks, options.queue_depth);

        let delivery = spawner
            .spawn(DELIVERY_THREAD, Box::new(move || delivery.run()))
            .map_err(|e| EngineError::Spawn(DELIVERY_THREAD, e))?;

        let reactor = Reactor::new(
            device,
            reactor_control,
            context.clone(),
            notifier,
            spawner.clone(),
        );

        let reactor = spawner
            .spawn(REACTOR_THREAD, Box::new(move || reactor.run()))
            .map_err(|e| EngineError::Spawn(REACTOR_THREAD, e))?;

        debug!("GPS engine initialized");

        Ok(Engine {
            control: Some(control),
            reactor: Some(reactor),
            delivery: Some(delivery),
            context,
        })
    }

    /// Begin a session
    pub fn start(&self) -> Result<(), EngineError> {
        self.send(Command::Start)
    }

    /// End the current session
    pub fn stop(&self) -> Result<(), EngineError> {
        self.send(Command::Stop)
    }

    /// Change the time between deliveries, zero selects the default
    pub fn set_min_interval(&self, interval: Duration) {
        self.context.set_min_interval(interval);
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.context.lifecycle()
    }

    /// Shut the engine down, waiting for its threads.
    ///
    /// Ends any active session, reports `EngineOff` and powers the device off.  Calling it again
    /// does nothing.
    pub fn cleanup(&mut self) {
        let control = match self.control.take() {
            Some(c) => c,
            None => return,
        };

        info!("shutting down GPS engine");

        match Command::Quit.send(&control) {
            Ok(()) => {
                join(self.reactor.take(), REACTOR_THREAD);
                drop(control);
            }
            Err(e) => {
                // the hangup stops the reactor instead
                error!("{}", e);
                drop(control);
                join(self.reactor.take(), REACTOR_THREAD);
            }
        }

        join(self.delivery.take(), DELIVERY_THREAD);

        debug!("GPS engine shut down");
    }

    fn send(&self, command: Command) -> Result<(), EngineError> {
        let control = self.control.as_ref().ok_or(EngineError::NotInitialized)?;

        command.send(control)?;

        Ok(())
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn set_nonblocking(fd: RawFd) -> Result<(), Errno> {
    let flags = OFlag::from_bits_truncate(fcntl(fd, FcntlArg::F_GETFL)?);

    fcntl(fd, FcntlArg::F_SETFL(flags | OFlag::O_NONBLOCK))?;

    Ok(())
}

fn join(handle: Option<JoinHandle<()>>, name: &str) {
    if let Some(handle) = handle {
        if handle.join().is_err() {
            error!("{} thread panicked", name);
        }
    }
}
