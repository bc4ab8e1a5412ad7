use crate::device::Device;
use crate::engine::callbacks::Notification;
use crate::engine::callbacks::Notifier;
use crate::engine::context::EngineContext;
use crate::engine::context::Lifecycle;
use crate::engine::dispatcher;
use crate::engine::spawner::Spawner;
use crate::engine::spawner::DISPATCHER_THREAD;
use crate::engine::Command;
use crate::gps::Capabilities;
use crate::gps::Status;

use bytes::Bytes;

use chrono::Utc;

use nix::errno::Errno;
use nix::poll::poll;
use nix::poll::PollFd;
use nix::poll::PollFlags;

use std::convert::TryFrom;
use std::io;
use std::io::Read;
use std::os::unix::io::AsRawFd;
use std::os::unix::net::UnixStream;
use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::trace;
use tracing::warn;

/// Size of one device read
const READ_SIZE: usize = 32;

/// Wait forever in `poll`
const NO_TIMEOUT: i32 = -1;

// Readiness that ends the event loop
fn fatal() -> PollFlags {
    PollFlags::POLLERR | PollFlags::POLLHUP | PollFlags::POLLNVAL
}

/// Why the event loop stopped
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Exit {
    Quit,
    Fatal,
}

/// The event loop.
///
/// Waits on the control channel and the device, feeds device bytes to the shared reader and runs
/// the start/stop/quit lifecycle.
pub(crate) struct Reactor<D: Device> {
    device: D,
    control: UnixStream,
    context: Arc<EngineContext>,
    notifier: Notifier,
    spawner: Arc<dyn Spawner>,
    dispatcher: Option<JoinHandle<()>>,
}

impl<D: Device> Reactor<D> {
    pub fn new(
        device: D,
        control: UnixStream,
        context: Arc<EngineContext>,
        notifier: Notifier,
        spawner: Arc<dyn Spawner>,
    ) -> Self {
        Reactor {
            device,
            control,
            context,
            notifier,
            spawner,
            dispatcher: None,
        }
    }

    /// Run until a quit command or a fatal readiness error
    pub fn run(mut self) {
        if let Err(e) = self.device.power_on() {
            error!("unable to power on GPS device: {}", e);
        }

        self.notifier.notify(Notification::Capabilities(
            Capabilities::MSB | Capabilities::MSA,
        ));

        self.notifier.status(Status::EngineOn);

        info!("GPS engine running");

        let exit = self.event_loop();

        debug!("event loop finished: {:?}", exit);

        self.shutdown();
    }

    fn event_loop(&mut self) -> Exit {
        let control_fd = self.control.as_raw_fd();
        let device_fd = self.device.as_raw_fd();

        loop {
            let mut fds = [
                PollFd::new(control_fd, PollFlags::POLLIN),
                PollFd::new(device_fd, PollFlags::POLLIN),
            ];

            match poll(&mut fds, NO_TIMEOUT) {
                Ok(_) => (),
                Err(Errno::EINTR) => continue,
                Err(e) => {
                    error!("poll failed: {}", e);
                    return Exit::Fatal;
                }
            }

            let control = fds[0].revents().unwrap_or_else(PollFlags::empty);
            let device = fds[1].revents().unwrap_or_else(PollFlags::empty);

            trace!("control {:?} device {:?}", control, device);

            if control.intersects(fatal()) || device.intersects(fatal()) {
                error!(
                    "error or hangup while waiting, control {:?} device {:?}",
                    control, device
                );

                return Exit::Fatal;
            }

            if control.contains(PollFlags::POLLIN) {
                if let Some(exit) = self.control() {
                    return exit;
                }
            }

            if device.contains(PollFlags::POLLIN) {
                self.drain();
            }
        }
    }

    // Read and run one command
    fn control(&mut self) -> Option<Exit> {
        let mut byte = [0u8; 1];

        loop {
            match self.control.read(&mut byte) {
                Ok(0) => {
                    debug!("control channel closed");
                    return Some(Exit::Quit);
                }
                Ok(_) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return None,
                Err(e) => {
                    error!("error reading control channel: {}", e);
                    return None;
                }
            }
        }

        let command = match Command::try_from(byte[0]) {
            Ok(c) => c,
            Err(e) => {
                warn!("{}", e);
                return None;
            }
        };

        debug!("received {:?} command", command);

        match command {
            Command::Quit => return Some(Exit::Quit),
            Command::Start => {
                if !self.start() {
                    return Some(Exit::Fatal);
                }
            }
            Command::Stop => self.stop(),
        }

        None
    }

    // Begin a session, false if the dispatcher could not be started
    fn start(&mut self) -> bool {
        if self.context.is_started() {
            debug!("already started");
            return true;
        }

        if let Err(e) = self.device.start() {
            error!("unable to start GPS device: {}", e);
        }

        self.notifier.status(Status::SessionBegin);
        self.context.set_lifecycle(Lifecycle::Started);

        let context = self.context.clone();
        let notifier = self.notifier.clone();

        let spawned = self.spawner.spawn(
            DISPATCHER_THREAD,
            Box::new(move || dispatcher::run(context, notifier)),
        );

        match spawned {
            Ok(handle) => {
                info!("GPS session started");
                self.dispatcher = Some(handle);

                true
            }
            Err(e) => {
                error!("could not create dispatcher thread: {}", e);
                self.context.set_lifecycle(Lifecycle::Initialized);

                false
            }
        }
    }

    fn stop(&mut self) {
        if !self.context.is_started() {
            debug!("not started");
            return;
        }

        if let Err(e) = self.device.stop() {
            error!("unable to stop GPS device: {}", e);
        }

        self.context.set_lifecycle(Lifecycle::Initialized);

        if let Some(handle) = self.dispatcher.take() {
            if handle.join().is_err() {
                error!("dispatcher thread panicked");
            }
        }

        self.notifier.status(Status::SessionEnd);

        info!("GPS session stopped");
    }

    // Read everything the device has available
    fn drain(&mut self) {
        let mut buffer = [0u8; READ_SIZE];

        loop {
            let n = match self.device.read(&mut buffer) {
                Ok(0) => {
                    trace!("device end of stream");
                    break;
                }
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    error!("error while reading from GPS device: {}", e);
                    break;
                }
            };

            let chunk = &buffer[..n];
            trace!("received {} bytes: {:?}", n, String::from_utf8_lossy(chunk));

            let timestamp = Utc::now().timestamp_millis();

            self.context.store().extend(chunk);

            if self.notifier.wants_nmea() {
                self.notifier.notify(Notification::Nmea {
                    timestamp,
                    sentence: Bytes::copy_from_slice(chunk),
                });
            }
        }
    }

    fn shutdown(&mut self) {
        self.stop();

        self.context.set_lifecycle(Lifecycle::Quit);
        self.notifier.status(Status::EngineOff);

        if let Err(e) = self.device.power_off() {
            error!("unable to power off GPS device: {}", e);
        }

        info!("GPS engine stopped");
    }
}
