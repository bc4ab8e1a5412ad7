use crate::gps::Capabilities;
use crate::gps::Fix;
use crate::gps::SatelliteStatus;
use crate::gps::Status;

use bytes::Bytes;

use std::fmt;

use tokio::sync::mpsc;

use tracing::debug;
use tracing::trace;

pub type LocationCallback = Box<dyn FnMut(&Fix) + Send>;
pub type SatelliteStatusCallback = Box<dyn FnMut(&SatelliteStatus) + Send>;
pub type NmeaCallback = Box<dyn FnMut(i64, &[u8]) + Send>;
pub type StatusCallback = Box<dyn FnMut(Status) + Send>;
pub type CapabilitiesCallback = Box<dyn FnMut(Capabilities) + Send>;

/// Consumer callbacks, all optional.
///
/// Callbacks run one at a time on the engine's delivery thread.  A callback must not call back
/// into the engine's lifecycle methods.
#[derive(Default)]
pub struct Callbacks {
    pub location: Option<LocationCallback>,
    pub satellite_status: Option<SatelliteStatusCallback>,
    /// Receives raw device bytes along with the time they were read in milliseconds since the
    /// Unix epoch
    pub nmea: Option<NmeaCallback>,
    pub status: Option<StatusCallback>,
    pub capabilities: Option<CapabilitiesCallback>,
}

impl Callbacks {
    fn registered(&self) -> Registered {
        let mut registered = Registered::empty();

        registered.set(Registered::LOCATION, self.location.is_some());
        registered.set(Registered::SATELLITE_STATUS, self.satellite_status.is_some());
        registered.set(Registered::NMEA, self.nmea.is_some());
        registered.set(Registered::STATUS, self.status.is_some());
        registered.set(Registered::CAPABILITIES, self.capabilities.is_some());

        registered
    }

    fn deliver(&mut self, notification: Notification) {
        trace!("delivering {:?}", notification);

        match notification {
            Notification::Location(fix) => {
                if let Some(cb) = self.location.as_mut() {
                    cb(&fix);
                }
            }
            Notification::SatelliteStatus(status) => {
                if let Some(cb) = self.satellite_status.as_mut() {
                    cb(&status);
                }
            }
            Notification::Nmea {
                timestamp,
                sentence,
            } => {
                if let Some(cb) = self.nmea.as_mut() {
                    cb(timestamp, &sentence);
                }
            }
            Notification::Status(status) => {
                if let Some(cb) = self.status.as_mut() {
                    cb(status);
                }
            }
            Notification::Capabilities(capabilities) => {
                if let Some(cb) = self.capabilities.as_mut() {
                    cb(capabilities);
                }
            }
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callbacks").field(&self.registered()).finish()
    }
}

bitflags! {
    /// Which callbacks the consumer registered
    pub(crate) struct Registered: u8 {
        const LOCATION         = 0x01;
        const SATELLITE_STATUS = 0x02;
        const NMEA             = 0x04;
        const STATUS           = 0x08;
        const CAPABILITIES     = 0x10;
    }
}

/// An immutable snapshot waiting for delivery
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    Location(Fix),
    SatelliteStatus(SatelliteStatus),
    Nmea { timestamp: i64, sentence: Bytes },
    Status(Status),
    Capabilities(Capabilities),
}

impl Notification {
    fn kind(&self) -> Registered {
        match self {
            Notification::Location(_) => Registered::LOCATION,
            Notification::SatelliteStatus(_) => Registered::SATELLITE_STATUS,
            Notification::Nmea { .. } => Registered::NMEA,
            Notification::Status(_) => Registered::STATUS,
            Notification::Capabilities(_) => Registered::CAPABILITIES,
        }
    }
}

/// Queues notifications for the delivery thread.
///
/// Notifications for callbacks that were not registered are dropped before queueing.  Sending
/// blocks while the queue is full, so it must never happen with the store locked.
#[derive(Clone, Debug)]
pub(crate) struct Notifier {
    sender: mpsc::Sender<Notification>,
    registered: Registered,
}

impl Notifier {
    pub fn wants_location(&self) -> bool {
        self.registered.contains(Registered::LOCATION)
    }

    pub fn wants_satellite_status(&self) -> bool {
        self.registered.contains(Registered::SATELLITE_STATUS)
    }

    pub fn wants_nmea(&self) -> bool {
        self.registered.contains(Registered::NMEA)
    }

    pub fn notify(&self, notification: Notification) {
        if !self.registered.contains(notification.kind()) {
            return;
        }

        if self.sender.blocking_send(notification).is_err() {
            debug!("delivery thread has exited, notification dropped");
        }
    }

    pub fn status(&self, status: Status) {
        self.notify(Notification::Status(status));
    }
}

/// Build a notifier and the delivery loop draining it
pub(crate) fn channel(callbacks: Callbacks, depth: usize) -> (Notifier, Delivery) {
    let (sender, receiver) = mpsc::channel(depth.max(1));

    let notifier = Notifier {
        sender,
        registered: callbacks.registered(),
    };

    let delivery = Delivery {
        callbacks,
        receiver,
    };

    (notifier, delivery)
}

/// Hands queued notifications to the consumer's callbacks
pub(crate) struct Delivery {
    callbacks: Callbacks,
    receiver: mpsc::Receiver<Notification>,
}

impl Delivery {
    /// Deliver until every notifier is dropped
    pub fn run(mut self) {
        debug!("delivery thread started");

        while let Some(notification) = self.receiver.blocking_recv() {
            self.callbacks.deliver(notification);
        }

        debug!("delivery thread finished");
    }
}
