use crate::nmea::NmeaReader;

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;

/// Interval used when the configured one is zero
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Where the engine is in its life
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Lifecycle {
    Quit,
    Initialized,
    Started,
}

/// State shared by the reactor, the periodic dispatcher and the engine handle.
///
/// The reader is plain data, so a lock poisoned by a panicking thread is still usable.
#[derive(Debug)]
pub(crate) struct EngineContext {
    store: Mutex<NmeaReader>,
    lifecycle: Mutex<Lifecycle>,
    min_interval: AtomicU64,
}

impl EngineContext {
    pub fn new(reader: NmeaReader, min_interval: Duration) -> Self {
        EngineContext {
            store: Mutex::new(reader),
            lifecycle: Mutex::new(Lifecycle::Initialized),
            min_interval: AtomicU64::new(millis(min_interval)),
        }
    }

    pub fn store(&self) -> MutexGuard<'_, NmeaReader> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        *self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_lifecycle(&self, lifecycle: Lifecycle) {
        *self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner) = lifecycle;
    }

    pub fn is_started(&self) -> bool {
        self.lifecycle() == Lifecycle::Started
    }

    /// The delivery interval, resetting a zero interval to `DEFAULT_INTERVAL`
    pub fn min_interval(&self) -> Duration {
        let interval = self.min_interval.load(Ordering::Relaxed);

        if interval == 0 {
            self.set_min_interval(DEFAULT_INTERVAL);

            return DEFAULT_INTERVAL;
        }

        Duration::from_millis(interval)
    }

    pub fn set_min_interval(&self, interval: Duration) {
        self.min_interval.store(millis(interval), Ordering::Relaxed);
    }
}

fn millis(interval: Duration) -> u64 {
    u64::try_from(interval.as_millis()).unwrap_or(u64::MAX)
}
