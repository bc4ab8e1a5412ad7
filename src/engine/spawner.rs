use std::io;
use std::thread;
use std::thread::JoinHandle;

/// Name of the thread running the event loop
pub const REACTOR_THREAD: &str = "gps-reactor";

/// Name of the thread delivering fixes while a session is active
pub const DISPATCHER_THREAD: &str = "gps-dispatcher";

/// Name of the thread invoking consumer callbacks
pub const DELIVERY_THREAD: &str = "gps-delivery";

pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Starts the engine's named worker threads.
///
/// A host with its own thread management can supply its own implementation.
pub trait Spawner: Send + Sync {
    fn spawn(&self, name: &str, job: Job) -> io::Result<JoinHandle<()>>;
}

/// Spawns plain OS threads
#[derive(Clone, Copy, Debug, Default)]
pub struct StdSpawner;

impl Spawner for StdSpawner {
    fn spawn(&self, name: &str, job: Job) -> io::Result<JoinHandle<()>> {
        thread::Builder::new().name(name.to_string()).spawn(job)
    }
}
