mod callbacks;
mod command;
mod context;
mod dispatcher;
mod engine;
mod reactor;
mod spawner;

pub use callbacks::Callbacks;
pub use callbacks::CapabilitiesCallback;
pub use callbacks::LocationCallback;
pub use callbacks::NmeaCallback;
pub use callbacks::Notification;
pub use callbacks::SatelliteStatusCallback;
pub use callbacks::StatusCallback;
pub use command::Command;
pub use command::CommandError;
pub use context::Lifecycle;
pub use context::DEFAULT_INTERVAL;
pub use engine::Engine;
pub use engine::EngineError;
pub use engine::Options;
pub use spawner::Job;
pub use spawner::Spawner;
pub use spawner::StdSpawner;
pub use spawner::DELIVERY_THREAD;
pub use spawner::DISPATCHER_THREAD;
pub use spawner::REACTOR_THREAD;


#[cfg(test)]
mod test_command;
