use crate::engine::callbacks::Notification;
use crate::engine::callbacks::Notifier;
use crate::engine::context::EngineContext;

use std::sync::Arc;
use std::thread;

use tracing::debug;
use tracing::trace;

/// Deliver fresh fixes and satellite status until the session stops.
///
/// Runs at least one cycle.  Snapshots are taken with the store locked and queued after the lock
/// is released.
pub(crate) fn run(context: Arc<EngineContext>, notifier: Notifier) {
    debug!("dispatcher started");

    loop {
        dispatch(&context, &notifier);

        thread::sleep(context.min_interval());

        if !context.is_started() {
            break;
        }
    }

    debug!("dispatcher finished");
}

fn dispatch(context: &EngineContext, notifier: &Notifier) {
    if notifier.wants_location() {
        let fix = context.store().state_mut().take_fix();

        if let Some(fix) = fix {
            trace!("fix flags {:?}", fix.flags);
            notifier.notify(Notification::Location(fix));
        }
    }

    if notifier.wants_satellite_status() {
        let status = context.store().state_mut().take_satellite_status();

        if let Some(status) = status {
            trace!("{} satellites in view", status.len());
            notifier.notify(Notification::SatelliteStatus(status));
        }
    }
}
