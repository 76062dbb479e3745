use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, error};

use crate::{errors::CloseErrorKind, Container};

// The process-wide default container. It is an ordinary container instance
// in a swappable slot: installing a new one closes the previous one, so
// registrations from an earlier lifetime never leak into the next.
static GLOBAL: Lazy<RwLock<Option<Container>>> = Lazy::new(|| RwLock::new(None));

/// A handle on the process-wide default container, if one is installed.
#[must_use]
pub fn global() -> Option<Container> {
    GLOBAL.read().clone()
}

/// Installs `container` as the process-wide default. Any previously
/// installed default is closed first; a failing finalizer is logged but
/// doesn't prevent the swap.
pub fn init_global(container: Container) {
    let previous = GLOBAL.write().replace(container);
    if let Some(previous) = previous {
        if let Err(err) = previous.close() {
            error!("{}", err);
        }
        debug!("Previous process-wide container closed");
    }
}

/// Removes and closes the process-wide default container. Intended for
/// test harness teardown.
///
/// # Errors
/// Returns [`CloseErrorKind::Finalize`] if any finalizer of the outgoing
/// container failed.
pub fn reset_global() -> Result<(), CloseErrorKind> {
    let previous = GLOBAL.write().take();
    match previous {
        Some(container) => container.close(),
        None => Ok(()),
    }
}
