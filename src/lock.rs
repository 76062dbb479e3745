use core::any::TypeId;
use parking_lot::Mutex;
use std::{collections::BTreeMap, sync::Arc};

/// Per-capability construction locks for singletons.
///
/// Holding the lock of a key while its producer runs gives at-most-once
/// construction under contention: racing resolvers block on the same key
/// and re-read the cache once the winner has published its instance, while
/// resolution of other keys proceeds on its own locks. One entry lives per
/// singleton key for the life of the container.
#[derive(Default)]
pub(crate) struct KeyLocks {
    entries: Mutex<BTreeMap<TypeId, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    #[must_use]
    pub(crate) fn obtain(&self, type_id: TypeId) -> Arc<Mutex<()>> {
        self.entries.lock().entry(type_id).or_default().clone()
    }
}
