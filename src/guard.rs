use core::cell::RefCell;

use crate::any::TypeInfo;

thread_local! {
    // Capability keys currently being resolved on this thread, in resolution
    // order. Keys are scoped to their container so nested resolution through
    // several containers on one thread can't collide.
    static IN_PROGRESS: RefCell<Vec<ChainEntry>> = const { RefCell::new(Vec::new()) };
}

#[derive(Clone, Copy)]
struct ChainEntry {
    container: usize,
    type_info: TypeInfo,
}

/// RAII marker for a capability key being resolved on the current call
/// stack. Re-entering a key before its guard is dropped is a cycle, and
/// fails with the chain of keys that led back to it.
#[derive(Debug)]
pub(crate) struct ChainGuard;

impl ChainGuard {
    pub(crate) fn enter(container: usize, type_info: TypeInfo) -> Result<Self, Box<[TypeInfo]>> {
        IN_PROGRESS.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack
                .iter()
                .any(|entry| entry.container == container && entry.type_info.id == type_info.id)
            {
                let mut chain: Vec<TypeInfo> = stack
                    .iter()
                    .filter(|entry| entry.container == container)
                    .map(|entry| entry.type_info)
                    .collect();
                chain.push(type_info);
                return Err(chain.into_boxed_slice());
            }
            stack.push(ChainEntry { container, type_info });
            Ok(Self)
        })
    }
}

impl Drop for ChainGuard {
    fn drop(&mut self) {
        IN_PROGRESS.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}
