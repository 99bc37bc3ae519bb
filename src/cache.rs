use parking_lot::{Condvar, Mutex};
use std::thread::ThreadId;

use crate::any::{RcAny, TypeInfo};

enum SlotState {
    Pending,
    Ready(RcAny),
    Abandoned,
}

/// Single-assignment cell of a shared definition.
///
/// The first caller inserts it pending and constructs the instance on its own thread,
/// concurrent callers wait on it.
pub(crate) struct CacheSlot {
    owner: ThreadId,
    type_info: TypeInfo,
    state: Mutex<SlotState>,
    ready: Condvar,
}

impl CacheSlot {
    #[inline]
    #[must_use]
    pub(crate) fn pending(owner: ThreadId, type_info: TypeInfo) -> Self {
        Self {
            owner,
            type_info,
            state: Mutex::new(SlotState::Pending),
            ready: Condvar::new(),
        }
    }

    /// Thread constructing the instance
    #[inline]
    #[must_use]
    pub(crate) const fn owner(&self) -> ThreadId {
        self.owner
    }

    #[inline]
    #[must_use]
    pub(crate) const fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    #[must_use]
    pub(crate) fn is_pending(&self) -> bool {
        matches!(*self.state.lock(), SlotState::Pending)
    }

    /// Published instance, if any
    #[must_use]
    pub(crate) fn get(&self) -> Option<RcAny> {
        match &*self.state.lock() {
            SlotState::Ready(value) => Some(value.clone()),
            SlotState::Pending | SlotState::Abandoned => None,
        }
    }

    /// Blocks while the slot is pending.
    /// Returns `None` if the construction was abandoned.
    #[must_use]
    pub(crate) fn wait(&self) -> Option<RcAny> {
        let mut state = self.state.lock();
        loop {
            match &*state {
                SlotState::Ready(value) => return Some(value.clone()),
                SlotState::Abandoned => return None,
                SlotState::Pending => {}
            }
            self.ready.wait(&mut state);
        }
    }

    pub(crate) fn publish(&self, value: RcAny) {
        *self.state.lock() = SlotState::Ready(value);
        self.ready.notify_all();
    }

    pub(crate) fn abandon(&self) {
        *self.state.lock() = SlotState::Abandoned;
        self.ready.notify_all();
    }
}
