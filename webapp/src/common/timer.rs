use std::{cell::RefCell, collections::HashMap, rc::Rc};

use gloo_timers::callback::Timeout;

use folio_common::schedule::{Scheduler, Task, TimerHandle};

// setTimeout-backed scheduler
//
// pending timeouts are kept so that they can be cancelled.  a timeout that fires takes
// itself out of the table and is dropped once its task has returned, which frees the
// closure; wasm-bindgen defers that free while the closure is still on the stack
#[derive(Clone, Default)]
pub struct TimerScheduler {
    inner: Rc<RefCell<Pending<Timeout>>>,
}

// id -> live timer
struct Pending<T> {
    next_id: u64,
    timers: HashMap<u64, T>,
}

impl<T> Default for Pending<T> {
    fn default() -> Self {
        Pending {
            next_id: 0,
            timers: HashMap::new(),
        }
    }
}

impl<T> Pending<T> {
    fn reserve(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn insert(&mut self, id: u64, timer: T) {
        self.timers.insert(id, timer);
    }

    // hands the timer back so the caller decides when it is dropped
    fn take(&mut self, id: u64) -> Option<T> {
        self.timers.remove(&id)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.timers.len()
    }
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for TimerScheduler {
    fn set_timeout(&self, delay_ms: u32, task: Task) -> TimerHandle {
        let id = self.inner.borrow_mut().reserve();

        let pending = Rc::downgrade(&self.inner);
        let timeout = Timeout::new(delay_ms, move || {
            let fired = pending
                .upgrade()
                .and_then(|pending| pending.borrow_mut().take(id));

            task();

            drop(fired);
        });

        self.inner.borrow_mut().insert(id, timeout);
        TimerHandle(id)
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        let cancelled = self.inner.borrow_mut().take(handle.0);

        if let Some(timeout) = cancelled {
            let _ = timeout.cancel();
        }
    }
}
