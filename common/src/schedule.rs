use std::{
    cell::RefCell,
    collections::BTreeMap,
    fmt::Debug,
    rc::Rc,
};

use tracing::trace;

// opaque identifier for a pending timer
//
// handles are never reused by a single scheduler, so clearing a handle whose timer has
// already fired is harmless
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TimerHandle(pub u64);

pub type Task = Box<dyn FnOnce()>;

// everything time-dependent on the pages (staggered reveals, the typing loop, banner
// dismissal, debounce and throttle) is expressed against this trait
//
// the browser implementation lives in the webapp and wraps gloo-timers; tests drive a
// ManualScheduler instead.  both are cheap to clone and share their pending timers
pub trait Scheduler {
    fn set_timeout(&self, delay_ms: u32, task: Task) -> TimerHandle;

    fn clear_timeout(&self, handle: TimerHandle);
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
    fn set_timeout(&self, delay_ms: u32, task: Task) -> TimerHandle {
        (**self).set_timeout(delay_ms, task)
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        (**self).clear_timeout(handle)
    }
}

// virtual clock
//
// tasks are keyed by (due time, sequence number) so that timers with equal deadlines
// fire in the order they were scheduled, which is what the browser guarantees for
// setTimeout as well
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualInner>>,
}

#[derive(Default)]
struct ManualInner {
    now: u64,
    next_id: u64,
    queue: BTreeMap<(u64, u64), Task>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.inner.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    // run every task that falls due within the next `ms` milliseconds
    //
    // the borrow on the queue is released before each task runs, since tasks routinely
    // schedule follow-up timers (the typing loop reschedules itself on every tick)
    pub fn advance(&self, ms: u64) {
        let target = self.inner.borrow().now + ms;

        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();

                match inner.queue.first_key_value() {
                    Some((&(due, _), _)) if due <= target => {
                        let entry = inner.queue.pop_first();
                        inner.now = due;
                        entry
                    }
                    _ => None,
                }
            };

            match next {
                Some(((due, id), task)) => {
                    trace!(due, id, "firing virtual timer");
                    task();
                }
                None => break,
            }
        }

        self.inner.borrow_mut().now = target;
    }

    // drain everything, however far in the future
    //
    // only safe for finite task chains; the typing cycle never drains
    pub fn run_until_idle(&self) {
        loop {
            let due = match self.inner.borrow().queue.first_key_value() {
                Some((&(due, _), _)) => due,
                None => break,
            };

            let now = self.now();
            self.advance(due.saturating_sub(now));
        }
    }
}

impl Scheduler for ManualScheduler {
    fn set_timeout(&self, delay_ms: u32, task: Task) -> TimerHandle {
        let mut inner = self.inner.borrow_mut();

        let id = inner.next_id;
        inner.next_id += 1;

        let due = inner.now + u64::from(delay_ms);
        inner.queue.insert((due, id), task);

        TimerHandle(id)
    }

    fn clear_timeout(&self, handle: TimerHandle) {
        self.inner
            .borrow_mut()
            .queue
            .retain(|&(_, id), _| id != handle.0);
    }
}

impl Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();

        f.debug_struct("ManualScheduler")
            .field("now", &inner.now)
            .field("pending", &inner.queue.len())
            .finish()
    }
}
