use std::{
    cell::Cell,
    rc::Rc,
};

use crate::schedule::{Scheduler, TimerHandle};

// debounce
//
// the wrapped function runs once the wrapper has not been called for `wait_ms`; every call
// cancels whatever invocation is still pending.  used for resize handling
pub fn debounce<S, F>(scheduler: S, wait_ms: u32, func: F) -> impl Fn()
where
    S: Scheduler + Clone + 'static,
    F: Fn() + 'static,
{
    let func = Rc::new(func);
    let pending: Rc<Cell<Option<TimerHandle>>> = Rc::new(Cell::new(None));

    move || {
        if let Some(handle) = pending.take() {
            scheduler.clear_timeout(handle);
        }

        let func = func.clone();
        let fired = pending.clone();

        let handle = scheduler.set_timeout(
            wait_ms,
            Box::new(move || {
                fired.set(None);
                func();
            }),
        );

        pending.set(Some(handle));
    }
}

// throttle
//
// the first call runs immediately, then calls are dropped until `limit_ms` has elapsed.
// used for scroll handling, where the handler needs to run during the scroll rather than
// after it has settled
pub fn throttle<S, F>(scheduler: S, limit_ms: u32, func: F) -> impl Fn()
where
    S: Scheduler + Clone + 'static,
    F: Fn() + 'static,
{
    let in_throttle = Rc::new(Cell::new(false));

    move || {
        if in_throttle.get() {
            return;
        }

        func();
        in_throttle.set(true);

        let in_throttle = in_throttle.clone();
        scheduler.set_timeout(limit_ms, Box::new(move || in_throttle.set(false)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualScheduler;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + 'static) {
        let count = Rc::new(Cell::new(0));
        let inc = {
            let count = count.clone();
            move || count.set(count.get() + 1)
        };
        (count, inc)
    }

    #[test]
    fn debounce_collapses_a_burst_into_one_call() {
        let scheduler = ManualScheduler::new();
        let (count, inc) = counter();
        let debounced = debounce(scheduler.clone(), 250, inc);

        for _ in 0..10 {
            debounced();
            scheduler.advance(125);
        }
        assert_eq!(count.get(), 0);

        // last call happened 125ms ago
        scheduler.advance(124);
        assert_eq!(count.get(), 0);

        scheduler.advance(1);
        assert_eq!(count.get(), 1);

        scheduler.advance(10_000);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn debounce_fires_again_after_a_quiet_period() {
        let scheduler = ManualScheduler::new();
        let (count, inc) = counter();
        let debounced = debounce(scheduler.clone(), 100, inc);

        debounced();
        scheduler.advance(100);
        debounced();
        scheduler.advance(100);

        assert_eq!(count.get(), 2);
    }

    #[test]
    fn throttle_runs_leading_call_and_drops_the_rest() {
        let scheduler = ManualScheduler::new();
        let (count, inc) = counter();
        let throttled = throttle(scheduler.clone(), 16, inc);

        throttled();
        assert_eq!(count.get(), 1);

        for _ in 0..5 {
            scheduler.advance(3);
            throttled();
        }
        assert_eq!(count.get(), 1);

        scheduler.advance(1);
        throttled();
        assert_eq!(count.get(), 2);
    }
}
