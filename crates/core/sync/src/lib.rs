//! WATOS Kernel Synchronization Primitives
//!
//! The tty subsystem consumes a counting wait primitive from the scheduler.
//! This crate provides it:
//! - `Semaphore`: counting semaphore, `signal` never blocks
//! - Yield hook: the scheduler registers a function that waiters call between
//!   polls so a blocked thread gives up its time slice instead of burning it

#![no_std]

use core::sync::atomic::{AtomicUsize, Ordering};
use spin::RwLock;

static YIELD_HOOK: RwLock<Option<fn()>> = RwLock::new(None);

/// Register the scheduler's yield function (None restores pure spinning)
pub fn set_yield_hook(hook: Option<fn()>) {
    *YIELD_HOOK.write() = hook;
}

#[inline]
fn relax() {
    match *YIELD_HOOK.read() {
        Some(hook) => hook(),
        None => core::hint::spin_loop(),
    }
}

/// Counting semaphore
///
/// Each `signal` banks one permit; each successful `wait`/`try_acquire`
/// consumes one. Permits are never lost, so a signal that races ahead of
/// the waiter still wakes it.
pub struct Semaphore {
    count: AtomicUsize,
}

impl Semaphore {
    pub const fn new(initial: usize) -> Self {
        Self {
            count: AtomicUsize::new(initial),
        }
    }

    /// Release one permit
    pub fn signal(&self) {
        self.count.fetch_add(1, Ordering::Release);
    }

    /// Take a permit if one is available, never blocks
    pub fn try_acquire(&self) -> bool {
        let mut current = self.count.load(Ordering::Relaxed);
        while current > 0 {
            match self.count.compare_exchange_weak(
                current,
                current - 1,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(seen) => current = seen,
            }
        }
        false
    }

    /// Block until a permit is available, then take it
    pub fn wait(&self) {
        while !self.try_acquire() {
            relax();
        }
    }

    /// Permits currently banked
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

impl Default for Semaphore {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_then_acquire() {
        let sem = Semaphore::new(0);
        assert!(!sem.try_acquire());
        sem.signal();
        sem.signal();
        assert_eq!(sem.count(), 2);
        assert!(sem.try_acquire());
        assert!(sem.try_acquire());
        assert!(!sem.try_acquire());
    }

    #[test]
    fn test_wait_consumes_banked_permit() {
        let sem = Semaphore::new(1);
        sem.wait();
        assert_eq!(sem.count(), 0);
    }

    #[test]
    fn test_wait_wakes_across_threads() {
        extern crate std;
        use std::sync::Arc;

        let sem = Arc::new(Semaphore::new(0));
        let waiter = {
            let sem = sem.clone();
            std::thread::spawn(move || sem.wait())
        };
        sem.signal();
        waiter.join().unwrap();
        assert_eq!(sem.count(), 0);
    }
}
