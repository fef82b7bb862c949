//! Counting gate bounding the number of frames in flight.
//!
//! A slot is taken when a draw records a frame and given back when the
//! [`FramePermit`] for that frame is dropped, which backends arrange to
//! happen once the frame has been presented.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct GateState {
    capacity: usize,
    in_flight: usize,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<GateState>,
    released: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Blocking counting gate. Cloning yields another handle to the same gate.
#[derive(Debug, Clone)]
pub struct FrameGate {
    shared: Arc<Shared>,
}

impl FrameGate {
    /// Create a gate admitting `capacity` frames at once. A capacity of zero
    /// is treated as one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(GateState {
                    capacity: capacity.max(1),
                    in_flight: 0,
                }),
                released: Condvar::new(),
            }),
        }
    }

    /// Maximum number of outstanding permits.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shared.lock().capacity
    }

    /// Number of permits currently outstanding.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.shared.lock().in_flight
    }

    /// Change the capacity. Outstanding permits are unaffected; if there are
    /// more than the new capacity, acquirers wait until enough are released.
    pub fn set_capacity(&self, capacity: usize) {
        self.shared.lock().capacity = capacity.max(1);
        self.shared.released.notify_all();
    }

    /// Take a slot without blocking.
    #[must_use]
    pub fn try_acquire(&self) -> Option<FramePermit> {
        let mut state = self.shared.lock();
        if state.in_flight < state.capacity {
            state.in_flight += 1;
            Some(self.permit())
        } else {
            None
        }
    }

    /// Take a slot, blocking the calling thread until one is free.
    ///
    /// When the gate is full, `on_full` runs once (without the lock held)
    /// before waiting, giving the caller a chance to drive whatever delivers
    /// completions.
    pub fn acquire_with(&self, on_full: impl FnOnce()) -> FramePermit {
        if let Some(permit) = self.try_acquire() {
            return permit;
        }
        on_full();

        let mut state = self.shared.lock();
        while state.in_flight >= state.capacity {
            state = self
                .shared
                .released
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        state.in_flight += 1;
        drop(state);
        self.permit()
    }

    /// Take a slot, blocking until one is free.
    pub fn acquire(&self) -> FramePermit {
        self.acquire_with(|| {})
    }

    fn permit(&self) -> FramePermit {
        FramePermit {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// One occupied slot of a [`FrameGate`]. Releases the slot on drop.
#[derive(Debug)]
#[must_use = "dropping a permit releases its frame slot immediately"]
pub struct FramePermit {
    shared: Arc<Shared>,
}

impl FramePermit {
    /// Release the slot. Equivalent to dropping the permit.
    pub fn complete(self) {
        drop(self);
    }
}

impl Drop for FramePermit {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        drop(state);
        self.shared.released.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::mpsc, thread, time::Duration};

    use super::*;

    #[test]
    fn admits_up_to_capacity() {
        let gate = FrameGate::new(2);
        let a = gate.try_acquire();
        let b = gate.try_acquire();
        assert!(a.is_some() && b.is_some());
        assert!(gate.try_acquire().is_none());
        assert_eq!(gate.in_flight(), 2);
        drop(a);
        assert_eq!(gate.in_flight(), 1);
        assert!(gate.try_acquire().is_some());
    }

    #[test]
    fn zero_capacity_is_one() {
        let gate = FrameGate::new(0);
        assert_eq!(gate.capacity(), 1);
        let _held = gate.acquire();
        assert!(gate.try_acquire().is_none());
    }

    #[test]
    fn acquire_blocks_until_release() {
        let gate = FrameGate::new(1);
        let held = gate.acquire();

        let (tx, rx) = mpsc::channel();
        let waiter = {
            let gate = gate.clone();
            thread::spawn(move || {
                let permit = gate.acquire();
                tx.send(()).unwrap();
                drop(permit);
            })
        };

        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        held.complete();
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        waiter.join().unwrap();
        assert_eq!(gate.in_flight(), 0);
    }

    #[test]
    fn on_full_runs_only_when_full() {
        let gate = FrameGate::new(1);
        let mut calls = 0;
        let first = gate.acquire_with(|| calls += 1);
        assert_eq!(calls, 0);

        // Release from the hook so the wait finishes.
        let second = gate.acquire_with(|| {
            calls += 1;
            drop(first);
        });
        assert_eq!(calls, 1);
        drop(second);
    }

    #[test]
    fn raising_capacity_wakes_waiters() {
        let gate = FrameGate::new(1);
        let _held = gate.acquire();
        let (tx, rx) = mpsc::channel();
        let waiter = {
            let gate = gate.clone();
            thread::spawn(move || {
                let _permit = gate.acquire();
                tx.send(()).unwrap();
            })
        };
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        gate.set_capacity(2);
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        waiter.join().unwrap();
    }
}
