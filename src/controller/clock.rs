//! controller::clock
//!
//! Time sources for revision timestamps.
//!
//! Revision hashes include the creation timestamp, so tests that need
//! stable hashes swap the wall clock for [`FixedClock`] or [`ManualClock`].

use std::fmt::Debug;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::core::types::Timestamp;

/// A source of revision timestamps.
pub trait Clock: Send + Sync + Debug {
    /// The timestamp for a revision being created now.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// A clock that advances by a fixed step after every reading.
///
/// # Example
///
/// ```
/// use mockscm::controller::clock::{Clock, ManualClock};
/// use mockscm::core::types::Timestamp;
///
/// let clock = ManualClock::new(Timestamp::from_millis(100), 10);
/// assert_eq!(clock.now().as_millis(), 100);
/// assert_eq!(clock.now().as_millis(), 110);
/// clock.set(Timestamp::from_millis(0));
/// assert_eq!(clock.now().as_millis(), 0);
/// ```
#[derive(Debug)]
pub struct ManualClock {
    next: AtomicI64,
    step: i64,
}

impl ManualClock {
    pub fn new(start: Timestamp, step: i64) -> Self {
        Self {
            next: AtomicI64::new(start.as_millis()),
            step,
        }
    }

    /// Set the next reading.
    pub fn set(&self, next: Timestamp) {
        self.next.store(next.as_millis(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.next.fetch_add(self.step, Ordering::SeqCst))
    }
}
