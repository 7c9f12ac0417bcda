//! Heap keys and the cooperative abort check shared by every search loop.

use std::cmp::Ordering;
use std::time::Instant;

use crate::{SearchError, SearchResult};

/// A time or cost in minutes with a total order, usable as a `BinaryHeap`
/// key.  All stored values are finite or `±∞`; NaN never enters a heap.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Minutes(pub f64);

impl Eq for Minutes {}

impl PartialOrd for Minutes {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Minutes {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Checks the caller's wall-clock deadline every few hundred heap pops.
pub(crate) struct Watchdog {
    abort_at: Option<Instant>,
    pops:     u32,
}

impl Watchdog {
    const CHECK_EVERY: u32 = 256;

    pub fn new(abort_at: Option<Instant>) -> Self {
        Self { abort_at, pops: 0 }
    }

    #[inline]
    pub fn tick(&mut self) -> SearchResult<()> {
        self.pops = self.pops.wrapping_add(1);
        if self.pops % Self::CHECK_EVERY == 0 {
            self.check_now()?;
        }
        Ok(())
    }

    pub fn check_now(&self) -> SearchResult<()> {
        match self.abort_at {
            Some(at) if Instant::now() >= at => Err(SearchError::Timeout),
            _ => Ok(()),
        }
    }
}
