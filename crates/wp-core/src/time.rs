//! Time-of-day model.
//!
//! # Design
//!
//! All times are continuous `f64` minutes since midnight.  Travel costs are
//! only known at a network-wide, strictly increasing series of integer sample
//! points; [`SampleSeries::locate`] maps any continuous time onto that series
//! in O(log S) so that the cost evaluator can interpolate between the two
//! surrounding samples.
//!
//! Times outside `[first, last]` are *not* wrapped around midnight: they
//! locate as [`Position::Before`] / [`Position::After`] and evaluators clamp
//! to the first / last sample.

use std::fmt;

use crate::{CoreError, CoreResult};

/// Minutes in one day.
pub const MINUTES_PER_DAY: f64 = 1_440.0;

// ── SampleSeries ──────────────────────────────────────────────────────────────

/// The shared, ordered set of time-of-day points (minutes since midnight) at
/// which every edge's travel cost is explicitly known.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleSeries {
    points: Vec<u32>,
}

/// Where a continuous time falls relative to a [`SampleSeries`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Position {
    /// Strictly before the first sample.
    Before,
    /// Exactly on sample `k`.
    At(usize),
    /// Strictly between samples `lo` and `lo + 1`; `frac` is in `(0, 1)`.
    Between { lo: usize, frac: f64 },
    /// Strictly after the last sample.
    After,
}

impl SampleSeries {
    /// Validate and wrap a sample series.
    ///
    /// Fails if `points` is empty or not strictly increasing.
    pub fn new(points: Vec<u32>) -> CoreResult<Self> {
        if points.is_empty() {
            return Err(CoreError::InvalidSeries("series is empty".into()));
        }
        if let Some(w) = points.windows(2).find(|w| w[0] >= w[1]) {
            return Err(CoreError::InvalidSeries(format!(
                "series not strictly increasing at {} → {}",
                w[0], w[1]
            )));
        }
        Ok(Self { points })
    }

    #[inline]
    pub fn points(&self) -> &[u32] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; a validated series has at least one point.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn first(&self) -> f64 {
        self.points[0] as f64
    }

    #[inline]
    pub fn last(&self) -> f64 {
        self.points[self.points.len() - 1] as f64
    }

    /// Sample time of index `k` as continuous minutes.
    #[inline]
    pub fn at(&self, k: usize) -> f64 {
        self.points[k] as f64
    }

    /// Index of the sample equal to `minute`, if any.
    pub fn index_of(&self, minute: u32) -> Option<usize> {
        self.points.binary_search(&minute).ok()
    }

    /// Locate `t` on the series by binary search.
    pub fn locate(&self, t: f64) -> Position {
        let n = self.points.len();
        if t < self.first() {
            return Position::Before;
        }
        if t > self.last() {
            return Position::After;
        }
        // Number of samples ≤ t; at least 1 because t ≥ first.
        let upto = self.points.partition_point(|&p| (p as f64) <= t);
        let lo = upto - 1;
        let lo_t = self.at(lo);
        if t == lo_t || lo + 1 >= n {
            return Position::At(lo);
        }
        let hi_t = self.at(lo + 1);
        Position::Between { lo, frac: (t - lo_t) / (hi_t - lo_t) }
    }

    /// Sample points strictly inside the open interval `(start, end)`, in
    /// ascending order.
    pub fn interior(&self, start: f64, end: f64) -> impl Iterator<Item = f64> + '_ {
        let from = self.points.partition_point(|&p| (p as f64) <= start);
        self.points[from..]
            .iter()
            .map(|&p| p as f64)
            .take_while(move |&p| p < end)
    }
}

// ── ClockTime ─────────────────────────────────────────────────────────────────

/// Display adapter rendering minutes since midnight as `HH:MM`, with a day
/// offset suffix once the time passes midnight (e.g. `00:15+1d`).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClockTime(pub f64);

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.max(0.0).round() as u64;
        let days = total / MINUTES_PER_DAY as u64;
        let in_day = total % MINUTES_PER_DAY as u64;
        write!(f, "{:02}:{:02}", in_day / 60, in_day % 60)?;
        if days > 0 {
            write!(f, "+{days}d")?;
        }
        Ok(())
    }
}
