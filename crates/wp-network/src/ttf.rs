//! Temporal cost evaluation: piecewise-linear travel-time functions.
//!
//! # Model
//!
//! Each edge stores one travel cost (minutes) per point of the network-wide
//! [`SampleSeries`].  Between two samples the cost is linearly interpolated;
//! outside `[first, last]` it is clamped to the first / last sample's cost.
//! The arrival function is therefore
//!
//! ```text
//! arrival(t) = t + cost(t)
//! ```
//!
//! which is piecewise linear with breakpoints at the samples and slope 1 on
//! both clamped tails.
//!
//! # FIFO
//!
//! A profile is FIFO when `arrival` is non-decreasing, i.e. for consecutive
//! samples `cost[k] − cost[k+1] ≤ t[k+1] − t[k]`.  The network builder rejects
//! any edge that violates this; [`CostProfile::latest_departure`] relies on it
//! to invert `arrival` segment by segment.

use std::collections::BTreeMap;

use wp_core::{Position, SampleSeries};

/// Slack used when comparing continuous times produced by interpolation.
pub const TIME_EPS: f64 = 1e-9;

// ── Table input ───────────────────────────────────────────────────────────────

/// One time sample's travel cost for one edge, plus the width at that sample
/// for edges whose usable width varies with congestion (e.g. clearways).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Properties {
    /// Travel cost in minutes.
    pub cost:  f64,
    /// Usable width in metres at this sample, if it varies over the day.
    pub width: Option<f64>,
}

impl Properties {
    #[inline]
    pub fn cost(cost: f64) -> Self {
        Self { cost, width: None }
    }

    #[inline]
    pub fn with_width(cost: f64, width: f64) -> Self {
        Self { cost, width: Some(width) }
    }
}

/// Ordered mapping from sample minute to [`Properties`], as supplied by a
/// loader.  Converted to a dense, series-aligned array at build time.
pub type TimeCostTable = BTreeMap<u32, Properties>;

/// Build a [`TimeCostTable`] from `(minute, cost)` pairs.
pub fn cost_table<I>(pairs: I) -> TimeCostTable
where
    I: IntoIterator<Item = (u32, f64)>,
{
    pairs.into_iter().map(|(t, c)| (t, Properties::cost(c))).collect()
}

// ── CostProfile ───────────────────────────────────────────────────────────────

/// Borrowed view of one edge's costs, aligned index-for-index with the
/// network's sample series.
#[derive(Copy, Clone, Debug)]
pub struct CostProfile<'a> {
    series: &'a SampleSeries,
    costs:  &'a [f64],
}

impl<'a> CostProfile<'a> {
    pub fn new(series: &'a SampleSeries, costs: &'a [f64]) -> Self {
        debug_assert_eq!(series.len(), costs.len());
        Self { series, costs }
    }

    #[inline]
    pub fn costs(&self) -> &'a [f64] {
        self.costs
    }

    /// Minimum cost over all samples.  Because interpolation is convex and
    /// the tails are clamped, this bounds `cost(t)` from below for every `t`.
    pub fn lower_bound(&self) -> f64 {
        self.costs.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Maximum cost over all samples.
    pub fn upper_bound(&self) -> f64 {
        self.costs.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Interpolated travel cost when departing at `t`.
    pub fn cost_at(&self, t: f64) -> f64 {
        match self.series.locate(t) {
            Position::Before => self.costs[0],
            Position::After => self.costs[self.costs.len() - 1],
            Position::At(k) => self.costs[k],
            Position::Between { lo, frac } => {
                let c0 = self.costs[lo];
                let c1 = self.costs[lo + 1];
                c0 + (c1 - c0) * frac
            }
        }
    }

    /// Arrival time when departing at `t`.  Exact at sample points.
    #[inline]
    pub fn arrival(&self, t: f64) -> f64 {
        t + self.cost_at(t)
    }

    /// Value of the arrival function at sample `k`.
    #[inline]
    fn arrival_at_sample(&self, k: usize) -> f64 {
        self.series.at(k) + self.costs[k]
    }

    /// Latest departure time `d` such that `arrival(d) ≤ arrival`.
    ///
    /// Inverts the arrival function segment by segment.  On a flat segment
    /// (cost falling with slope −1) the latest point of the plateau is
    /// returned.  Requires the profile to be FIFO.
    pub fn latest_departure(&self, arrival: f64) -> f64 {
        let n = self.costs.len();

        // Number of samples whose arrival value is ≤ `arrival`.  The arrival
        // values are non-decreasing under FIFO, so this is a binary search.
        let (mut lo, mut hi) = (0usize, n);
        while lo < hi {
            let mid = (lo + hi) / 2;
            if self.arrival_at_sample(mid) <= arrival {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        if lo == 0 {
            // Leading clamped tail: arrival(d) = d + cost[0].
            return arrival - self.costs[0];
        }
        let k = lo - 1;
        if k == n - 1 {
            // Trailing clamped tail: arrival(d) = d + cost[last].
            return arrival - self.costs[n - 1];
        }

        let (t0, t1) = (self.series.at(k), self.series.at(k + 1));
        let (a0, a1) = (self.arrival_at_sample(k), self.arrival_at_sample(k + 1));
        // a0 ≤ arrival < a1, so the segment has positive slope.
        t0 + (arrival - a0) * (t1 - t0) / (a1 - a0)
    }

    /// Index of the first sample after which the arrival function decreases,
    /// or `None` if the profile is FIFO.
    pub fn first_fifo_violation(&self) -> Option<usize> {
        (0..self.costs.len().saturating_sub(1)).find(|&k| {
            let dt = self.series.at(k + 1) - self.series.at(k);
            self.costs[k] - self.costs[k + 1] > dt + TIME_EPS
        })
    }
}
