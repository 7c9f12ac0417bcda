//! Time-of-day width model.
//!
//! An edge's usable width at time `t` is resolved in this order:
//!
//! 1. If the edge carries per-sample widths, the width of the latest sample
//!    at or before `t` (step function; clamped outside the series).
//! 2. Otherwise its rush-hour width while `t` falls inside a network-wide
//!    [`RushWindows`] interval.
//! 3. Otherwise its base width.

use wp_core::{CoreError, CoreResult, MINUTES_PER_DAY};

/// Half-open `[start, end)` minute-of-day intervals during which edges report
/// their rush-hour width.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RushWindows {
    windows: Vec<(u32, u32)>,
}

impl RushWindows {
    /// Validate a set of windows.  Each must satisfy `start < end ≤ 1440`.
    pub fn new<I>(windows: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let windows: Vec<(u32, u32)> = windows.into_iter().collect();
        for &(start, end) in &windows {
            if start >= end || end as f64 > MINUTES_PER_DAY {
                return Err(CoreError::Config(format!(
                    "rush window [{start}, {end}) must satisfy start < end ≤ 1440"
                )));
            }
        }
        Ok(Self { windows })
    }

    /// No rush hours: every edge always reports its base width.
    pub fn none() -> Self {
        Self { windows: Vec::new() }
    }

    pub fn windows(&self) -> &[(u32, u32)] {
        &self.windows
    }

    /// Whether `t` (minutes, any day) falls inside a rush window.
    pub fn contains(&self, t: f64) -> bool {
        let m = t.rem_euclid(MINUTES_PER_DAY);
        self.windows
            .iter()
            .any(|&(start, end)| m >= start as f64 && m < end as f64)
    }
}

impl Default for RushWindows {
    /// 07:30–10:00 and 16:30–19:00.
    fn default() -> Self {
        Self { windows: vec![(450, 600), (990, 1_140)] }
    }
}
