//! Router configuration.
//!
//! Typically loaded from a JSON file by the application crate (with the
//! `serde` feature) and handed to the query orchestrator.  Every field has a
//! default, so partial files are accepted.

use std::time::Duration;

use crate::{CoreError, CoreResult};

/// Weights of the `AllObjectives` scalar score:
///
/// ```text
/// score = wideness * mean_width − right_turn * right_turns − sharp_turn * sharp_turns
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ObjectiveWeights {
    pub wideness:   f64,
    pub right_turn: f64,
    pub sharp_turn: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self { wideness: 1.0, right_turn: 0.5, sharp_turn: 1.5 }
    }
}

/// Angular thresholds for turn classification, in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TurnThresholds {
    /// A clockwise heading change above this counts as a right turn.
    pub right_turn_min_deg: f64,
    /// An absolute heading change above this counts as a sharp turn.
    pub sharp_turn_deg: f64,
}

impl Default for TurnThresholds {
    fn default() -> Self {
        Self { right_turn_min_deg: 30.0, sharp_turn_deg: 60.0 }
    }
}

/// Top-level configuration of the routing engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RouterConfig {
    pub objective: ObjectiveWeights,

    pub turns: TurnThresholds,

    /// Edges at least this wide (metres) count towards the wide-road share
    /// reported on each result.
    pub wide_road_threshold_m: f64,

    /// Upper bound on labels kept per (node, predecessor) bucket during
    /// candidate search.  The earliest-arriving label is never evicted.
    pub max_labels_per_node: usize,

    /// Abort the departure sweep after this long and report no result.
    pub timeout: Option<Duration>,

    /// Worker thread count for the parallel sweep.  `None` uses Rayon's
    /// global pool.
    pub num_threads: Option<usize>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            objective:             ObjectiveWeights::default(),
            turns:                 TurnThresholds::default(),
            wide_road_threshold_m: 12.8,
            max_labels_per_node:   16,
            timeout:               None,
            num_threads:           None,
        }
    }
}

impl RouterConfig {
    /// Reject configurations the search cannot honour.
    pub fn validate(&self) -> CoreResult<()> {
        let w = &self.objective;
        for (name, v) in [
            ("objective.wideness", w.wideness),
            ("objective.right_turn", w.right_turn),
            ("objective.sharp_turn", w.sharp_turn),
            ("wide_road_threshold_m", self.wide_road_threshold_m),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(CoreError::Config(format!("{name} must be finite and ≥ 0, got {v}")));
            }
        }
        for (name, v) in [
            ("turns.right_turn_min_deg", self.turns.right_turn_min_deg),
            ("turns.sharp_turn_deg", self.turns.sharp_turn_deg),
        ] {
            if !(v > 0.0 && v <= 180.0) {
                return Err(CoreError::Config(format!("{name} must be in (0, 180], got {v}")));
            }
        }
        if self.max_labels_per_node == 0 {
            return Err(CoreError::Config("max_labels_per_node must be ≥ 1".into()));
        }
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be ≥ 1 when set".into()));
        }
        Ok(())
    }
}
