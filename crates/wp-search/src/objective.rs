//! Objective model: turn classification, scoring and ranking.
//!
//! # Scores
//!
//! | Mode                 | Score                                          | Tie-break          |
//! |----------------------|------------------------------------------------|--------------------|
//! | `WidenessOnly`       | wideness                                       | shorter travel     |
//! | `MinTurnsOnly`       | −right turns                                   | wider              |
//! | `AllObjectives`      | `w·wideness − r·right − s·sharp`               | shorter travel     |
//! | `WidenessAndTurns`   | wideness (reported only; ranking is Pareto)    | —                  |
//!
//! Higher scores are better.  Remaining ties fall back to earlier departure,
//! then to the lexicographically smaller node sequence, so ranking is total
//! and repeatable.
//!
//! Wideness is the length-weighted mean width of a path.  A path with no
//! edges has wideness 0, so every mode scores the trivial path 0.

use std::cmp::Ordering;

use wp_core::{
    heading_change_deg, NodeId, Objective, ObjectiveSet, ObjectiveWeights, RoutingMode,
    TurnThresholds,
};
use wp_network::RoadNetwork;

use crate::candidate::PathCandidate;

// ── Turns ─────────────────────────────────────────────────────────────────────

/// Classification of the manoeuvre at one intermediate node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Turn {
    pub right: bool,
    pub sharp: bool,
}

/// Classify the turn made at `via` when driving `prev → via → next`.
///
/// Right: clockwise heading change strictly between `right_turn_min_deg`
/// and 180°.  Sharp: absolute heading change above `sharp_turn_deg`, in
/// either direction.
pub fn classify_turn(
    network: &RoadNetwork,
    thresholds: &TurnThresholds,
    prev: NodeId,
    via: NodeId,
    next: NodeId,
) -> Turn {
    let delta = heading_change_deg(
        network.node_pos[prev.index()],
        network.node_pos[via.index()],
        network.node_pos[next.index()],
    );
    Turn {
        right: delta > thresholds.right_turn_min_deg && delta < 180.0,
        sharp: delta.abs() > thresholds.sharp_turn_deg,
    }
}

/// Length-weighted mean width; 0 for an empty path.
#[inline]
pub fn mean_width(width_km: f64, length_km: f64) -> f64 {
    if length_km > 0.0 { width_km / length_km } else { 0.0 }
}

// ── Scorer ────────────────────────────────────────────────────────────────────

/// Scores and ranks candidates for one routing mode.
#[derive(Copy, Clone, Debug)]
pub struct Scorer {
    mode:       RoutingMode,
    objectives: ObjectiveSet,
    weights:    ObjectiveWeights,
}

impl Scorer {
    pub fn new(mode: RoutingMode, weights: ObjectiveWeights) -> Self {
        Self { mode, objectives: mode.objectives(), weights }
    }

    #[inline]
    pub fn mode(&self) -> RoutingMode {
        self.mode
    }

    #[inline]
    pub fn objectives(&self) -> ObjectiveSet {
        self.objectives
    }

    /// Scalar score of a candidate.  In Pareto mode this is its wideness.
    pub fn score(&self, c: &PathCandidate) -> f64 {
        let w = c.wideness();
        match self.mode {
            RoutingMode::WidenessOnly | RoutingMode::WidenessAndTurns => w,
            // `0.0 −` rather than negation keeps the trivial path at +0.0.
            RoutingMode::MinTurnsOnly => 0.0 - f64::from(c.right_turns),
            RoutingMode::AllObjectives => {
                self.weights.wideness * w
                    - self.weights.right_turn * f64::from(c.right_turns)
                    - self.weights.sharp_turn * f64::from(c.sharp_turns)
            }
        }
    }

    /// Best-first total order.  `Less` means `a` ranks ahead of `b`.
    pub fn compare(&self, a: &PathCandidate, b: &PathCandidate) -> Ordering {
        let primary = if self.objectives.is_pareto() {
            b.wideness()
                .total_cmp(&a.wideness())
                .then(a.right_turns.cmp(&b.right_turns))
        } else {
            b.score.total_cmp(&a.score)
        };
        let tie_break = match self.mode {
            RoutingMode::MinTurnsOnly => b.wideness().total_cmp(&a.wideness()),
            _ => a.travel_time().total_cmp(&b.travel_time()),
        };
        primary
            .then(tie_break)
            .then(a.travel_time().total_cmp(&b.travel_time()))
            .then(a.departure.total_cmp(&b.departure))
            .then_with(|| a.path.cmp(&b.path))
    }

    /// Pareto dominance over the mode's active objectives: no worse on any,
    /// strictly better on at least one.
    pub fn dominates(&self, a: &PathCandidate, b: &PathCandidate) -> bool {
        let mut strictly = false;
        if self.objectives.contains(Objective::Wideness) {
            let (wa, wb) = (a.wideness(), b.wideness());
            if wa < wb {
                return false;
            }
            strictly |= wa > wb;
        }
        if self.objectives.contains(Objective::RightTurns) {
            if a.right_turns > b.right_turns {
                return false;
            }
            strictly |= a.right_turns < b.right_turns;
        }
        if self.objectives.contains(Objective::SharpTurns) {
            if a.sharp_turns > b.sharp_turns {
                return false;
            }
            strictly |= a.sharp_turns < b.sharp_turns;
        }
        strictly
    }

    /// Reduce `candidates` to the mode's answer: the single best candidate
    /// for scalar modes, the non-dominated set for Pareto mode.  Output is
    /// sorted best-first.
    pub fn select(&self, mut candidates: Vec<PathCandidate>) -> Vec<PathCandidate> {
        for c in &mut candidates {
            c.score = self.score(c);
        }
        candidates.sort_by(|a, b| self.compare(a, b));
        if self.objectives.is_pareto() {
            self.remove_dominated(candidates)
        } else {
            candidates.truncate(1);
            candidates
        }
    }

    /// Keep only non-dominated candidates, and one per distinct objective
    /// vector.  With best-first input, the first of each group of equals
    /// survives.
    pub fn remove_dominated(&self, candidates: Vec<PathCandidate>) -> Vec<PathCandidate> {
        if candidates.len() <= 1 {
            return candidates;
        }

        let mut result: Vec<PathCandidate> = Vec::with_capacity(candidates.len());
        for c in candidates {
            let covered = result
                .iter()
                .any(|kept| self.dominates(kept, &c) || self.same_objectives(kept, &c));
            if !covered {
                result.retain(|kept| !self.dominates(&c, kept));
                result.push(c);
            }
        }
        result
    }

    fn same_objectives(&self, a: &PathCandidate, b: &PathCandidate) -> bool {
        (!self.objectives.wideness || a.wideness() == b.wideness())
            && (!self.objectives.right_turns || a.right_turns == b.right_turns)
            && (!self.objectives.sharp_turns || a.sharp_turns == b.sharp_turns)
    }
}
