//! Routing modes and the objective dispatch table.
//!
//! Every consumer asks the mode for its [`ObjectiveSet`] instead of testing
//! variants ad hoc; the table below is the single place that says which
//! objectives a mode optimises and whether it ranks by scalar or by Pareto
//! dominance.

use std::str::FromStr;

use crate::CoreError;

/// User-selectable optimisation strategy.  The travel-time budget is a hard
/// constraint in every mode, never an objective.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoutingMode {
    /// Maximise wideness; ties broken by shorter travel time.
    WidenessOnly,
    /// Minimise right turns; ties broken by wideness.
    MinTurnsOnly,
    /// Pareto frontier over (wideness ↑, right turns ↓).
    WidenessAndTurns,
    /// Weighted scalar over wideness, right turns and sharp turns.
    #[default]
    AllObjectives,
}

/// One route-quality criterion.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Objective {
    Wideness,
    RightTurns,
    SharpTurns,
}

/// How candidates are ranked against each other.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Ranking {
    /// A single score; one best candidate wins.
    Scalar,
    /// Partial order; the whole non-dominated set is kept.
    Pareto,
}

/// The objectives a mode optimises, plus its ranking discipline.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ObjectiveSet {
    pub wideness:    bool,
    pub right_turns: bool,
    pub sharp_turns: bool,
    pub ranking:     Ranking,
}

impl ObjectiveSet {
    #[inline]
    pub fn contains(self, objective: Objective) -> bool {
        match objective {
            Objective::Wideness   => self.wideness,
            Objective::RightTurns => self.right_turns,
            Objective::SharpTurns => self.sharp_turns,
        }
    }

    #[inline]
    pub fn is_pareto(self) -> bool {
        self.ranking == Ranking::Pareto
    }
}

const WIDENESS_ONLY: ObjectiveSet = ObjectiveSet {
    wideness: true, right_turns: false, sharp_turns: false, ranking: Ranking::Scalar,
};
const MIN_TURNS_ONLY: ObjectiveSet = ObjectiveSet {
    wideness: false, right_turns: true, sharp_turns: false, ranking: Ranking::Scalar,
};
const WIDENESS_AND_TURNS: ObjectiveSet = ObjectiveSet {
    wideness: true, right_turns: true, sharp_turns: false, ranking: Ranking::Pareto,
};
const ALL_OBJECTIVES: ObjectiveSet = ObjectiveSet {
    wideness: true, right_turns: true, sharp_turns: true, ranking: Ranking::Scalar,
};

impl RoutingMode {
    pub const ALL: [RoutingMode; 4] = [
        RoutingMode::WidenessOnly,
        RoutingMode::MinTurnsOnly,
        RoutingMode::WidenessAndTurns,
        RoutingMode::AllObjectives,
    ];

    /// The dispatch table: mode → active objectives.
    #[inline]
    pub fn objectives(self) -> ObjectiveSet {
        match self {
            RoutingMode::WidenessOnly     => WIDENESS_ONLY,
            RoutingMode::MinTurnsOnly     => MIN_TURNS_ONLY,
            RoutingMode::WidenessAndTurns => WIDENESS_AND_TURNS,
            RoutingMode::AllObjectives    => ALL_OBJECTIVES,
        }
    }

    /// Machine-readable label, also accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            RoutingMode::WidenessOnly     => "wideness_only",
            RoutingMode::MinTurnsOnly     => "min_turns_only",
            RoutingMode::WidenessAndTurns => "wideness_and_turns",
            RoutingMode::AllObjectives    => "all_objectives",
        }
    }
}

impl std::fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoutingMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        RoutingMode::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| CoreError::Parse(format!("unknown routing mode {s:?}")))
    }
}
