//! Query input and outcome types.

use std::fmt;

use wp_core::{NodeId, RoutingMode, SampleSeries};

use crate::{QueryError, PlanResult, RouteResult};

/// One routing request.
///
/// The router evaluates every departure in
/// `[earliest_departure, earliest_departure + interval]` that lies on the
/// sample series, plus both endpoints, and allows at most `budget` minutes
/// of travel from each.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Query {
    pub source:      NodeId,
    pub destination: NodeId,
    /// Minutes since midnight.
    pub earliest_departure: f64,
    /// Width of the departure window in minutes; 0 evaluates one departure.
    pub interval: f64,
    /// Maximum travel time in minutes.
    pub budget: f64,
    pub mode:   RoutingMode,
}

impl Query {
    pub fn new(
        source: NodeId,
        destination: NodeId,
        earliest_departure: f64,
        interval: f64,
        budget: f64,
        mode: RoutingMode,
    ) -> Self {
        Self { source, destination, earliest_departure, interval, budget, mode }
    }

    /// Reject non-finite or negative times.  Node existence is checked by
    /// the planner against its network.
    pub fn validate(&self) -> PlanResult<()> {
        for (name, v) in [
            ("earliest_departure", self.earliest_departure),
            ("interval", self.interval),
            ("budget", self.budget),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(QueryError::InvalidQuery(format!(
                    "{name} must be finite and ≥ 0, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Latest departure evaluated.
    #[inline]
    pub fn latest_departure(&self) -> f64 {
        self.earliest_departure + self.interval
    }

    /// Departures evaluated for this query, ascending and distinct: the
    /// window's endpoints and every series sample strictly inside it.
    pub fn departures(&self, series: &SampleSeries) -> Vec<f64> {
        let start = self.earliest_departure;
        let end = self.latest_departure();
        if end <= start {
            return vec![start];
        }
        let mut out = Vec::with_capacity(2 + series.len());
        out.push(start);
        out.extend(series.interior(start, end));
        out.push(end);
        out
    }
}

/// Why a query produced no route.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoPathReason {
    /// Every departure was searched and none reaches the destination within
    /// budget.
    Exhausted,
    /// The configured timeout expired before the sweep finished.
    TimedOut,
}

impl fmt::Display for NoPathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NoPathReason::Exhausted => "no path within budget",
            NoPathReason::TimedOut => "search timed out",
        })
    }
}

/// Answer to a [`Query`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QueryOutcome {
    /// One route for scalar modes; the Pareto front, best-first, for
    /// `WidenessAndTurns`.  Never empty.
    Routes(Vec<RouteResult>),
    NoFeasiblePath(NoPathReason),
}

impl QueryOutcome {
    /// The routes, or an empty slice.
    pub fn routes(&self) -> &[RouteResult] {
        match self {
            QueryOutcome::Routes(routes) => routes,
            QueryOutcome::NoFeasiblePath(_) => &[],
        }
    }

    /// The top-ranked route, if any.
    pub fn best(&self) -> Option<&RouteResult> {
        self.routes().first()
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self, QueryOutcome::Routes(_))
    }
}
