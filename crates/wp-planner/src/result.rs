//! Reported route record.

use std::fmt;
use std::time::Duration;

use wp_core::{ClockTime, NodeId, RoutingMode};
use wp_network::{RoadNetwork, TIME_EPS};
use wp_search::PathCandidate;

use crate::{PlanResult, Query, QueryError};

/// One route returned for a query.  Immutable once built; every value is
/// checked against the query by [`RouteResult::new`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteResult {
    source:              NodeId,
    destination:         NodeId,
    requested_departure: f64,
    interval:            f64,
    budget:              f64,
    mode:                RoutingMode,

    departure:   f64,
    arrival:     f64,
    score:       f64,
    path:        Vec<NodeId>,
    right_turns: u32,
    sharp_turns: u32,
    wideness:    f64,
    length_km:   f64,

    wide_share_pct:    f64,
    wide_edge_indices: Vec<usize>,

    latency: Duration,
}

impl RouteResult {
    /// Assemble the record for `candidate` found while answering `query`.
    ///
    /// Edge widths are re-evaluated at each edge's traversal time to find
    /// the edges at least `wide_threshold_m` wide; `wide_edge_indices` holds
    /// their positions along the path (edge `i` joins `path[i]` and
    /// `path[i + 1]`).
    pub fn new(
        query: &Query,
        candidate: &PathCandidate,
        network: &RoadNetwork,
        wide_threshold_m: f64,
        latency: Duration,
    ) -> PlanResult<Self> {
        check(query, candidate)?;

        let mut t = candidate.departure;
        let mut wide_km = 0.0;
        let mut wide_edge_indices = Vec::new();
        for (i, &e) in candidate.edges.iter().enumerate() {
            let tr = network.traverse(e, t);
            if tr.width >= wide_threshold_m {
                wide_km += network.edge_length_km[e.index()];
                wide_edge_indices.push(i);
            }
            t = tr.arrival;
        }
        let wide_share_pct = if candidate.length_km > 0.0 {
            100.0 * wide_km / candidate.length_km
        } else {
            0.0
        };

        Ok(Self {
            source: query.source,
            destination: query.destination,
            requested_departure: query.earliest_departure,
            interval: query.interval,
            budget: query.budget,
            mode: query.mode,
            departure: candidate.departure,
            arrival: candidate.arrival,
            score: candidate.score,
            path: candidate.path.clone(),
            right_turns: candidate.right_turns,
            sharp_turns: candidate.sharp_turns,
            wideness: candidate.wideness(),
            length_km: candidate.length_km,
            wide_share_pct,
            wide_edge_indices,
            latency,
        })
    }

    pub fn source(&self) -> NodeId { self.source }
    pub fn destination(&self) -> NodeId { self.destination }
    /// Earliest departure of the query.
    pub fn requested_departure(&self) -> f64 { self.requested_departure }
    pub fn interval(&self) -> f64 { self.interval }
    pub fn budget(&self) -> f64 { self.budget }
    pub fn mode(&self) -> RoutingMode { self.mode }

    /// Departure this route was found for.
    pub fn departure(&self) -> f64 { self.departure }
    pub fn arrival(&self) -> f64 { self.arrival }
    pub fn travel_time(&self) -> f64 { self.arrival - self.departure }
    pub fn score(&self) -> f64 { self.score }
    pub fn path(&self) -> &[NodeId] { &self.path }
    pub fn right_turns(&self) -> u32 { self.right_turns }
    pub fn sharp_turns(&self) -> u32 { self.sharp_turns }
    /// Length-weighted mean width in metres.
    pub fn wideness(&self) -> f64 { self.wideness }
    pub fn length_km(&self) -> f64 { self.length_km }
    /// Share of the route's length on wide roads, in percent.
    pub fn wide_share_pct(&self) -> f64 { self.wide_share_pct }
    pub fn wide_edge_indices(&self) -> &[usize] { &self.wide_edge_indices }
    /// Wall-clock time spent answering the query.
    pub fn latency(&self) -> Duration { self.latency }
}

fn check(query: &Query, c: &PathCandidate) -> PlanResult<()> {
    let fault = |msg: String| Err(QueryError::Internal(msg));

    if c.path.first() != Some(&query.source) || c.path.last() != Some(&query.destination) {
        return fault(format!(
            "route {:?} does not join {} to {}",
            c.path, query.source, query.destination
        ));
    }
    if c.edges.len() + 1 != c.path.len() {
        return fault(format!("route has {} nodes but {} edges", c.path.len(), c.edges.len()));
    }
    if c.departure < query.earliest_departure - TIME_EPS
        || c.departure > query.latest_departure() + TIME_EPS
    {
        return fault(format!("departure {} outside the query window", c.departure));
    }
    let travel = c.travel_time();
    if travel < -TIME_EPS || travel > query.budget + TIME_EPS {
        return fault(format!("travel time {travel} outside [0, {}]", query.budget));
    }
    Ok(())
}

impl fmt::Display for RouteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {} dep {} arr {} ({:.1} min, {:.2} km) width {:.1} m, {:.0}% wide, {} right / {} sharp",
            self.source,
            self.destination,
            ClockTime(self.departure),
            ClockTime(self.arrival),
            self.travel_time(),
            self.length_km,
            self.wideness,
            self.wide_share_pct,
            self.right_turns,
            self.sharp_turns,
        )
    }
}
