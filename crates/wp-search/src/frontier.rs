//! Bidirectional time-dependent search for one departure.
//!
//! # Frontiers
//!
//! | Side     | Key                          | Relaxation                          |
//! |----------|------------------------------|-------------------------------------|
//! | forward  | earliest arrival `EA[v]`     | `EA[v] = arrival(e, EA[u])`         |
//! | backward | latest departure `LD[u]`     | `LD[u] = latest_departure(e, LD[v])`|
//!
//! The forward side is a min-heap on `EA` rooted at `(source, departure)`.
//! The backward side is a max-heap on `LD` rooted at `(target, deadline)`.
//! Costs depend on the *departure* time, so the backward side cannot reuse
//! forward weights: it inverts each edge's arrival function instead, which
//! is well defined because every edge is FIFO.  Under FIFO both sides are
//! label-setting; a node's key is final when it is popped.
//!
//! The two sides are popped alternately.  A node settled by both with
//! `EA[v] ≤ LD[v]` is a meeting node and proves that a path leaving at
//! `departure` reaches the target within budget.  Both sides then run to
//! exhaustion so that the resulting [`Corridor`] holds exact `EA` / `LD`
//! values for every node that can lie on a feasible path.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::trace;

use wp_core::{EdgeId, NodeId};
use wp_network::{RoadNetwork, TIME_EPS};

use crate::bounds::LowerBounds;
use crate::queue::{Minutes, Watchdog};
use crate::SearchResult;

/// Result of a successful bidirectional search.
#[derive(Clone, Debug)]
pub struct Corridor {
    pub departure: f64,
    pub deadline:  f64,
    /// Earliest arrival at each node; `+∞` if unreached or pruned.
    pub earliest: Vec<f64>,
    /// Latest departure from each node that still reaches the target by the
    /// deadline; `−∞` if none.
    pub latest: Vec<f64>,
    /// Edge on the earliest-arrival tree entering each node.
    pub earliest_pred: Vec<EdgeId>,
    /// First node found settled by both frontiers.
    pub meeting: NodeId,
}

impl Corridor {
    /// Whether standing at `node` at time `t` still allows reaching the
    /// target by the deadline.
    #[inline]
    pub fn is_feasible(&self, node: NodeId, t: f64) -> bool {
        t <= self.latest[node.index()] + TIME_EPS
    }

    /// Edges of the earliest-arrival path to `target`, if it was reached.
    pub fn fastest_path(&self, network: &RoadNetwork, source: NodeId, target: NodeId) -> Option<Vec<EdgeId>> {
        if !self.earliest[target.index()].is_finite() {
            return None;
        }
        let mut edges = Vec::new();
        let mut cur = target;
        while cur != source {
            let e = self.earliest_pred[cur.index()];
            if e == EdgeId::INVALID {
                return None;
            }
            edges.push(e);
            cur = network.edge_from[e.index()];
        }
        edges.reverse();
        Some(edges)
    }
}

/// Run both frontiers for `departure`.  Returns `Ok(None)` when they are
/// exhausted without meeting, i.e. no path fits in `[departure, deadline]`.
pub(crate) fn explore(
    network: &RoadNetwork,
    bounds: &LowerBounds,
    source: NodeId,
    target: NodeId,
    departure: f64,
    deadline: f64,
    watchdog: &mut Watchdog,
) -> SearchResult<Option<Corridor>> {
    let n = network.node_count();
    let mut earliest = vec![f64::INFINITY; n];
    let mut latest = vec![f64::NEG_INFINITY; n];
    let mut earliest_pred = vec![EdgeId::INVALID; n];
    let mut fwd_done = vec![false; n];
    let mut bwd_done = vec![false; n];
    let mut meeting: Option<NodeId> = None;

    // Min-heap on EA; NodeId breaks ties deterministically.
    let mut fwd: BinaryHeap<Reverse<(Minutes, NodeId)>> = BinaryHeap::new();
    // Max-heap on LD; Reverse(NodeId) keeps the smaller id first on ties.
    let mut bwd: BinaryHeap<(Minutes, Reverse<NodeId>)> = BinaryHeap::new();

    if departure + bounds.to_target[source.index()] <= deadline + TIME_EPS {
        earliest[source.index()] = departure;
        fwd.push(Reverse((Minutes(departure), source)));
    }
    if deadline - departure + TIME_EPS >= bounds.from_source[target.index()] {
        latest[target.index()] = deadline;
        bwd.push((Minutes(deadline), Reverse(target)));
    }

    let mut forward_turn = true;
    while !fwd.is_empty() || !bwd.is_empty() {
        watchdog.tick()?;
        let take_forward = if fwd.is_empty() {
            false
        } else if bwd.is_empty() {
            true
        } else {
            forward_turn
        };
        forward_turn = !forward_turn;

        let settled = if take_forward {
            let Some(Reverse((Minutes(t), u))) = fwd.pop() else { continue };
            if fwd_done[u.index()] || t > earliest[u.index()] {
                continue;
            }
            fwd_done[u.index()] = true;
            for e in network.out_edges(u) {
                let v = network.edge_to[e.index()];
                let arrival = network.arrival_time(e, t);
                if arrival + bounds.to_target[v.index()] > deadline + TIME_EPS {
                    continue;
                }
                if arrival < earliest[v.index()] {
                    earliest[v.index()] = arrival;
                    earliest_pred[v.index()] = e;
                    fwd.push(Reverse((Minutes(arrival), v)));
                }
            }
            u
        } else {
            let Some((Minutes(t), Reverse(v))) = bwd.pop() else { continue };
            if bwd_done[v.index()] || t < latest[v.index()] {
                continue;
            }
            bwd_done[v.index()] = true;
            for e in network.in_edges(v) {
                let u = network.edge_from[e.index()];
                let leave = network.latest_departure(e, t);
                if leave - departure + TIME_EPS < bounds.from_source[u.index()] {
                    continue;
                }
                if leave > latest[u.index()] {
                    latest[u.index()] = leave;
                    bwd.push((Minutes(leave), Reverse(u)));
                }
            }
            v
        };

        if meeting.is_none()
            && fwd_done[settled.index()]
            && bwd_done[settled.index()]
            && earliest[settled.index()] <= latest[settled.index()] + TIME_EPS
        {
            trace!(node = %settled, ea = earliest[settled.index()], ld = latest[settled.index()], "frontiers met");
            meeting = Some(settled);
        }
    }

    Ok(meeting.map(|meeting| Corridor {
        departure,
        deadline,
        earliest,
        latest,
        earliest_pred,
        meeting,
    }))
}
