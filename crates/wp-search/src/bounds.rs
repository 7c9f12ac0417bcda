//! Admissible static lower bounds.
//!
//! Every edge's cost is bounded below by its minimum over all samples
//! (`RoadNetwork::edge_min_cost`), whatever the departure time.  A plain
//! Dijkstra over those minima therefore never overestimates the remaining
//! travel time, and the bidirectional search can prune with it without
//! losing a feasible path:
//!
//! - forward: drop `v` reached at `τ` if `τ + to_target[v] > deadline`;
//! - backward: drop `u` left at `d` if `d − departure < from_source[u]`.
//!
//! The bounds depend only on `(source, target)`, so one computation serves
//! every departure of a query.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use wp_core::{EdgeId, NodeId};
use wp_network::RoadNetwork;

use crate::queue::Minutes;

/// Per-node lower bounds on travel time, `f64::INFINITY` when unreachable.
#[derive(Clone, Debug)]
pub struct LowerBounds {
    /// Minimum possible time from `source` to each node.
    pub from_source: Vec<f64>,
    /// Minimum possible time from each node to `target`.
    pub to_target: Vec<f64>,
}

impl LowerBounds {
    pub fn compute(network: &RoadNetwork, source: NodeId, target: NodeId) -> Self {
        Self {
            from_source: min_cost_tree(network, source, Direction::Forward),
            to_target:   min_cost_tree(network, target, Direction::Backward),
        }
    }

    /// Lower bound on any `source → target` travel time.
    #[inline]
    pub fn source_to_target(&self, target: NodeId) -> f64 {
        self.from_source[target.index()]
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Dijkstra over `edge_min_cost` from `root`, along or against edge
/// direction.
fn min_cost_tree(network: &RoadNetwork, root: NodeId, dir: Direction) -> Vec<f64> {
    let mut dist = vec![f64::INFINITY; network.node_count()];
    dist[root.index()] = 0.0;

    // Secondary key NodeId keeps tie-breaking deterministic.
    let mut heap: BinaryHeap<Reverse<(Minutes, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Minutes(0.0), root)));

    while let Some(Reverse((Minutes(d), node))) = heap.pop() {
        // Skip stale heap entries.
        if d > dist[node.index()] {
            continue;
        }
        let mut relax = |edge: EdgeId, next: NodeId| {
            let nd = d + network.edge_min_cost[edge.index()];
            if nd < dist[next.index()] {
                dist[next.index()] = nd;
                heap.push(Reverse((Minutes(nd), next)));
            }
        };
        match dir {
            Direction::Forward => {
                for edge in network.out_edges(node) {
                    relax(edge, network.edge_to[edge.index()]);
                }
            }
            Direction::Backward => {
                for edge in network.in_edges(node) {
                    relax(edge, network.edge_from[edge.index()]);
                }
            }
        }
    }
    dist
}
