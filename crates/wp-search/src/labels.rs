//! Multi-criteria label search inside a feasibility corridor.
//!
//! Once the bidirectional frontiers have produced exact latest-departure
//! times `LD[v]`, any partial path standing at `v` at time `τ ≤ LD[v]` can
//! still be completed within budget.  This search grows simple paths from
//! the source in order of time, keeping at each `(node, predecessor)` pair
//! a bucket of mutually non-dominated labels.  Buckets are per predecessor
//! because the turn made on leaving a node depends on how it was entered.
//!
//! A label `a` covers `b` in the same bucket when every continuation open to
//! `b` is open to `a` and scores at least as well after it:
//!
//! - `a` has visited no node that `b` has not, so the simple-path rule
//!   blocks nothing for `a` that it allows for `b`;
//! - `a` stands at the node no later than `b`.  When widths depend on the
//!   time of day, a later start can meet a wider road, so `a` must stand
//!   there at exactly the same time;
//! - no more right turns / sharp turns (for the objectives the mode uses);
//! - at least as much accumulated `width × length` and no more length, which
//!   keeps `a`'s mean width at least as high after any common continuation.
//!
//! A bucket holds at most `max_labels_per_node` labels; when full, the
//! latest-arriving label is evicted, so the earliest one always survives.
//! Labels are expanded in `(time, creation order)` order, which makes the
//! search deterministic.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;

use wp_core::{EdgeId, NodeId, Objective, ObjectiveSet, TurnThresholds};
use wp_network::RoadNetwork;

use crate::frontier::Corridor;
use crate::objective::{classify_turn, Turn};
use crate::queue::{Minutes, Watchdog};
use crate::SearchResult;

const NO_PARENT: u32 = u32::MAX;

#[derive(Copy, Clone, Debug)]
struct Label {
    node:      NodeId,
    pred:      NodeId,
    parent:    u32,
    edge:      EdgeId,
    time:      f64,
    width_km:  f64,
    length_km: f64,
    right:     u32,
    sharp:     u32,
}

/// Parameters of one label search.
pub(crate) struct LabelSearch<'a> {
    network:    &'a RoadNetwork,
    corridor:   &'a Corridor,
    turns:      &'a TurnThresholds,
    objectives: ObjectiveSet,
    max_labels: usize,
    /// Only labels standing at a node at the same time may cover each other.
    exact_time: bool,
}

impl<'a> LabelSearch<'a> {
    pub(crate) fn new(
        network: &'a RoadNetwork,
        corridor: &'a Corridor,
        turns: &'a TurnThresholds,
        objectives: ObjectiveSet,
        max_labels: usize,
    ) -> Self {
        Self {
            network,
            corridor,
            turns,
            objectives,
            max_labels,
            exact_time: network.has_time_varying_widths(),
        }
    }
}

struct Arena {
    labels:  Vec<Label>,
    alive:   Vec<bool>,
    buckets: FxHashMap<(NodeId, NodeId), Vec<u32>>,
}

impl LabelSearch<'_> {
    /// Edge sequences of the non-dominated simple paths that reach `target`
    /// within the corridor, in creation order.
    pub(crate) fn run(
        &self,
        source: NodeId,
        target: NodeId,
        watchdog: &mut Watchdog,
    ) -> SearchResult<Vec<Vec<EdgeId>>> {
        let departure = self.corridor.departure;
        if !self.corridor.is_feasible(source, departure) {
            return Ok(Vec::new());
        }

        let mut arena = Arena {
            labels:  Vec::new(),
            alive:   Vec::new(),
            buckets: FxHashMap::default(),
        };
        let mut heap: BinaryHeap<Reverse<(Minutes, u32)>> = BinaryHeap::new();

        let root = Label {
            node:      source,
            pred:      NodeId::INVALID,
            parent:    NO_PARENT,
            edge:      EdgeId::INVALID,
            time:      departure,
            width_km:  0.0,
            length_km: 0.0,
            right:     0,
            sharp:     0,
        };
        if let Some(i) = self.insert(&mut arena, root) {
            heap.push(Reverse((Minutes(departure), i)));
        }

        while let Some(Reverse((_, i))) = heap.pop() {
            watchdog.tick()?;
            if !arena.alive[i as usize] {
                continue;
            }
            let label = arena.labels[i as usize];
            if label.node == target {
                continue;
            }

            for e in self.network.out_edges(label.node) {
                let next = self.network.edge_to[e.index()];
                if on_path(&arena.labels, i, next) {
                    continue;
                }
                let tr = self.network.traverse(e, label.time);
                if !self.corridor.is_feasible(next, tr.arrival) {
                    continue;
                }
                let turn = if label.pred == NodeId::INVALID {
                    Turn::default()
                } else {
                    classify_turn(self.network, self.turns, label.pred, label.node, next)
                };
                let child = Label {
                    node:      next,
                    pred:      label.node,
                    parent:    i,
                    edge:      e,
                    time:      tr.arrival,
                    width_km:  label.width_km + tr.width_km,
                    length_km: label.length_km + self.network.edge_length_km[e.index()],
                    right:     label.right + u32::from(turn.right),
                    sharp:     label.sharp + u32::from(turn.sharp),
                };
                if let Some(j) = self.insert(&mut arena, child) {
                    heap.push(Reverse((Minutes(child.time), j)));
                }
            }
        }

        let paths = arena
            .labels
            .iter()
            .enumerate()
            .filter(|&(i, l)| l.node == target && arena.alive[i])
            .map(|(i, _)| edges_of(&arena.labels, i as u32))
            .collect();
        Ok(paths)
    }

    /// Whether `a` is at least as good as `b` on every tracked criterion and
    /// on every continuation `b` could still take.
    fn covers(&self, labels: &[Label], a: &Label, b: &Label) -> bool {
        let on_time = if self.exact_time { a.time == b.time } else { a.time <= b.time };
        on_time
            && a.width_km >= b.width_km
            && a.length_km <= b.length_km
            && (!self.objectives.contains(Objective::RightTurns) || a.right <= b.right)
            && (!self.objectives.contains(Objective::SharpTurns) || a.sharp <= b.sharp)
            && visits_within(labels, a, b)
    }

    /// Add `label` to its bucket unless it is covered; returns its index.
    fn insert(&self, arena: &mut Arena, label: Label) -> Option<u32> {
        let Arena { labels, alive, buckets } = arena;
        let bucket = buckets.entry((label.node, label.pred)).or_default();

        if bucket.iter().any(|&j| self.covers(labels, &labels[j as usize], &label)) {
            return None;
        }
        bucket.retain(|&j| {
            let keep = !self.covers(labels, &label, &labels[j as usize]);
            if !keep {
                alive[j as usize] = false;
            }
            keep
        });

        if bucket.len() >= self.max_labels {
            // Evict the latest arrival; the newcomer loses if it is the latest.
            let worst = bucket
                .iter()
                .enumerate()
                .max_by(|a, b| {
                    labels[*a.1 as usize]
                        .time
                        .total_cmp(&labels[*b.1 as usize].time)
                        .then(a.1.cmp(b.1))
                })
                .map(|(pos, &j)| (pos, j));
            if let Some((pos, j)) = worst {
                if label.time >= labels[j as usize].time {
                    return None;
                }
                alive[j as usize] = false;
                bucket.swap_remove(pos);
            }
        }

        let idx = labels.len() as u32;
        labels.push(label);
        alive.push(true);
        bucket.push(idx);
        Some(idx)
    }
}

/// Whether `node` already lies on the path ending in label `i`.
fn on_path(labels: &[Label], mut i: u32, node: NodeId) -> bool {
    while i != NO_PARENT {
        let l = &labels[i as usize];
        if l.node == node {
            return true;
        }
        i = l.parent;
    }
    false
}

/// Whether every node on `a`'s path also lies on `b`'s.  Both labels stand
/// at the same node, so only the ancestors need checking.
fn visits_within(labels: &[Label], a: &Label, b: &Label) -> bool {
    let mut i = a.parent;
    while i != NO_PARENT {
        let l = &labels[i as usize];
        if !on_path(labels, b.parent, l.node) {
            return false;
        }
        i = l.parent;
    }
    true
}

fn edges_of(labels: &[Label], mut i: u32) -> Vec<EdgeId> {
    let mut edges = Vec::new();
    while i != NO_PARENT {
        let l = &labels[i as usize];
        if l.parent != NO_PARENT {
            edges.push(l.edge);
        }
        i = l.parent;
    }
    edges.reverse();
    edges
}
