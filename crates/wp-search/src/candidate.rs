//! Candidate paths produced by one departure's search.

use wp_core::{EdgeId, NodeId, TurnThresholds};
use wp_network::RoadNetwork;

use crate::objective::{classify_turn, mean_width};

/// A complete source → target path evaluated for one departure time.
///
/// Metrics are derived by replaying the edges from `departure`, so two
/// candidates with the same edges and departure are bit-identical.
#[derive(Clone, Debug, PartialEq)]
pub struct PathCandidate {
    pub departure: f64,
    pub arrival:   f64,
    /// Node sequence, source first.  A trivial path holds only the source.
    pub path:  Vec<NodeId>,
    pub edges: Vec<EdgeId>,
    pub right_turns: u32,
    pub sharp_turns: u32,
    /// Σ width × length over the edges, width taken at each edge's
    /// departure time.
    pub width_km:  f64,
    pub length_km: f64,
    /// Set by [`Scorer::select`](crate::Scorer::select); 0 until then.
    pub score: f64,
}

impl PathCandidate {
    /// The empty path at `source`.
    pub fn trivial(source: NodeId, departure: f64) -> Self {
        Self {
            departure,
            arrival: departure,
            path: vec![source],
            edges: Vec::new(),
            right_turns: 0,
            sharp_turns: 0,
            width_km: 0.0,
            length_km: 0.0,
            score: 0.0,
        }
    }

    /// Evaluate the path `source →edges→ …` departing at `departure`.
    ///
    /// `edges` must be a connected walk starting at `source`.
    pub fn replay(
        network: &RoadNetwork,
        turns: &TurnThresholds,
        source: NodeId,
        departure: f64,
        edges: Vec<EdgeId>,
    ) -> Self {
        let mut c = Self::trivial(source, departure);
        c.path.reserve(edges.len());
        let mut t = departure;
        for &e in &edges {
            let from = network.edge_from[e.index()];
            let to = network.edge_to[e.index()];
            debug_assert_eq!(c.path.last(), Some(&from));
            if let [.., prev, _] = c.path.as_slice() {
                let turn = classify_turn(network, turns, *prev, from, to);
                c.right_turns += u32::from(turn.right);
                c.sharp_turns += u32::from(turn.sharp);
            }
            let tr = network.traverse(e, t);
            t = tr.arrival;
            c.width_km += tr.width_km;
            c.length_km += network.edge_length_km[e.index()];
            c.path.push(to);
        }
        c.arrival = t;
        c.edges = edges;
        c
    }

    #[inline]
    pub fn source(&self) -> NodeId {
        self.path[0]
    }

    #[inline]
    pub fn target(&self) -> NodeId {
        self.path[self.path.len() - 1]
    }

    #[inline]
    pub fn travel_time(&self) -> f64 {
        self.arrival - self.departure
    }

    /// Length-weighted mean width in metres.
    #[inline]
    pub fn wideness(&self) -> f64 {
        mean_width(self.width_km, self.length_km)
    }
}
