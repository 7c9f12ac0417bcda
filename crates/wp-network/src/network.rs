//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format in both directions.
//! Edges are sorted by `(source, destination)` and indexed by `EdgeId`, so
//! the outgoing edges of node `n` are the contiguous id range
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! and a lookup by `(source, destination)` is a binary search within that
//! range.  The incoming side is a permutation of edge ids sorted by
//! `(destination, source)`:
//!
//! ```text
//! in_edge_ids[ node_in_start[n] .. node_in_start[n+1] ]
//! ```
//!
//! Travel costs are stored densely: edge `e` owns
//! `edge_costs[e * S .. (e + 1) * S]`, aligned index-for-index with the
//! network's [`SampleSeries`] of length `S`.  A missing sample is therefore
//! unrepresentable once [`RoadNetworkBuilder::build`] has succeeded.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId`, for
//! callers that pick query endpoints from a map.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::info;

use wp_core::{EdgeId, GeoPoint, NodeId, Position, SampleSeries};

use crate::error::{Invalid, NetworkError, NetworkResult};
use crate::ttf::{CostProfile, TimeCostTable};
use crate::width::RushWindows;

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Sufficient for
    /// nearest-node queries within a city.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── Traversal ─────────────────────────────────────────────────────────────────

/// Outcome of departing along one edge at a given time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Traversal {
    /// Arrival time at the edge's destination (minutes).
    pub arrival: f64,
    /// Travel cost, `arrival − departure` (minutes).
    pub cost: f64,
    /// Usable width at the departure time (metres).
    pub width: f64,
    /// `width × length_km`; summed along a path and divided by the path
    /// length this gives the length-weighted mean width.
    pub width_km: f64,
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Immutable, validated, time-dependent directed road graph.
///
/// Built once by [`RoadNetworkBuilder`] and then shared by reference with
/// every search; nothing mutates it afterwards.  Array fields are `pub` for
/// indexed access on hot paths.
#[derive(Debug)]
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// Outgoing edges of node `n` are EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Row pointer into [`in_edge_ids`](Self::in_edge_ids).
    pub node_in_start: Vec<u32>,

    /// Edge ids sorted by `(destination, source)`.
    pub in_edge_ids: Vec<EdgeId>,

    // ── Edge data (indexed by EdgeId) ─────────────────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,

    /// Static length in kilometres.
    pub edge_length_km: Vec<f64>,

    /// Width outside rush hours (metres).
    pub edge_base_width: Vec<f64>,

    /// Width inside rush hours (metres).
    pub edge_rush_width: Vec<f64>,

    /// Minimum cost over all samples; an admissible per-edge lower bound.
    pub edge_min_cost: Vec<f64>,

    /// Maximum cost over all samples.
    pub edge_max_cost: Vec<f64>,

    /// Dense `edge_count × S` cost matrix, row-major by edge.
    edge_costs: Vec<f64>,

    /// Per-sample widths for edges whose width varies with congestion.
    edge_sample_widths: Vec<Option<Box<[f64]>>>,

    // ── Time model ────────────────────────────────────────────────────────
    series: SampleSeries,
    rush: RushWindows,
    /// Whether any edge's width depends on the time of day.
    widths_vary: bool,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// The shared sample series every edge's costs are aligned with.
    #[inline]
    pub fn series(&self) -> &SampleSeries {
        &self.series
    }

    #[inline]
    pub fn rush_windows(&self) -> &RushWindows {
        &self.rush
    }

    // ── Checked lookups ───────────────────────────────────────────────────

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    /// Position of `node`, or `NodeNotFound`.
    pub fn node(&self, node: NodeId) -> NetworkResult<GeoPoint> {
        self.node_pos
            .get(node.index())
            .copied()
            .ok_or(NetworkError::NodeNotFound(node))
    }

    /// The edge `from → to`, if both nodes exist and are connected.
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        if !self.contains(from) {
            return None;
        }
        let start = self.node_out_start[from.index()] as usize;
        let end = self.node_out_start[from.index() + 1] as usize;
        self.edge_to[start..end]
            .binary_search(&to)
            .ok()
            .map(|i| EdgeId((start + i) as u32))
    }

    /// The edge `from → to`, or `NodeNotFound` / `EdgeNotFound`.
    pub fn edge(&self, from: NodeId, to: NodeId) -> NetworkResult<EdgeId> {
        if !self.contains(from) {
            return Err(NetworkError::NodeNotFound(from));
        }
        if !self.contains(to) {
            return Err(NetworkError::NodeNotFound(to));
        }
        self.find_edge(from, to)
            .ok_or(NetworkError::EdgeNotFound { from, to })
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Outgoing edge ids of `node`.  Contiguous range, no allocation.
    ///
    /// Panics if `node` is outside the network.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Incoming edge ids of `node`, ordered by source.
    ///
    /// Panics if `node` is outside the network.
    #[inline]
    pub fn in_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_in_start[node.index()] as usize;
        let end = self.node_in_start[node.index() + 1] as usize;
        self.in_edge_ids[start..end].iter().copied()
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        (self.node_out_start[node.index() + 1] - self.node_out_start[node.index()]) as usize
    }

    #[inline]
    pub fn in_degree(&self, node: NodeId) -> usize {
        (self.node_in_start[node.index() + 1] - self.node_in_start[node.index()]) as usize
    }

    // ── Temporal evaluation ───────────────────────────────────────────────

    /// Cost profile of `edge`.
    #[inline]
    pub fn profile(&self, edge: EdgeId) -> CostProfile<'_> {
        let s = self.series.len();
        let row = edge.index() * s;
        CostProfile::new(&self.series, &self.edge_costs[row..row + s])
    }

    /// Arrival time at the head of `edge` when departing at `depart_at`.
    #[inline]
    pub fn arrival_time(&self, edge: EdgeId, depart_at: f64) -> f64 {
        self.profile(edge).arrival(depart_at)
    }

    /// Latest departure along `edge` that still arrives by `arrive_by`.
    #[inline]
    pub fn latest_departure(&self, edge: EdgeId, arrive_by: f64) -> f64 {
        self.profile(edge).latest_departure(arrive_by)
    }

    /// Whether some edge's width at departure depends on the time of day,
    /// through rush windows or per-sample widths.  When it does, two partial
    /// paths standing at the same node at different times can score
    /// differently on the same continuation.
    #[inline]
    pub fn has_time_varying_widths(&self) -> bool {
        self.widths_vary
    }

    /// Usable width of `edge` at time `t`.
    pub fn width_at(&self, edge: EdgeId, t: f64) -> f64 {
        let e = edge.index();
        if let Some(widths) = &self.edge_sample_widths[e] {
            return match self.series.locate(t) {
                Position::Before => widths[0],
                Position::After => widths[widths.len() - 1],
                Position::At(k) | Position::Between { lo: k, .. } => widths[k],
            };
        }
        if self.rush.contains(t) {
            self.edge_rush_width[e]
        } else {
            self.edge_base_width[e]
        }
    }

    /// Depart along `edge` at `depart_at`.
    pub fn traverse(&self, edge: EdgeId, depart_at: f64) -> Traversal {
        let cost = self.profile(edge).cost_at(depart_at);
        let width = self.width_at(edge, depart_at);
        Traversal {
            arrival: depart_at + cost,
            cost,
            width,
            width_km: width * self.edge_length_km[edge.index()],
        }
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest road node to `pos`.
    ///
    /// Returns `None` only if the network has no nodes.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lon])
            .map(|e| e.id)
    }

    /// Return up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Static attributes of a directed edge.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeAttrs {
    pub length_km:  f64,
    pub base_width: f64,
    pub rush_width: f64,
}

impl EdgeAttrs {
    pub fn new(length_km: f64, base_width: f64, rush_width: f64) -> Self {
        Self { length_km, base_width, rush_width }
    }
}

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// Nodes and edges may be added in any order.  `build()` runs the load-time
/// validation pass and rejects the whole network on the first violation.
///
/// # Example
///
/// ```
/// use wp_core::GeoPoint;
/// use wp_network::{cost_table, EdgeAttrs, RoadNetworkBuilder};
///
/// let mut b = RoadNetworkBuilder::new(vec![0, 600, 1020]);
/// let a = b.add_node(GeoPoint::new(30.69, -88.04));
/// let c = b.add_node(GeoPoint::new(30.70, -88.03));
/// let costs = cost_table([(0, 5.0), (600, 5.0), (1020, 8.0)]);
/// b.add_road(a, c, EdgeAttrs::new(1.2, 10.0, 6.0), costs);
/// let net = b.build().unwrap();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
pub struct RoadNetworkBuilder {
    series:    Vec<u32>,
    rush:      RushWindows,
    nodes:     Vec<GeoPoint>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:  NodeId,
    to:    NodeId,
    attrs: EdgeAttrs,
    table: TimeCostTable,
}

/// An edge that passed per-edge validation, with its table densified.
struct CheckedEdge {
    from:   NodeId,
    to:     NodeId,
    attrs:  EdgeAttrs,
    costs:  Vec<f64>,
    widths: Option<Box<[f64]>>,
}

impl RoadNetworkBuilder {
    /// Start a network whose edges are all sampled at `series` (minutes since
    /// midnight).  The series is validated by [`build`](Self::build).
    pub fn new(series: Vec<u32>) -> Self {
        Self::with_capacity(series, 0, 0)
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(series: Vec<u32>, nodes: usize, edges: usize) -> Self {
        Self {
            series,
            rush:      RushWindows::default(),
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Replace the default rush-hour windows.
    pub fn set_rush_windows(&mut self, rush: RushWindows) {
        self.rush = rush;
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge from `from` to `to`.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, attrs: EdgeAttrs, table: TimeCostTable) {
        self.raw_edges.push(RawEdge { from, to, attrs, table });
    }

    /// Add edges in **both directions** with identical attributes and costs.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, attrs: EdgeAttrs, table: TimeCostTable) {
        self.add_edge(b, a, attrs, table.clone());
        self.add_edge(a, b, attrs, table);
    }

    /// Position of a node added earlier, if any.  Used by loaders to derive
    /// edge lengths from geometry.
    pub fn node_pos(&self, id: NodeId) -> Option<GeoPoint> {
        self.nodes.get(id.index()).copied()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Validate and consume the builder.
    ///
    /// Rejects (as [`NetworkError::InvalidNetwork`]): an empty or unsorted
    /// series, non-finite node positions, dangling endpoints, self-loops,
    /// duplicate `(from, to)` pairs, negative or non-finite attributes,
    /// tables whose key set differs from the series, negative or non-finite
    /// costs, per-sample widths given for only part of a table, and FIFO
    /// violations.
    pub fn build(self) -> NetworkResult<RoadNetwork> {
        let series = SampleSeries::new(self.series).map_err(Invalid::from)?;
        let node_count = self.nodes.len();

        for (i, p) in self.nodes.iter().enumerate() {
            if !(p.lat.is_finite() && p.lon.is_finite()) {
                return Err(Invalid::BadPosition { node: NodeId(i as u32) }.into());
            }
        }

        let mut edges: Vec<CheckedEdge> = self
            .raw_edges
            .into_iter()
            .map(|raw| check_edge(raw, &series, node_count))
            .collect::<Result<_, Invalid>>()?;

        edges.sort_unstable_by_key(|e| (e.from, e.to));
        if let Some(w) = edges.windows(2).find(|w| (w[0].from, w[0].to) == (w[1].from, w[1].to)) {
            return Err(Invalid::DuplicateEdge { from: w[0].from, to: w[0].to }.into());
        }

        for e in &edges {
            if let Some(k) = CostProfile::new(&series, &e.costs).first_fifo_violation() {
                return Err(Invalid::FifoViolation {
                    from:   e.from,
                    to:     e.to,
                    minute: series.points()[k],
                }
                .into());
            }
        }

        let edge_count = edges.len();

        // Outgoing CSR row pointer.
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &edges {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // Incoming index: a permutation of edge ids by (to, from).
        let mut in_edge_ids: Vec<EdgeId> = (0..edge_count).map(|i| EdgeId(i as u32)).collect();
        in_edge_ids.sort_unstable_by_key(|id| (edges[id.index()].to, edges[id.index()].from));
        let mut node_in_start = vec![0u32; node_count + 1];
        for e in &edges {
            node_in_start[e.to.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_in_start[i] += node_in_start[i - 1];
        }

        let mut edge_from = Vec::with_capacity(edge_count);
        let mut edge_to = Vec::with_capacity(edge_count);
        let mut edge_length_km = Vec::with_capacity(edge_count);
        let mut edge_base_width = Vec::with_capacity(edge_count);
        let mut edge_rush_width = Vec::with_capacity(edge_count);
        let mut edge_min_cost = Vec::with_capacity(edge_count);
        let mut edge_max_cost = Vec::with_capacity(edge_count);
        let mut edge_costs = Vec::with_capacity(edge_count * series.len());
        let mut edge_sample_widths = Vec::with_capacity(edge_count);

        for e in edges {
            let profile = CostProfile::new(&series, &e.costs);
            edge_min_cost.push(profile.lower_bound());
            edge_max_cost.push(profile.upper_bound());
            edge_from.push(e.from);
            edge_to.push(e.to);
            edge_length_km.push(e.attrs.length_km);
            edge_base_width.push(e.attrs.base_width);
            edge_rush_width.push(e.attrs.rush_width);
            edge_costs.extend_from_slice(&e.costs);
            edge_sample_widths.push(e.widths);
        }

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry { point: [pos.lat, pos.lon], id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        let steps_vary = edge_sample_widths
            .iter()
            .flatten()
            .any(|w| w.windows(2).any(|p| p[0] != p[1]));
        let rush_varies = !self.rush.windows().is_empty()
            && edge_base_width.iter().zip(&edge_rush_width).any(|(b, r)| b != r);

        info!(
            nodes = node_count,
            edges = edge_count,
            samples = series.len(),
            "road network built"
        );

        Ok(RoadNetwork {
            node_pos: self.nodes,
            node_out_start,
            node_in_start,
            in_edge_ids,
            edge_from,
            edge_to,
            edge_length_km,
            edge_base_width,
            edge_rush_width,
            edge_min_cost,
            edge_max_cost,
            edge_costs,
            edge_sample_widths,
            series,
            rush: self.rush,
            widths_vary: steps_vary || rush_varies,
            spatial_idx,
        })
    }
}

/// Per-edge validation: endpoints, attributes, table coverage and values.
fn check_edge(raw: RawEdge, series: &SampleSeries, node_count: usize) -> Result<CheckedEdge, Invalid> {
    let RawEdge { from, to, attrs, table } = raw;

    if from.index() >= node_count || to.index() >= node_count {
        return Err(Invalid::DanglingEndpoint { from, to });
    }
    if from == to {
        return Err(Invalid::SelfLoop { node: from });
    }
    for (what, value) in [
        ("length_km", attrs.length_km),
        ("base_width", attrs.base_width),
        ("rush_width", attrs.rush_width),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(Invalid::BadAttribute { from, to, what, value });
        }
    }

    if let Some(&minute) = table.keys().find(|m| series.index_of(**m).is_none()) {
        return Err(Invalid::UnknownSample { from, to, minute });
    }

    let mut costs = Vec::with_capacity(series.len());
    let mut widths = Vec::with_capacity(series.len());
    for &minute in series.points() {
        let Some(props) = table.get(&minute) else {
            return Err(Invalid::MissingSample { from, to, minute });
        };
        if !props.cost.is_finite() || props.cost < 0.0 {
            return Err(Invalid::BadCost { from, to, minute, cost: props.cost });
        }
        costs.push(props.cost);
        if let Some(w) = props.width {
            if !w.is_finite() || w < 0.0 {
                return Err(Invalid::BadAttribute { from, to, what: "sample width", value: w });
            }
            widths.push(w);
        }
    }

    let widths = match widths.len() {
        0 => None,
        n if n == costs.len() => Some(widths.into_boxed_slice()),
        _ => return Err(Invalid::PartialWidths { from, to }),
    };

    Ok(CheckedEdge { from, to, attrs, costs, widths })
}
