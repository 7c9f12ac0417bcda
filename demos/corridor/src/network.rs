//! Synthetic downtown grid with rush-hour congestion.
//!
//! Node layout (row = south→north, col = west→east):
//!
//! ```text
//!  row ROWS-1   o──o──o══o──o …
//!               │  │  ║  │
//!  row 0        o──o──o══o──o …
//! ```
//!
//! Every `AVENUE_EVERY`-th row and column is an avenue (wide, fast, less
//! congested); the rest are side streets.  Costs are sampled hourly and
//! peak around 08:00 and 17:30 with a per-road random severity.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use wp_core::{GeoPoint, NodeId};
use wp_network::{cost_table, EdgeAttrs, NetworkResult, RoadNetwork, RoadNetworkBuilder};

pub const ROWS: usize = 30;
pub const COLS: usize = 30;
const AVENUE_EVERY: usize = 5;

/// South-west corner and grid spacing (~330 m N-S, ~450 m E-W).
const LAT_MIN:  f64 = 30.66;
const LAT_STEP: f64 = 0.003;
const LON_MIN:  f64 = -88.10;
const LON_STEP: f64 = 0.0047;

const AVENUE_KMH: f64 = 50.0;
const STREET_KMH: f64 = 30.0;

/// Hourly samples over one day, both ends included.
fn series() -> Vec<u32> {
    (0..=24).map(|h| h * 60).collect()
}

/// Congestion multiplier at `minute`: two Gaussian-shaped peaks.
fn rush_factor(minute: f64, severity: f64) -> f64 {
    let peak = |centre: f64, spread: f64| (-((minute - centre) / spread).powi(2)).exp();
    1.0 + severity * (peak(480.0, 60.0) + peak(1050.0, 75.0))
}

/// Build the grid and return `(network, node_at)`, where
/// `node_at[row * COLS + col]` is the node in that cell.
pub fn build_network(seed: u64) -> NetworkResult<(RoadNetwork, Vec<NodeId>)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut b = RoadNetworkBuilder::with_capacity(series(), ROWS * COLS, 4 * ROWS * COLS);
    let mut nodes = vec![NodeId::INVALID; ROWS * COLS];

    for row in 0..ROWS {
        for col in 0..COLS {
            let pos = GeoPoint::new(
                LAT_MIN + row as f64 * LAT_STEP,
                LON_MIN + col as f64 * LON_STEP,
            );
            nodes[row * COLS + col] = b.add_node(pos);
        }
    }

    let mut road = |b: &mut RoadNetworkBuilder, a: NodeId, z: NodeId, avenue: bool| {
        let (Some(pa), Some(pz)) = (b.node_pos(a), b.node_pos(z)) else { return };
        let length_km = pa.distance_km(pz);
        let (kmh, attrs, severity) = if avenue {
            (AVENUE_KMH, EdgeAttrs::new(length_km, 18.0, 12.0), rng.gen_range(0.3..0.8))
        } else {
            (STREET_KMH, EdgeAttrs::new(length_km, 7.0, 6.0), rng.gen_range(0.5..1.5))
        };
        let free_flow = length_km / kmh * 60.0;
        let table = cost_table(series().into_iter().map(|m| (m, free_flow * rush_factor(m as f64, severity))));
        b.add_road(a, z, attrs, table);
    };

    for row in 0..ROWS {
        for col in 0..COLS - 1 {
            let (a, z) = (nodes[row * COLS + col], nodes[row * COLS + col + 1]);
            road(&mut b, a, z, row % AVENUE_EVERY == 0);
        }
    }
    for row in 0..ROWS - 1 {
        for col in 0..COLS {
            let (a, z) = (nodes[row * COLS + col], nodes[(row + 1) * COLS + col]);
            road(&mut b, a, z, col % AVENUE_EVERY == 0);
        }
    }

    Ok((b.build()?, nodes))
}
