//! Dataset loader for the plain-text network format.
//!
//! # Files
//!
//! A dataset directory holds, for a vertex count `n`:
//!
//! | File            | Content                                                 |
//! |-----------------|---------------------------------------------------------|
//! | `nodes_<n>.txt` | one `id lat lon` row per node, space separated          |
//! | `edges_<n>.txt` | line 1: arrival sample series (minutes, space separated)|
//! |                 | line 2: width sample series (read, not used for costs)  |
//! |                 | then one `src dst c1,c2,...,cS` row per directed edge   |
//! | `edge_<n>.txt`  | *optional*, tab separated with a header row:            |
//! |                 | `source destination distance time baseWidth rushWidth`  |
//! |                 | (ids 1-based, distance in km)                           |
//!
//! ```text
//! nodes_3.txt        edges_3.txt
//! 0 30.69 -88.04     0 600 1020
//! 1 30.70 -88.04     0 600 1020
//! 2 30.70 -88.03     0 1 5,5,8
//!                    1 2 5,5,8
//! ```
//!
//! Node ids must be dense `0..n` but may appear in any order.  Edges absent
//! from `edge_<n>.txt` (or all edges, when the file is missing) get their
//! length from the haversine distance between endpoints and zero widths.
//!
//! The assembled network goes through the same validation pass as any other
//! [`RoadNetworkBuilder`] input.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use wp_core::{GeoPoint, NodeId};

use crate::network::{EdgeAttrs, RoadNetwork, RoadNetworkBuilder};
use crate::ttf::{Properties, TimeCostTable};
use crate::width::RushWindows;
use crate::{NetworkError, NetworkResult};

// ── Paths ─────────────────────────────────────────────────────────────────────

/// Resolved file paths of one dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetPaths {
    pub nodes:  PathBuf,
    pub edges:  PathBuf,
    pub widths: Option<PathBuf>,
}

impl DatasetPaths {
    /// Resolve the files of the `vertices`-node dataset in `dir`.
    ///
    /// With `vertices = None` the largest `nodes_<n>.txt` in `dir` is used.
    pub fn in_dir(dir: &Path, vertices: Option<usize>) -> NetworkResult<Self> {
        let n = match vertices {
            Some(n) => n,
            None => detect_vertex_count(dir)?,
        };
        let nodes = dir.join(format!("nodes_{n}.txt"));
        let edges = dir.join(format!("edges_{n}.txt"));
        let widths = dir.join(format!("edge_{n}.txt"));
        Ok(Self {
            nodes,
            edges,
            widths: widths.is_file().then_some(widths),
        })
    }
}

/// Largest `n` among the `nodes_<n>.txt` files in `dir`.
fn detect_vertex_count(dir: &Path) -> NetworkResult<usize> {
    let mut best: Option<usize> = None;
    for entry in std::fs::read_dir(dir)? {
        let name = entry?.file_name();
        let Some(name) = name.to_str() else { continue };
        let n = name
            .strip_prefix("nodes_")
            .and_then(|s| s.strip_suffix(".txt"))
            .and_then(|s| s.parse::<usize>().ok());
        if let Some(n) = n {
            best = Some(best.map_or(n, |b| b.max(n)));
        }
    }
    best.ok_or_else(|| {
        NetworkError::Parse(format!("no nodes_<n>.txt file in {}", dir.display()))
    })
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load and validate the dataset in `dir` with the default rush windows.
pub fn load_dataset(dir: &Path, vertices: Option<usize>) -> NetworkResult<RoadNetwork> {
    let paths = DatasetPaths::in_dir(dir, vertices)?;
    info!(nodes = %paths.nodes.display(), edges = %paths.edges.display(), "loading dataset");
    let widths = paths.widths.as_deref().map(File::open).transpose()?;
    load_readers(
        File::open(&paths.nodes)?,
        File::open(&paths.edges)?,
        widths,
        RushWindows::default(),
    )
}

/// Like [`load_dataset`] but accepts any `Read` sources.
///
/// Useful for testing (pass a `std::io::Cursor`) or for datasets that do not
/// live on the local file system.
pub fn load_readers<N, E, W>(
    nodes: N,
    edges: E,
    widths: Option<W>,
    rush: RushWindows,
) -> NetworkResult<RoadNetwork>
where
    N: Read,
    E: Read,
    W: Read,
{
    let positions = read_nodes(nodes)?;
    let EdgeFile { series, rows } = read_edges(edges)?;
    let known_attrs = match widths {
        Some(r) => read_widths(r)?,
        None => HashMap::new(),
    };
    debug!(
        nodes = positions.len(),
        edges = rows.len(),
        attributed = known_attrs.len(),
        "dataset parsed"
    );

    let mut b = RoadNetworkBuilder::with_capacity(series.clone(), positions.len(), rows.len());
    b.set_rush_windows(rush);
    for pos in positions {
        b.add_node(pos);
    }

    for row in rows {
        if row.costs.len() != series.len() {
            return Err(NetworkError::Parse(format!(
                "edge {} → {}: expected {} costs, found {}",
                row.from,
                row.to,
                series.len(),
                row.costs.len()
            )));
        }
        let attrs = match known_attrs.get(&(row.from, row.to)) {
            Some(&a) => a,
            None => match (b.node_pos(row.from), b.node_pos(row.to)) {
                (Some(a), Some(c)) => EdgeAttrs::new(a.distance_km(c), 0.0, 0.0),
                // Dangling; rejected by the validation pass.
                _ => EdgeAttrs::new(0.0, 0.0, 0.0),
            },
        };
        let table: TimeCostTable = series
            .iter()
            .zip(&row.costs)
            .map(|(&t, &c)| (t, Properties::cost(c)))
            .collect();
        b.add_edge(row.from, row.to, attrs, table);
    }

    b.build()
}

// ── Nodes ─────────────────────────────────────────────────────────────────────

fn space_separated<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn read_nodes<R: Read>(reader: R) -> NetworkResult<Vec<GeoPoint>> {
    let mut rows: Vec<(u32, f64, f64)> = Vec::new();
    for result in space_separated(reader).deserialize::<(u32, f64, f64)>() {
        rows.push(result.map_err(|e| NetworkError::Parse(e.to_string()))?);
    }
    rows.sort_unstable_by_key(|r| r.0);
    for (i, row) in rows.iter().enumerate() {
        if row.0 as usize != i {
            return Err(NetworkError::Parse(format!(
                "node ids must be dense 0..{}: expected {i}, found {}",
                rows.len(),
                row.0
            )));
        }
    }
    Ok(rows.into_iter().map(|(_, lat, lon)| GeoPoint::new(lat, lon)).collect())
}

// ── Edges ─────────────────────────────────────────────────────────────────────

struct EdgeFile {
    series: Vec<u32>,
    rows:   Vec<EdgeRow>,
}

struct EdgeRow {
    from:  NodeId,
    to:    NodeId,
    costs: Vec<f64>,
}

fn parse_field<T: std::str::FromStr>(field: &str, line: u64, what: &str) -> NetworkResult<T> {
    field
        .parse()
        .map_err(|_| NetworkError::Parse(format!("line {line}: invalid {what} {field:?}")))
}

fn read_edges<R: Read>(reader: R) -> NetworkResult<EdgeFile> {
    let mut records = space_separated(reader).into_records();
    let mut next_record = || -> NetworkResult<Option<csv::StringRecord>> {
        records
            .next()
            .transpose()
            .map_err(|e| NetworkError::Parse(e.to_string()))
    };

    let header = next_record()?
        .ok_or_else(|| NetworkError::Parse("edge file is empty".into()))?;
    let series = header
        .iter()
        .map(|f| parse_field::<u32>(f, 1, "sample minute"))
        .collect::<NetworkResult<Vec<_>>>()?;

    // The width series is informational; widths come from the attribute file.
    next_record()?
        .ok_or_else(|| NetworkError::Parse("edge file is missing the width series line".into()))?;

    let mut rows = Vec::new();
    while let Some(record) = next_record()? {
        let line = record.position().map_or(0, |p| p.line());
        let (Some(src), Some(dst), Some(costs), 3) =
            (record.get(0), record.get(1), record.get(2), record.len())
        else {
            return Err(NetworkError::Parse(format!(
                "line {line}: expected `src dst c1,c2,...`, found {} fields",
                record.len()
            )));
        };
        rows.push(EdgeRow {
            from:  NodeId(parse_field(src, line, "source id")?),
            to:    NodeId(parse_field(dst, line, "destination id")?),
            costs: costs
                .split(',')
                .map(|c| parse_field::<f64>(c.trim(), line, "cost"))
                .collect::<NetworkResult<_>>()?,
        });
    }
    Ok(EdgeFile { series, rows })
}

// ── Widths ────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct WidthRecord {
    source:      u32,
    destination: u32,
    distance:    f64,
    #[serde(rename = "baseWidth")]
    base_width:  f64,
    #[serde(rename = "rushWidth")]
    rush_width:  f64,
}

fn read_widths<R: Read>(reader: R) -> NetworkResult<HashMap<(NodeId, NodeId), EdgeAttrs>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = HashMap::new();
    for result in csv_reader.deserialize::<WidthRecord>() {
        let row = result.map_err(|e| NetworkError::Parse(e.to_string()))?;
        if row.source == 0 || row.destination == 0 {
            return Err(NetworkError::Parse(format!(
                "edge attribute ids are 1-based, found {} → {}",
                row.source, row.destination
            )));
        }
        out.insert(
            (NodeId(row.source - 1), NodeId(row.destination - 1)),
            EdgeAttrs::new(row.distance, row.base_width, row.rush_width),
        );
    }
    Ok(out)
}
