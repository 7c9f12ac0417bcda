//! corridor — plan wide, low-turn routes across a city at rush hour.
//!
//! ```text
//! corridor [DATA_DIR] [--config router.json] [--json]
//! ```
//!
//! Without `DATA_DIR` a synthetic 30×30 grid is generated.  With it, the
//! largest `nodes_<n>.txt` / `edges_<n>.txt` dataset in that directory is
//! loaded.  Each routing mode is run for the same corner-to-corner query.
//! Set `RUST_LOG=debug` to trace the search.

mod network;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wp_core::{ClockTime, NodeId, RouterConfig, RoutingMode};
use wp_network::load_dataset;
use wp_planner::{Planner, Query, QueryOutcome};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:          u64 = 7;
const DEPARTURE:     f64 = 450.0; // 07:30
const INTERVAL_MIN:  f64 = 60.0;
const BUDGET_MIN:    f64 = 75.0;

/// Plan wide, low-turn routes across a city at rush hour.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Dataset directory holding `nodes_<n>.txt` / `edges_<n>.txt`.
    /// A synthetic grid is used when omitted.
    data_dir: Option<PathBuf>,

    /// JSON file with a `RouterConfig`; missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print one JSON outcome per mode instead of text.
    #[arg(long)]
    json: bool,
}

fn load_config(path: Option<&Path>) -> Result<RouterConfig> {
    let Some(path) = path else {
        return Ok(RouterConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: RouterConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    // 1. Network and query endpoints.
    let t0 = Instant::now();
    let (network, source, destination) = match &args.data_dir {
        Some(dir) => {
            let net = load_dataset(dir, None)?;
            let last = NodeId::try_from(net.node_count().saturating_sub(1))?;
            (net, NodeId(0), last)
        }
        None => {
            let (net, nodes) = network::build_network(SEED)?;
            let sw = nodes[0];
            let ne = nodes[network::ROWS * network::COLS - 1];
            (net, sw, ne)
        }
    };
    println!(
        "Road network: {} nodes, {} edges, {} samples ({:.3} s)",
        network.node_count(),
        network.edge_count(),
        network.series().len(),
        t0.elapsed().as_secs_f64()
    );
    println!(
        "Query: {source} → {destination}, depart {}–{}, budget {BUDGET_MIN} min",
        ClockTime(DEPARTURE),
        ClockTime(DEPARTURE + INTERVAL_MIN)
    );
    println!();

    // 2. One query per mode.
    let planner = Planner::new(&network, config)?;
    for mode in RoutingMode::ALL {
        let query = Query::new(source, destination, DEPARTURE, INTERVAL_MIN, BUDGET_MIN, mode);
        let outcome = planner.plan(&query)?;

        if args.json {
            println!("{}", serde_json::to_string(&outcome)?);
            continue;
        }

        println!("── {} ──", mode.as_str());
        match &outcome {
            QueryOutcome::NoFeasiblePath(reason) => println!("  {reason}"),
            QueryOutcome::Routes(routes) => {
                for route in routes {
                    println!("  {route}");
                    println!(
                        "    {} nodes, score {:.2}, answered in {:.1} ms",
                        route.path().len(),
                        route.score(),
                        route.latency().as_secs_f64() * 1e3
                    );
                }
            }
        }
        println!();
    }

    Ok(())
}
