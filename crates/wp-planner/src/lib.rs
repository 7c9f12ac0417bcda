//! `wp-planner`: query orchestrator for the widepath routing engine.
//!
//! # Query flow
//!
//! ```text
//! Planner::plan(query):
//!   ① Validate   — finite, non-negative times; both endpoints in the network.
//!   ② Departures — window endpoints + every series sample inside the window.
//!   ③ Sweep      — DepartureSearch::run for each departure
//!                  (parallel with the `parallel` feature), shared deadline.
//!   ④ Merge      — in departure order; Scorer::select keeps the best route
//!                  (scalar modes) or the Pareto front (WidenessAndTurns).
//!   ⑤ Assemble   — RouteResult per kept candidate, wide-road share, latency.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the departure sweep on Rayon's thread pool.       |
//! | `serde`    | Serialize queries, outcomes and results.               |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use std::path::Path;
//!
//! use wp_core::{NodeId, RouterConfig, RoutingMode};
//! use wp_network::load_dataset;
//! use wp_planner::{Planner, Query};
//!
//! let network = load_dataset(Path::new("data"), None)?;
//! let planner = Planner::new(&network, RouterConfig::default())?;
//! let query = Query::new(NodeId(0), NodeId(42), 480.0, 60.0, 45.0, RoutingMode::AllObjectives);
//! for route in planner.plan(&query)?.routes() {
//!     println!("{route}");
//! }
//! ```

pub mod error;
pub mod planner;
pub mod query;
pub mod result;

#[cfg(test)]
mod tests;

pub use error::{PlanResult, QueryError};
pub use planner::Planner;
pub use query::{NoPathReason, Query, QueryOutcome};
pub use result::RouteResult;
