//! `wp-core` — foundational types for the `widepath` routing engine.
//!
//! This crate is a dependency of every other `wp-*` crate.  It has no `wp-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                |
//! |-------------|---------------------------------------------------------|
//! | [`ids`]     | `NodeId`, `EdgeId`                                      |
//! | [`geo`]     | `GeoPoint`, haversine distance, bearings, turn angles   |
//! | [`time`]    | `SampleSeries`, `Position`, `ClockTime`                 |
//! | [`mode`]    | `RoutingMode`, `ObjectiveSet` dispatch table            |
//! | [`config`]  | `RouterConfig`, `ObjectiveWeights`, `TurnThresholds`    |
//! | [`error`]   | `CoreError`, `CoreResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod mode;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ObjectiveWeights, RouterConfig, TurnThresholds};
pub use error::{CoreError, CoreResult};
pub use geo::{GeoPoint, heading_change_deg};
pub use ids::{EdgeId, NodeId};
pub use mode::{Objective, ObjectiveSet, Ranking, RoutingMode};
pub use time::{ClockTime, MINUTES_PER_DAY, Position, SampleSeries};
