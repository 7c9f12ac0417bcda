//! `wp-search` — time-dependent bidirectional search and objective model.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`bounds`]    | `LowerBounds`: admissible static bounds from min costs     |
//! | [`frontier`]  | forward EA / backward LD frontiers, `Corridor`            |
//! | [`labels`]    | label search: non-dominated simple paths in the corridor   |
//! | [`objective`] | turn classification, `Scorer` (scores, order, Pareto)      |
//! | [`candidate`] | `PathCandidate`                                            |
//! | [`search`]    | `DepartureSearch`: one query, one departure at a time      |
//! | [`error`]     | `SearchError`, `SearchResult<T>`                           |
//!
//! # Per-departure pipeline
//!
//! ```text
//! LowerBounds (once per query)
//!   └─ explore(departure)          forward EA ⇄ backward LD, meet or fail
//!        └─ LabelSearch            candidate paths with τ ≤ LD at every node
//!             └─ Scorer::select    best one, or the Pareto frontier
//! ```

pub mod bounds;
pub mod candidate;
pub mod error;
pub mod frontier;
pub mod labels;
pub mod objective;
pub mod search;

mod queue;

#[cfg(test)]
mod tests;

pub use bounds::LowerBounds;
pub use candidate::PathCandidate;
pub use error::{SearchError, SearchResult};
pub use frontier::Corridor;
pub use objective::{classify_turn, mean_width, Scorer, Turn};
pub use search::DepartureSearch;
