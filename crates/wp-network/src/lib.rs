//! `wp-network` — the time-dependent road network.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (CSR out/in + R-tree), `RoadNetworkBuilder`    |
//! | [`ttf`]     | `CostProfile` evaluation and inversion, `TimeCostTable`      |
//! | [`width`]   | `RushWindows`                                                |
//! | [`loader`]  | `load_dataset`, `load_readers` for the plain-text format     |
//! | [`error`]   | `NetworkError`, `Invalid`, `NetworkResult<T>`                |
//!
//! A `RoadNetwork` only exists after the builder's validation pass has
//! accepted it: every edge has a finite, non-negative cost at every sample
//! of the shared series and satisfies FIFO.  Searches rely on this and index
//! without further checks.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod error;
pub mod loader;
pub mod network;
pub mod ttf;
pub mod width;


pub use error::{Invalid, NetworkError, NetworkResult};
pub use loader::{DatasetPaths, load_dataset, load_readers};
pub use network::{EdgeAttrs, RoadNetwork, RoadNetworkBuilder, Traversal};
pub use ttf::{CostProfile, Properties, TIME_EPS, TimeCostTable, cost_table};
pub use width::RushWindows;
