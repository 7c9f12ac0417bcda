//! Strongly typed, zero-cost identifier wrappers.
//!
//! Node and edge identifiers are dense indices into the network's SoA
//! arrays.  The inner integer is `pub` so loaders can build ids from raw file
//! values, but callers should prefer `.index()` when indexing.
//!
//! `EdgeId`s are not assigned in insertion order.  The network builder sorts
//! edges by `(source, destination)` and numbers them in that order, so:
//!
//! - the outgoing edges of a node form one contiguous id range, which is
//!   what the CSR row pointer `node_out_start` indexes;
//! - within that range ids ascend with the destination, so looking up the
//!   edge `(from, to)` is a binary search over the range;
//! - an `EdgeId` is only meaningful for the network that assigned it.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to `u32::MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a road-network node.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed road-network edge (position in source-sorted order).
    pub struct EdgeId(u32);
}
