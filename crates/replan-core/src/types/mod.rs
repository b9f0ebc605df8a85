//! Identifier and collection types shared across replan crates.

pub mod collections;
pub mod identifiers;

pub use collections::{FxHashMap, FxHashSet};
pub use identifiers::VertexId;
