//! Graph Model: vertices with coordinates, edges with weight and a blocked flag.
//!
//! Backed by `petgraph::StableGraph` so vertex identifiers never shift. Undirected
//! graphs store one arc per edge and answer neighbor queries in both directions.

pub mod document;
pub mod model;
pub mod types;

pub use document::{DocumentError, EdgeRecord, GraphDocument, NodeRecord};
pub use model::Graph;
pub use types::{EdgeData, GeoPoint, Position, VertexData};
