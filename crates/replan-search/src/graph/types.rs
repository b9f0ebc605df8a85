//! Vertex and edge payloads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Planar canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Geographic coordinates in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// A vertex in the graph model.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VertexData {
    /// Caller-facing key, unique within a graph.
    pub key: String,
    /// Display label; may be empty.
    #[serde(default)]
    pub label: String,
    pub position: Option<Position>,
    pub geo: Option<GeoPoint>,
    /// Free-form attributes passed through to the visualizer.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl VertexData {
    /// A vertex with only a key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// A vertex placed on the canvas.
    pub fn at(key: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            key: key.into(),
            position: Some(Position { x, y }),
            ..Self::default()
        }
    }

    /// A vertex with geographic coordinates.
    pub fn geo(key: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            key: key.into(),
            geo: Some(GeoPoint { lat, lng }),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Edge payload. Identity is the `(from, to)` pair, plus its reverse for undirected graphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    /// Traversal cost, finite and non-negative.
    pub weight: f64,
    /// A blocked edge stays in the graph but cannot be traversed.
    pub blocked: bool,
    /// Street name or other label, if any.
    pub label: Option<String>,
}

impl EdgeData {
    pub fn new(weight: f64) -> Self {
        Self {
            weight,
            blocked: false,
            label: None,
        }
    }

    /// Cost of traversing this edge: the weight, or infinity when blocked.
    pub fn cost(&self) -> f64 {
        if self.blocked {
            f64::INFINITY
        } else {
            self.weight
        }
    }
}
