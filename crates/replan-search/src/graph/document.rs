//! JSON interchange with the importer and the visualizer.
//!
//! The shape mirrors what the map importer emits: nodes carry canvas `x`/`y` plus
//! optional `lat`/`lng`, edges carry `from`/`to` keys, a `weight` and an optional street
//! `name`.

use serde::{Deserialize, Serialize};

use replan_core::errors::GraphError;

use super::model::Graph;
use super::types::{GeoPoint, Position, VertexData};

/// A serialized graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub directed: bool,
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

/// One vertex in a [`GraphDocument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default)]
    pub label: String,
}

/// One edge in a [`GraphDocument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn default_weight() -> f64 {
    1.0
}

/// Errors raised while importing a document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid graph JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl Graph {
    /// Build a graph from a document. Edges referencing unknown node ids are rejected.
    pub fn from_document(doc: &GraphDocument) -> Result<Self, GraphError> {
        let mut graph = Graph::new(doc.directed);
        for node in &doc.nodes {
            let position = match (node.x, node.y) {
                (Some(x), Some(y)) => Some(Position { x, y }),
                _ => None,
            };
            let geo = match (node.lat, node.lng) {
                (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
                _ => None,
            };
            graph.add_vertex(VertexData {
                key: node.id.clone(),
                label: node.label.clone(),
                position,
                geo,
                attributes: Default::default(),
            })?;
        }
        for edge in &doc.edges {
            let from = graph.require_key(&edge.from)?;
            let to = graph.require_key(&edge.to)?;
            graph.add_edge(from, to, edge.weight)?;
            if let Some(data) = graph.edge_mut(from, to) {
                data.blocked = edge.blocked;
                data.label = edge.name.clone();
            }
        }
        Ok(graph)
    }

    /// Parse a JSON document into a graph.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let doc: GraphDocument = serde_json::from_str(json)?;
        Ok(Self::from_document(&doc)?)
    }

    /// Export the graph, including current weights and blocked flags.
    pub fn to_document(&self) -> GraphDocument {
        let nodes = self
            .vertices()
            .filter_map(|id| self.vertex(id))
            .map(|v| NodeRecord {
                id: v.key.clone(),
                x: v.position.map(|p| p.x),
                y: v.position.map(|p| p.y),
                lat: v.geo.map(|g| g.lat),
                lng: v.geo.map(|g| g.lng),
                label: v.label.clone(),
            })
            .collect();

        let edges = self
            .edges()
            .filter_map(|(from, to, data)| {
                Some(EdgeRecord {
                    from: self.vertex(from)?.key.clone(),
                    to: self.vertex(to)?.key.clone(),
                    weight: data.weight,
                    blocked: data.blocked,
                    name: data.label.clone(),
                })
            })
            .collect();

        GraphDocument {
            directed: self.is_directed(),
            nodes,
            edges,
        }
    }
}
