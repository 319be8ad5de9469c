//! JSON graph documents
//!
//! The canvas stores its graph as a React-Flow-shaped document:
//!
//! ```json
//! { "nodes": [ { "id": "a", "position": { "x": 0, "y": 0 }, "data": { "label": "Idea" } } ],
//!   "edges": [ { "id": "e1", "source": "a", "target": "b" } ] }
//! ```
//!
//! `data` payloads are kept as [`serde_json::Value`] and pass through a
//! layout untouched.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use tracing::debug;

use crate::core::{GraphEdge, GraphNode, LayoutConfig, LayoutError, Result};
use crate::layout::adjacency::Adjacency;
use crate::layout::rank::topological_order;
use crate::layout::{LayoutEngine, LayoutSummary};

pub type JsonNode = GraphNode<serde_json::Value>;
pub type JsonEdge = GraphEdge<serde_json::Value>;

/// A graph as exchanged with the canvas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphDocument {
    pub nodes: Vec<JsonNode>,
    pub edges: Vec<JsonEdge>,
}

/// What [`GraphDocument::validate`] found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub node_count: usize,
    pub edge_count: usize,
    /// Edges with at least one endpoint missing from the node list
    pub dangling_edges: usize,
    pub has_cycle: bool,
}

impl GraphDocument {
    pub fn new(nodes: Vec<JsonNode>, edges: Vec<JsonEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Check the document before handing it to the engine
    ///
    /// Duplicate node ids are an error. Dangling edges and cycles are
    /// reported but accepted, since the engine tolerates both.
    pub fn validate(&self) -> Result<DocumentReport> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(LayoutError::duplicate_node(&node.id));
            }
        }

        let dangling_edges = self
            .edges
            .iter()
            .filter(|e| !seen.contains(e.source.as_str()) || !seen.contains(e.target.as_str()))
            .count();

        let ids: Vec<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        let adjacency = Adjacency::from_edges(self.edges.iter().map(GraphEdge::endpoints));
        let has_cycle = !topological_order(&ids, &adjacency, Default::default()).is_complete();

        let report = DocumentReport {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            dangling_edges,
            has_cycle,
        };
        debug!(?report, "Validated document");
        Ok(report)
    }

    /// Lay out every node, returning the updated document
    pub fn relayout_all(self, engine: &LayoutEngine) -> (Self, LayoutSummary) {
        let layout = engine.relayout_all(self.nodes, &self.edges);
        let document = Self {
            nodes: layout.nodes,
            edges: self.edges,
        };
        (document, layout.summary)
    }

    /// Re-place what an edit to `changed` can have moved
    pub fn relayout_from(self, engine: &LayoutEngine, changed: &str) -> (Self, LayoutSummary) {
        let layout = engine.relayout_from(self.nodes, &self.edges, changed);
        let document = Self {
            nodes: layout.nodes,
            edges: self.edges,
        };
        (document, layout.summary)
    }
}

/// Parse a JSON [`LayoutConfig`], filling absent fields with defaults
pub fn config_from_json(json: &str) -> Result<LayoutConfig> {
    let config: LayoutConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Lay out a JSON document and return it as JSON
///
/// Runs [`LayoutEngine::relayout_from`] when `changed` is given and
/// [`LayoutEngine::relayout_all`] otherwise. `config` is an optional JSON
/// [`LayoutConfig`].
pub fn relayout_document_json(
    document: &str,
    changed: Option<&str>,
    config: Option<&str>,
) -> Result<String> {
    let config = match config {
        Some(json) => config_from_json(json)?,
        None => LayoutConfig::default(),
    };
    let engine = LayoutEngine::with_config(config);
    let document = GraphDocument::from_json_str(document)?;

    let (document, _) = match changed {
        Some(id) => document.relayout_from(&engine, id),
        None => document.relayout_all(&engine),
    };
    document.to_json_string()
}
