//! Core graph types consumed and produced by the layout engine
//!
//! Nodes and edges belong to the caller. A layout call borrows their
//! topology and size hints, and hands the nodes back with only
//! [`GraphNode::position`] replaced. The `data` payloads are generic and
//! never inspected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the canvas, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// The canvas origin, where freshly created nodes start out
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A node of the idea graph
///
/// `width` and `height` are optional size hints; the engine substitutes
/// the configured defaults when they are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode<D> {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: D,
}

impl<D> GraphNode<D> {
    /// Create a node at the origin with no size hints
    pub fn new(id: impl Into<String>, data: D) -> Self {
        Self {
            id: id.into(),
            width: None,
            height: None,
            position: Position::ORIGIN,
            data,
        }
    }

    /// Set explicit width and height
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the position the node currently holds on the canvas
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    /// Width, or `default` when the node carries no hint
    pub fn width_or(&self, default: f64) -> f64 {
        self.width.unwrap_or(default)
    }

    /// Height, or `default` when the node carries no hint
    pub fn height_or(&self, default: f64) -> f64 {
        self.height.unwrap_or(default)
    }
}

impl<D> fmt::Display for GraphNode<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.id, self.position)
    }
}

/// A directed edge `source -> target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge<E> {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub data: E,
}

impl<E> GraphEdge<E> {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        data: E,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            data,
        }
    }

    /// Borrow the endpoints as a `(source, target)` pair
    pub fn endpoints(&self) -> (&str, &str) {
        (self.source.as_str(), self.target.as_str())
    }
}

impl<E: Default> GraphEdge<E> {
    /// Edge with an id derived from its endpoints and an empty payload
    pub fn between(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{}->{}", source, target),
            source,
            target,
            data: E::default(),
        }
    }
}

impl<E> fmt::Display for GraphEdge<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_defaults() {
        let node = GraphNode::new("A", ());
        assert_eq!(node.id, "A");
        assert_eq!(node.position, Position::ORIGIN);
        assert_eq!(node.width_or(320.0), 320.0);
        assert_eq!(node.height_or(120.0), 120.0);
    }

    #[test]
    fn test_node_builders() {
        let node = GraphNode::new("A", ())
            .with_size(100.0, 50.0)
            .with_position(10.0, 20.0);
        assert_eq!(node.width_or(320.0), 100.0);
        assert_eq!(node.height_or(120.0), 50.0);
        assert_eq!(node.position, Position::new(10.0, 20.0));
    }

    #[test]
    fn test_edge_between() {
        let edge: GraphEdge<()> = GraphEdge::between("A", "B");
        assert_eq!(edge.id, "A->B");
        assert_eq!(edge.endpoints(), ("A", "B"));
    }

    #[test]
    fn test_display() {
        let node = GraphNode::new("A", ()).with_position(1.0, 2.5);
        assert_eq!(node.to_string(), "A @ (1, 2.5)");
        let edge: GraphEdge<()> = GraphEdge::between("A", "B");
        assert_eq!(edge.to_string(), "A -> B");
    }
}
