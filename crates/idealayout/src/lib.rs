//! Idealayout - stable, incremental layered layout for idea graphs
//!
//! Places the nodes of a directed graph in left-to-right columns by
//! longest-path rank, orders each column to follow its parents, and
//! keeps nodes close to where the user last saw them.
//!
//! # Quick Start
//!
//! ```rust
//! use idealayout::prelude::*;
//!
//! let nodes = vec![GraphNode::new("A", ()), GraphNode::new("B", ())];
//! let edges: Vec<GraphEdge<()>> = vec![GraphEdge::between("A", "B")];
//!
//! let nodes = idealayout::relayout_all(nodes, &edges);
//! assert_eq!(nodes[1].position, Position::new(480.0, 0.0));
//! ```
//!
//! # Incremental Relayout
//!
//! After an edit, only the changed node's column and the columns right
//! of it need to move. Large graphs take that shortcut:
//!
//! ```rust
//! use idealayout::prelude::*;
//!
//! let config = LayoutConfig::default().with_incremental_threshold(1);
//! let engine = LayoutEngine::with_config(config);
//!
//! let nodes = vec![
//!     GraphNode::new("root", ()).with_position(40.0, 40.0),
//!     GraphNode::new("child", ()),
//! ];
//! let edges: Vec<GraphEdge<()>> = vec![GraphEdge::between("root", "child")];
//!
//! let layout = engine.relayout_from(nodes, &edges, "child");
//! assert_eq!(layout.position_of("root"), Some(Position::new(40.0, 40.0)));
//! assert!(matches!(layout.summary.scope, RelayoutScope::Partial { min_rank: 1, .. }));
//! ```

pub mod core;
pub mod document;
pub mod layout;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use crate::core::*;
pub use layout::{Layout, LayoutEngine};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        CycleFallback, GraphEdge, GraphNode, LayoutConfig, LayoutError, Position,
    };
    pub use crate::document::GraphDocument;
    pub use crate::layout::{
        DegradeReason, Layout, LayoutEngine, LayoutStatus, LayoutSummary, RelayoutScope,
    };
}

/// Lay out every node with the default configuration
///
/// Returns the nodes in input order with only `position` changed.
///
/// # Example
/// ```rust
/// use idealayout::{GraphEdge, GraphNode};
///
/// let nodes = vec![GraphNode::new("A", ()), GraphNode::new("B", ()), GraphNode::new("C", ())];
/// let edges: Vec<GraphEdge<()>> = vec![GraphEdge::between("A", "B"), GraphEdge::between("A", "C")];
///
/// let nodes = idealayout::relayout_all(nodes, &edges);
/// assert_eq!(nodes[1].position.x, nodes[2].position.x);
/// assert_eq!(nodes[2].position.y, 160.0);
/// ```
pub fn relayout_all<D, E>(nodes: Vec<GraphNode<D>>, edges: &[GraphEdge<E>]) -> Vec<GraphNode<D>> {
    LayoutEngine::new().relayout_all(nodes, edges).into_nodes()
}

/// Re-place the nodes an edit to `changed` can have moved, with the
/// default configuration
pub fn relayout_from<D, E>(
    nodes: Vec<GraphNode<D>>,
    edges: &[GraphEdge<E>],
    changed: &str,
) -> Vec<GraphNode<D>> {
    LayoutEngine::new()
        .relayout_from(nodes, edges, changed)
        .into_nodes()
}
