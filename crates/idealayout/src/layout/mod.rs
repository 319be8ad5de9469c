//! Layered layout engine
//!
//! The pipeline runs in five stages, each in its own module:
//!
//! 1. [`adjacency`] indexes parents and children from the edge list
//! 2. [`rank`] orders nodes topologically and assigns longest-path ranks
//! 3. [`columns`] groups nodes by rank
//! 4. [`ordering`] sorts each column by parent barycenter and previous y
//! 5. [`coordinates`] turns column and row into pixel positions
//!
//! [`LayoutEngine::relayout_all`] runs all of it over the whole graph.
//! [`LayoutEngine::relayout_from`] (in [`incremental`]) re-runs it over the
//! columns an edit can have touched.

pub mod adjacency;
pub mod columns;
pub mod coordinates;
pub mod incremental;
pub mod ordering;
pub mod rank;

use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, span, Level};

use crate::core::{GraphEdge, GraphNode, LayoutConfig, Position};
use adjacency::Adjacency;

/// Why a layout is of reduced quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DegradeReason {
    /// Kahn's algorithm ordered only `ordered` of `total` nodes; the rest
    /// were ranked in fallback order and some edges may point backwards
    CycleDetected { ordered: usize, total: usize },
}

/// Whether every edge could be honoured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum LayoutStatus {
    #[default]
    Complete,
    Degraded(DegradeReason),
}

/// Which part of the graph a call re-placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum RelayoutScope {
    /// Every node was re-placed
    #[default]
    Full,
    /// Only nodes ranked `min_rank` or higher were re-placed
    Partial {
        min_rank: usize,
        movable: usize,
        fixed: usize,
        /// The changed node and its descendants
        affected: usize,
    },
}

/// Everything a layout call learned besides the positions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutSummary {
    /// Rank of every input node id
    pub ranks: HashMap<String, usize>,
    /// Final order of the re-placed columns. For a partial relayout,
    /// `columns[i]` holds rank `min_rank + i`.
    pub columns: Vec<Vec<String>>,
    pub status: LayoutStatus,
    pub scope: RelayoutScope,
    /// Edge crossings between adjacent re-placed columns
    pub crossings: usize,
}

/// Nodes with fresh positions, plus what the engine learned placing them
#[derive(Debug, Clone)]
pub struct Layout<D> {
    /// The input nodes, in input order, with `position` replaced
    pub nodes: Vec<GraphNode<D>>,
    pub summary: LayoutSummary,
}

impl<D> Layout<D> {
    /// Drop the summary and keep the nodes
    pub fn into_nodes(self) -> Vec<GraphNode<D>> {
        self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode<D>> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn position_of(&self, id: &str) -> Option<Position> {
        self.node(id).map(|n| n.position)
    }

    pub fn rank_of(&self, id: &str) -> Option<usize> {
        self.summary.ranks.get(id).copied()
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.summary.status, LayoutStatus::Degraded(_))
    }
}

/// Result of one pass of the pipeline over a set of nodes
#[derive(Debug)]
pub(crate) struct Placement<'a> {
    pub positions: HashMap<&'a str, Position>,
    pub ranks: HashMap<&'a str, usize>,
    pub columns: Vec<Vec<&'a str>>,
    pub crossings: usize,
    pub degraded: Option<DegradeReason>,
}

impl Placement<'_> {
    fn owned_columns(&self) -> Vec<Vec<String>> {
        self.columns
            .iter()
            .map(|column| column.iter().map(|id| id.to_string()).collect())
            .collect()
    }
}

/// The layout engine
///
/// Holds only its configuration; every call works on its own inputs, so
/// one engine can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Recompute the position of every node
    ///
    /// Never fails: dangling edges are ignored and cycles are ranked in
    /// fallback order, reported through [`LayoutStatus::Degraded`]. Only
    /// `position` changes on the returned nodes.
    pub fn relayout_all<D, E>(
        &self,
        nodes: Vec<GraphNode<D>>,
        edges: &[GraphEdge<E>],
    ) -> Layout<D> {
        let layout_span = span!(
            Level::INFO,
            "relayout_all",
            node_count = nodes.len(),
            edge_count = edges.len()
        );
        let _enter = layout_span.enter();

        let (positions, summary) = {
            let refs: Vec<&GraphNode<D>> = nodes.iter().collect();
            let pairs: Vec<(&str, &str)> = edges.iter().map(GraphEdge::endpoints).collect();
            let placement = self.place(&refs, &pairs, 0.0);

            let positions: Vec<Option<Position>> = nodes
                .iter()
                .map(|n| placement.positions.get(n.id.as_str()).copied())
                .collect();
            let summary = LayoutSummary {
                ranks: owned_ranks(&placement.ranks),
                columns: placement.owned_columns(),
                status: status_of(placement.degraded),
                scope: RelayoutScope::Full,
                crossings: placement.crossings,
            };
            (positions, summary)
        };

        Layout {
            nodes: apply_positions(nodes, positions),
            summary,
        }
    }

    /// Run the pipeline over `nodes`, starting the first column at `origin_x`
    ///
    /// Edges may reference ids outside `nodes`. Nodes sharing an id share
    /// the position of the first of them.
    pub(crate) fn place<'a, D>(
        &self,
        nodes: &[&'a GraphNode<D>],
        edges: &[(&'a str, &'a str)],
        origin_x: f64,
    ) -> Placement<'a> {
        let config = &self.config;

        let mut by_id: HashMap<&'a str, &'a GraphNode<D>> = HashMap::with_capacity(nodes.len());
        let mut ids: Vec<&'a str> = Vec::with_capacity(nodes.len());
        for &node in nodes {
            let id = node.id.as_str();
            if let Entry::Vacant(slot) = by_id.entry(id) {
                slot.insert(node);
                ids.push(id);
            }
        }
        if ids.len() < nodes.len() {
            debug!(duplicates = nodes.len() - ids.len(), "Ignoring repeated node ids");
        }

        let index_span = span!(Level::DEBUG, "index_adjacency");
        let index_enter = index_span.enter();
        let adjacency = Adjacency::from_edges(edges.iter().copied());
        let dangling = edges
            .iter()
            .filter(|(source, target)| !by_id.contains_key(source) || !by_id.contains_key(target))
            .count();
        debug!(edge_count = adjacency.edge_count(), dangling, "Indexed adjacency");
        drop(index_enter);

        let rank_span = span!(Level::DEBUG, "assign_ranks");
        let rank_enter = rank_span.enter();
        let ranking = rank::rank_nodes(&ids, &adjacency, config.cycle_fallback);
        let degraded = (!ranking.order.is_complete()).then(|| DegradeReason::CycleDetected {
            ordered: ranking.order.resolved,
            total: ids.len(),
        });
        debug!(column_count = ranking.column_count(), "Assigned ranks");
        drop(rank_enter);

        let columns_span = span!(Level::DEBUG, "build_columns");
        let columns_enter = columns_span.enter();
        let mut columns = columns::build_columns(&ids, &ranking.ranks);
        debug!(column_count = columns.len(), "Built columns");
        drop(columns_enter);

        let order_span = span!(Level::DEBUG, "order_columns");
        let order_enter = order_span.enter();
        ordering::order_columns(&mut columns, &adjacency, |id| {
            by_id.get(id).map(|n| n.position.y).unwrap_or(0.0)
        });
        let crossings = ordering::cross_count(&columns, &adjacency);
        debug!(crossings, "Ordered columns");
        drop(order_enter);

        let coordinates_span = span!(Level::DEBUG, "assign_coordinates", origin_x);
        let coordinates_enter = coordinates_span.enter();
        let positions = coordinates::assign_coordinates(
            &columns,
            |id| {
                by_id
                    .get(id)
                    .map(|n| (n.width_or(config.default_width), n.height_or(config.default_height)))
                    .unwrap_or((config.default_width, config.default_height))
            },
            config,
            origin_x,
        );
        debug!(positioned = positions.len(), "Assigned coordinates");
        drop(coordinates_enter);

        info!(
            node_count = ids.len(),
            column_count = columns.len(),
            crossings,
            degraded = degraded.is_some(),
            "Layout completed"
        );

        Placement {
            positions,
            ranks: ranking.ranks,
            columns,
            crossings,
            degraded,
        }
    }
}

pub(crate) fn status_of(degraded: Option<DegradeReason>) -> LayoutStatus {
    degraded.map(LayoutStatus::Degraded).unwrap_or_default()
}

pub(crate) fn owned_ranks(ranks: &HashMap<&str, usize>) -> HashMap<String, usize> {
    ranks.iter().map(|(&id, &rank)| (id.to_string(), rank)).collect()
}

/// Ids in first-occurrence order, without duplicates
pub(crate) fn unique_ids<'a, D>(nodes: &'a [GraphNode<D>]) -> Vec<&'a str> {
    let mut seen = HashSet::with_capacity(nodes.len());
    nodes
        .iter()
        .map(|n| n.id.as_str())
        .filter(|id| seen.insert(*id))
        .collect()
}

pub(crate) fn apply_positions<D>(
    nodes: Vec<GraphNode<D>>,
    positions: Vec<Option<Position>>,
) -> Vec<GraphNode<D>> {
    nodes
        .into_iter()
        .zip(positions)
        .map(|(mut node, position)| {
            if let Some(position) = position {
                node.position = position;
            }
            node
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> GraphNode<()> {
        GraphNode::new(id, ())
    }

    fn edge(source: &str, target: &str) -> GraphEdge<()> {
        GraphEdge::between(source, target)
    }

    #[test]
    fn test_single_node_at_origin() {
        let nodes = vec![node("A").with_position(50.0, 70.0)];
        let layout = LayoutEngine::new().relayout_all(nodes, &[] as &[GraphEdge<()>]);
        assert_eq!(layout.rank_of("A"), Some(0));
        assert_eq!(layout.position_of("A"), Some(Position::ORIGIN));
        assert_eq!(layout.summary.status, LayoutStatus::Complete);
        assert_eq!(layout.summary.scope, RelayoutScope::Full);
    }

    #[test]
    fn test_chain_moves_right() {
        let layout =
            LayoutEngine::new().relayout_all(vec![node("A"), node("B")], &[edge("A", "B")]);
        assert_eq!(layout.position_of("A"), Some(Position::new(0.0, 0.0)));
        assert_eq!(layout.position_of("B"), Some(Position::new(480.0, 0.0)));
        assert_eq!(layout.summary.columns, vec![vec!["A".to_string()], vec!["B".to_string()]]);
    }

    #[test]
    fn test_output_keeps_input_order_and_data() {
        let nodes = vec![
            GraphNode::new("B", 2u32),
            GraphNode::new("A", 1u32),
        ];
        let layout = LayoutEngine::new().relayout_all(nodes, &[edge("A", "B")]);
        let ids: Vec<_> = layout.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
        assert_eq!(layout.nodes[0].data, 2);
        assert_eq!(layout.nodes[1].data, 1);
    }

    #[test]
    fn test_size_hints_are_untouched() {
        let nodes = vec![node("A").with_size(500.0, 80.0), node("B")];
        let layout = LayoutEngine::new().relayout_all(nodes, &[edge("A", "B")]);
        let a = layout.node("A").unwrap();
        assert_eq!(a.width, Some(500.0));
        assert_eq!(a.height, Some(80.0));
        assert_eq!(layout.position_of("B").unwrap().x, 660.0);
        assert_eq!(layout.node("B").unwrap().width, None);
    }

    #[test]
    fn test_cycle_is_degraded_not_fatal() {
        let nodes = vec![node("A"), node("B"), node("C")];
        let edges = vec![edge("A", "B"), edge("B", "C"), edge("C", "A")];
        let layout = LayoutEngine::new().relayout_all(nodes, &edges);
        assert_eq!(layout.nodes.len(), 3);
        assert!(layout.is_degraded());
        assert_eq!(
            layout.summary.status,
            LayoutStatus::Degraded(DegradeReason::CycleDetected { ordered: 0, total: 3 })
        );
    }

    #[test]
    fn test_duplicate_ids_share_a_position() {
        let nodes = vec![node("A"), node("A"), node("B")];
        let layout = LayoutEngine::new().relayout_all(nodes, &[edge("A", "B")]);
        assert_eq!(layout.nodes.len(), 3);
        assert_eq!(layout.nodes[0].position, layout.nodes[1].position);
        assert_eq!(layout.nodes[2].position.x, 480.0);
    }

    #[test]
    fn test_empty_graph() {
        let layout =
            LayoutEngine::new().relayout_all(Vec::<GraphNode<()>>::new(), &[] as &[GraphEdge<()>]);
        assert!(layout.nodes.is_empty());
        assert!(layout.summary.columns.is_empty());
        assert_eq!(layout.summary.crossings, 0);
    }

    #[test]
    fn test_custom_spacing() {
        let config = LayoutConfig::default()
            .with_column_gap(10.0)
            .with_row_gap(5.0)
            .with_default_size(100.0, 20.0);
        let nodes = vec![node("A"), node("B"), node("C")];
        let edges = vec![edge("A", "B"), edge("A", "C")];
        let layout = LayoutEngine::with_config(config).relayout_all(nodes, &edges);
        let b = layout.position_of("B").unwrap();
        let c = layout.position_of("C").unwrap();
        assert_eq!(b.x, 110.0);
        assert_eq!(c.x, 110.0);
        assert_eq!((b.y - c.y).abs(), 25.0);
    }

    #[test]
    fn test_unique_ids() {
        let nodes = vec![node("B"), node("A"), node("B")];
        assert_eq!(unique_ids(&nodes), vec!["B", "A"]);
    }
}
