//! Incremental relayout after a local edit
//!
//! Editing a node can only disturb its own column and the columns to its
//! right. Columns left of the changed node's rank are frozen: those nodes
//! keep the position they came in with, and the pipeline re-runs over
//! everything ranked at or after it. The re-placed block starts at the
//! x-offset its first column holds in a full layout, so repeated calls
//! land where [`LayoutEngine::relayout_all`] would have put them.
//!
//! Small graphs skip all of this and take the full path.

use std::collections::HashMap;
use tracing::{debug, info, span, Level};

use super::adjacency::Adjacency;
use super::coordinates::column_offsets;
use super::{
    apply_positions, columns, owned_ranks, rank, status_of, unique_ids, DegradeReason, Layout,
    LayoutEngine, LayoutSummary, RelayoutScope,
};
use crate::core::{GraphEdge, GraphNode, Position};

impl LayoutEngine {
    /// Re-place the nodes `changed` can have affected
    ///
    /// With `nodes.len()` at or below the incremental threshold this is
    /// exactly [`relayout_all`](LayoutEngine::relayout_all). Above it,
    /// nodes ranked below `changed` keep their incoming position. An id
    /// that matches no node re-places everything from rank 0.
    pub fn relayout_from<D, E>(
        &self,
        nodes: Vec<GraphNode<D>>,
        edges: &[GraphEdge<E>],
        changed: &str,
    ) -> Layout<D> {
        let config = self.config();
        let relayout_span = span!(
            Level::INFO,
            "relayout_from",
            changed,
            node_count = nodes.len(),
            threshold = config.incremental_threshold
        );
        let _enter = relayout_span.enter();

        if nodes.len() <= config.incremental_threshold {
            debug!("Graph at or below incremental threshold, running full layout");
            return self.relayout_all(nodes, edges);
        }

        let (positions, summary) = {
            let ids = unique_ids(&nodes);
            let pairs: Vec<(&str, &str)> = edges.iter().map(GraphEdge::endpoints).collect();
            let adjacency = Adjacency::from_edges(pairs.iter().copied());
            let ranking = rank::rank_nodes(&ids, &adjacency, config.cycle_fallback);

            let changed_id = ids.iter().copied().find(|&id| id == changed);
            let min_rank = changed_id.and_then(|id| ranking.rank_of(id)).unwrap_or(0);
            let affected = match changed_id {
                Some(id) => adjacency
                    .descendants(id)
                    .into_iter()
                    .filter(|d| ranking.ranks.contains_key(d))
                    .count(),
                None => {
                    debug!(changed, "Changed node not in graph, relayouting from rank 0");
                    0
                }
            };

            let is_movable = |id: &str| ranking.rank_of(id).map_or(false, |r| r >= min_rank);
            let movable: Vec<&GraphNode<D>> =
                nodes.iter().filter(|n| is_movable(n.id.as_str())).collect();
            let movable_ids = ids.iter().filter(|&&id| is_movable(id)).count();
            let fixed_ids = ids.len() - movable_ids;
            let partial_edges: Vec<(&str, &str)> = pairs
                .iter()
                .copied()
                .filter(|&(source, target)| is_movable(source) && is_movable(target))
                .collect();

            let full_columns = columns::build_columns(&ids, &ranking.ranks);
            let widths: HashMap<&str, f64> = nodes
                .iter()
                .rev()
                .map(|n| (n.id.as_str(), n.width_or(config.default_width)))
                .collect();
            let origin_x = column_offsets(
                &full_columns,
                |id| widths.get(id).copied().unwrap_or(config.default_width),
                config,
                0.0,
            )
            .get(min_rank)
            .copied()
            .unwrap_or(0.0);

            info!(
                min_rank,
                movable = movable_ids,
                fixed = fixed_ids,
                affected,
                origin_x,
                "Partial relayout"
            );

            let placement = self.place(&movable, &partial_edges, origin_x);

            let positions: Vec<Option<Position>> = nodes
                .iter()
                .map(|n| placement.positions.get(n.id.as_str()).copied())
                .collect();
            let degraded = (!ranking.order.is_complete())
                .then(|| DegradeReason::CycleDetected {
                    ordered: ranking.order.resolved,
                    total: ids.len(),
                })
                .or(placement.degraded);
            let summary = LayoutSummary {
                ranks: owned_ranks(&ranking.ranks),
                columns: placement.owned_columns(),
                status: status_of(degraded),
                scope: RelayoutScope::Partial {
                    min_rank,
                    movable: movable_ids,
                    fixed: fixed_ids,
                    affected,
                },
                crossings: placement.crossings,
            };
            (positions, summary)
        };

        Layout {
            nodes: apply_positions(nodes, positions),
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LayoutConfig;
    use crate::layout::LayoutStatus;

    fn node(id: &str) -> GraphNode<()> {
        GraphNode::new(id, ())
    }

    fn edge(source: &str, target: &str) -> GraphEdge<()> {
        GraphEdge::between(source, target)
    }

    /// Engine that always takes the partial path
    fn partial_engine() -> LayoutEngine {
        LayoutEngine::with_config(LayoutConfig::default().with_incremental_threshold(0))
    }

    #[test]
    fn test_small_graph_takes_full_path() {
        let nodes = vec![node("A").with_position(7.0, 9.0), node("B")];
        let layout = LayoutEngine::new().relayout_from(nodes, &[edge("A", "B")], "B");
        assert_eq!(layout.summary.scope, RelayoutScope::Full);
        assert_eq!(layout.position_of("A"), Some(Position::ORIGIN));
    }

    #[test]
    fn test_columns_left_of_change_are_frozen() {
        let nodes = vec![
            node("A").with_position(7.0, 9.0),
            node("B").with_position(-50.0, 300.0),
            node("C"),
        ];
        let edges = vec![edge("A", "B"), edge("B", "C")];
        let layout = partial_engine().relayout_from(nodes, &edges, "B");

        assert_eq!(layout.position_of("A"), Some(Position::new(7.0, 9.0)));
        assert_eq!(layout.position_of("B"), Some(Position::new(480.0, 0.0)));
        assert_eq!(layout.position_of("C"), Some(Position::new(960.0, 0.0)));
        assert_eq!(
            layout.summary.scope,
            RelayoutScope::Partial { min_rank: 1, movable: 2, fixed: 1, affected: 2 }
        );
        assert_eq!(layout.summary.columns, vec![vec!["B".to_string()], vec!["C".to_string()]]);
    }

    #[test]
    fn test_affected_counts_descendants_only() {
        let nodes = vec![node("A"), node("B"), node("C"), node("D")];
        let edges = vec![edge("A", "B"), edge("A", "C"), edge("B", "D")];
        let layout = partial_engine().relayout_from(nodes, &edges, "B");
        assert_eq!(
            layout.summary.scope,
            RelayoutScope::Partial { min_rank: 1, movable: 3, fixed: 1, affected: 2 }
        );
        // Sibling C shares B's column and is re-placed with it
        assert_eq!(layout.position_of("C").unwrap().x, 480.0);
    }

    #[test]
    fn test_unknown_changed_id_relayouts_everything() {
        let nodes = vec![node("A").with_position(7.0, 9.0), node("B")];
        let layout = partial_engine().relayout_from(nodes, &[edge("A", "B")], "ghost");
        assert_eq!(
            layout.summary.scope,
            RelayoutScope::Partial { min_rank: 0, movable: 2, fixed: 0, affected: 0 }
        );
        assert_eq!(layout.position_of("A"), Some(Position::ORIGIN));
        assert_eq!(layout.position_of("B"), Some(Position::new(480.0, 0.0)));
    }

    #[test]
    fn test_partial_matches_full_after_full() {
        let nodes = vec![node("A"), node("B"), node("C"), node("D"), node("E")];
        let edges = vec![edge("A", "B"), edge("A", "C"), edge("B", "D"), edge("C", "E")];
        let engine = partial_engine();

        let full = engine.relayout_all(nodes, &edges);
        let expected: Vec<Position> = full.nodes.iter().map(|n| n.position).collect();

        let partial = engine.relayout_from(full.into_nodes(), &edges, "C");
        let actual: Vec<Position> = partial.nodes.iter().map(|n| n.position).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_wide_fixed_column_shifts_origin() {
        let nodes = vec![node("A").with_size(600.0, 120.0), node("B")];
        let layout = partial_engine().relayout_from(nodes, &[edge("A", "B")], "B");
        assert_eq!(layout.position_of("B"), Some(Position::new(760.0, 0.0)));
    }

    #[test]
    fn test_cycle_is_reported() {
        let nodes = vec![node("A"), node("B"), node("C")];
        let edges = vec![edge("A", "B"), edge("B", "C"), edge("C", "B")];
        let layout = partial_engine().relayout_from(nodes, &edges, "A");
        assert!(matches!(layout.summary.status, LayoutStatus::Degraded(_)));
        assert_eq!(layout.nodes.len(), 3);
    }
}
