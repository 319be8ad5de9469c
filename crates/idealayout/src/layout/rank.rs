//! Topological ordering and longest-path ranking
//!
//! Ranks come from one walk over a Kahn's-algorithm order: a node with no
//! ranked parents sits in rank 0, every other node one rank right of its
//! highest-ranked parent. On acyclic input every edge therefore points
//! from a lower to a strictly higher rank.
//!
//! Cycles never abort a layout. When Kahn's algorithm stalls, the
//! configured [`CycleFallback`] supplies an order that still contains
//! every node, and parents that have not been ranked yet are ignored.

use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, trace, warn};

use super::adjacency::Adjacency;
use crate::core::CycleFallback;

/// A node order suitable for ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologicalOrder<'a> {
    /// Every input id exactly once
    pub order: Vec<&'a str>,
    /// How many ids Kahn's algorithm managed to order before stalling
    pub resolved: usize,
}

impl TopologicalOrder<'_> {
    /// True when the order is a genuine topological order
    pub fn is_complete(&self) -> bool {
        self.resolved == self.order.len()
    }
}

/// Ranks for every id plus the order they were computed in
#[derive(Debug, Clone)]
pub struct Ranking<'a> {
    pub order: TopologicalOrder<'a>,
    pub ranks: HashMap<&'a str, usize>,
}

impl Ranking<'_> {
    pub fn rank_of(&self, id: &str) -> Option<usize> {
        self.ranks.get(id).copied()
    }

    /// Number of columns the ranks span
    pub fn column_count(&self) -> usize {
        self.ranks.values().max().map(|&r| r + 1).unwrap_or(0)
    }
}

/// Kahn's algorithm over `ids`, seeded and drained in input order
///
/// `ids` must not contain duplicates. Only parents that are themselves in
/// `ids` count towards a node's in-degree, so dangling edges never stall
/// the sort.
pub fn topological_order<'a>(
    ids: &[&'a str],
    adjacency: &Adjacency<'a>,
    fallback: CycleFallback,
) -> TopologicalOrder<'a> {
    trace!(node_count = ids.len(), "Starting topological sort");
    let known: HashSet<&str> = ids.iter().copied().collect();

    let mut in_degree: HashMap<&'a str, usize> = ids
        .iter()
        .map(|&id| {
            let degree = adjacency
                .parents_of(id)
                .iter()
                .filter(|parent| known.contains(*parent))
                .count();
            (id, degree)
        })
        .collect();

    let mut queue: VecDeque<&'a str> = ids
        .iter()
        .copied()
        .filter(|id| in_degree.get(id) == Some(&0))
        .collect();

    let mut order = Vec::with_capacity(ids.len());
    while let Some(id) = queue.pop_front() {
        order.push(id);
        for &child in adjacency.children_of(id) {
            if let Some(degree) = in_degree.get_mut(child) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(child);
                }
            }
        }
    }

    let resolved = order.len();
    if resolved < ids.len() {
        warn!(
            ordered = resolved,
            total = ids.len(),
            fallback = %fallback,
            "Cycle detected, ranking with fallback order"
        );
        order = match fallback {
            CycleFallback::InputOrder => ids.to_vec(),
            CycleFallback::AppendUnordered => {
                let placed: HashSet<&str> = order.iter().copied().collect();
                order.extend(ids.iter().copied().filter(|id| !placed.contains(id)));
                order
            }
        };
    }

    debug!(resolved, total = order.len(), "Topological sort completed");
    TopologicalOrder { order, resolved }
}

/// Longest-path rank for each id, walking `order` once
pub fn assign_ranks<'a>(order: &[&'a str], adjacency: &Adjacency<'a>) -> HashMap<&'a str, usize> {
    let mut ranks: HashMap<&'a str, usize> = HashMap::with_capacity(order.len());
    for &id in order {
        let rank = adjacency
            .parents_of(id)
            .iter()
            .filter_map(|parent| ranks.get(parent))
            .max()
            .map(|&r| r + 1)
            .unwrap_or(0);
        trace!(node = id, rank, "Assigned rank");
        ranks.insert(id, rank);
    }
    ranks
}

/// Order `ids` and rank them
pub fn rank_nodes<'a>(
    ids: &[&'a str],
    adjacency: &Adjacency<'a>,
    fallback: CycleFallback,
) -> Ranking<'a> {
    let order = topological_order(ids, adjacency, fallback);
    let ranks = assign_ranks(&order.order, adjacency);
    Ranking { order, ranks }
}
