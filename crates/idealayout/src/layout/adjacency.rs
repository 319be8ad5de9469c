//! Parent and child lookup built from a flat edge list

use std::collections::{HashMap, HashSet, VecDeque};

/// Parents and children per node id, both in edge order
///
/// Duplicate edges are kept: a parent joined by two edges is listed twice
/// and weighs twice as much in barycenter scores. Endpoints that are not
/// in the node list are indexed like any other id.
#[derive(Debug, Clone, Default)]
pub struct Adjacency<'a> {
    parents: HashMap<&'a str, Vec<&'a str>>,
    children: HashMap<&'a str, Vec<&'a str>>,
    edge_count: usize,
}

impl<'a> Adjacency<'a> {
    /// Index `(source, target)` pairs
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut adjacency = Self::default();
        for (source, target) in edges {
            adjacency.parents.entry(target).or_default().push(source);
            adjacency.children.entry(source).or_default().push(target);
            adjacency.edge_count += 1;
        }
        adjacency
    }

    pub fn parents_of(&self, id: &str) -> &[&'a str] {
        self.parents.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn children_of(&self, id: &str) -> &[&'a str] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// `start` plus every node reachable from it along child links
    pub fn descendants(&self, start: &'a str) -> HashSet<&'a str> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            queue.extend(self.children_of(id).iter().copied());
        }
        seen
    }
}
