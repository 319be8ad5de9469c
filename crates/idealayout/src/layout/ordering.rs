//! Barycenter ordering within columns
//!
//! A single left-to-right sweep: every column is sorted by the mean index
//! of its parents in the column before it. Ties, including nodes with no
//! parent in that column, are broken by the y coordinate the node held
//! before the layout call, which is what keeps a re-layout close to the
//! picture the user already sees.

use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::trace;

use super::adjacency::Adjacency;

/// Mean index of each node's parents within `previous`
///
/// A parent joined by several edges counts once per edge. Returns `None`
/// for nodes with no parent in `previous`.
pub fn compute_barycenters(
    column: &[&str],
    previous: &[&str],
    adjacency: &Adjacency<'_>,
) -> Vec<Option<f64>> {
    let previous_index: HashMap<&str, usize> =
        previous.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    column
        .iter()
        .map(|&id| {
            let indices: Vec<f64> = adjacency
                .parents_of(id)
                .iter()
                .filter_map(|&parent| previous_index.get(parent).map(|&i| i as f64))
                .collect();

            if indices.is_empty() {
                None
            } else {
                Some(indices.iter().sum::<f64>() / indices.len() as f64)
            }
        })
        .collect()
}

/// Sort `column` by barycenter, then by previous y
///
/// Missing barycenters sort as `+inf`, after every scored node. The sort
/// is stable, so complete ties keep their current order.
pub fn order_column(column: &mut Vec<&str>, barycenters: &[Option<f64>], previous_y: &[f64]) {
    let mut entries: Vec<(&str, f64, f64)> = column
        .iter()
        .enumerate()
        .map(|(i, &id)| {
            let score = barycenters.get(i).copied().flatten().unwrap_or(f64::INFINITY);
            let y = previous_y.get(i).copied().unwrap_or(0.0);
            (id, score, y)
        })
        .collect();

    entries.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.2.partial_cmp(&b.2).unwrap_or(Ordering::Equal))
    });

    *column = entries.into_iter().map(|(id, _, _)| id).collect();
}

/// Order every column in increasing rank, each against its final predecessor
///
/// `previous_y` looks up the y a node held before this layout call.
pub fn order_columns<F>(columns: &mut [Vec<&str>], adjacency: &Adjacency<'_>, previous_y: F)
where
    F: Fn(&str) -> f64,
{
    for c in 0..columns.len() {
        let (done, rest) = columns.split_at_mut(c);
        let previous: &[&str] = done.last().map(Vec::as_slice).unwrap_or(&[]);
        let column = &mut rest[0];

        let barycenters = compute_barycenters(column, previous, adjacency);
        let ys: Vec<f64> = column.iter().map(|&id| previous_y(id)).collect();
        order_column(column, &barycenters, &ys);
        trace!(column = c, order = ?column, "Ordered column");
    }
}

/// Count edge crossings between adjacent columns
///
/// Edges (a1 -> b1) and (a2 -> b2) spanning the same pair of columns
/// cross when a1 is above a2 but b1 is below b2, or the other way round.
/// Edges that skip columns are not counted.
pub fn cross_count(columns: &[Vec<&str>], adjacency: &Adjacency<'_>) -> usize {
    columns
        .windows(2)
        .map(|pair| two_column_cross_count(&pair[0], &pair[1], adjacency))
        .sum()
}

fn two_column_cross_count(left: &[&str], right: &[&str], adjacency: &Adjacency<'_>) -> usize {
    let right_index: HashMap<&str, usize> =
        right.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    let mut edges: Vec<(usize, usize)> = Vec::new();
    for (li, &id) in left.iter().enumerate() {
        for &child in adjacency.children_of(id) {
            if let Some(&ri) = right_index.get(child) {
                edges.push((li, ri));
            }
        }
    }

    let mut crossings = 0;
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            let (l1, r1) = edges[i];
            let (l2, r2) = edges[j];
            if (l1 < l2 && r1 > r2) || (l1 > l2 && r1 < r2) {
                crossings += 1;
            }
        }
    }
    crossings
}
