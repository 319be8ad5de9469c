//! Column offsets and vertical stacking

use std::collections::HashMap;

use crate::core::{LayoutConfig, Position};

/// Width of a column: its widest node, never narrower than the default width
pub fn column_width<W>(column: &[&str], width_of: W, default_width: f64) -> f64
where
    W: Fn(&str) -> f64,
{
    column
        .iter()
        .map(|&id| width_of(id))
        .fold(default_width, f64::max)
}

/// Left edge of every column, starting at `origin_x`
///
/// Each column starts one column width plus `column_gap` right of the one
/// before it.
pub fn column_offsets<W>(
    columns: &[Vec<&str>],
    width_of: W,
    config: &LayoutConfig,
    origin_x: f64,
) -> Vec<f64>
where
    W: Fn(&str) -> f64,
{
    let mut offsets = Vec::with_capacity(columns.len());
    let mut x = origin_x;
    for column in columns {
        offsets.push(x);
        x += column_width(column, &width_of, config.default_width) + config.column_gap;
    }
    offsets
}

/// Positions for every node in `columns`
///
/// `size_of` returns `(width, height)` with defaults already applied.
/// Each column is stacked from y = 0 down, one node height plus
/// `row_gap` per node.
pub fn assign_coordinates<'a, S>(
    columns: &[Vec<&'a str>],
    size_of: S,
    config: &LayoutConfig,
    origin_x: f64,
) -> HashMap<&'a str, Position>
where
    S: Fn(&str) -> (f64, f64),
{
    let offsets = column_offsets(columns, |id| size_of(id).0, config, origin_x);

    let mut positions = HashMap::new();
    for (column, &x) in columns.iter().zip(&offsets) {
        let mut y = 0.0;
        for &id in column {
            positions.insert(id, Position::new(x, y));
            y += size_of(id).1 + config.row_gap;
        }
    }
    positions
}
