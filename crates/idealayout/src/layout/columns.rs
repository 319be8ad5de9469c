//! Grouping ranked nodes into columns

use std::collections::HashMap;

/// Group `ids` into one column per rank
///
/// Each column keeps the relative input order of its ids; the orderer
/// decides the final order. Ranks produced by the ranker are contiguous,
/// so no column comes out empty. Ids without a rank land in column 0.
pub fn build_columns<'a>(ids: &[&'a str], ranks: &HashMap<&'a str, usize>) -> Vec<Vec<&'a str>> {
    let rank_of = |id: &str| ranks.get(id).copied().unwrap_or(0);
    let column_count = ids.iter().map(|&id| rank_of(id)).max().map(|r| r + 1).unwrap_or(0);

    let mut columns: Vec<Vec<&'a str>> = vec![Vec::new(); column_count];
    for &id in ids {
        columns[rank_of(id)].push(id);
    }
    columns
}
