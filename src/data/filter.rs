use super::model::{Column, Tuple};

// ---------------------------------------------------------------------------
// Query membership: which tuples fall inside every brushed range
// ---------------------------------------------------------------------------

/// Whether `tuple` passes every active range restriction.
///
/// A tuple passes a column when:
/// * The column is disabled → passes (no constraint)
/// * The column has no range set → passes (no constraint)
/// * The tuple's value lies in `[min_query_value, max_query_value]` → passes
pub fn tuple_passes(tuple: &Tuple, columns: &[Column]) -> bool {
    columns
        .iter()
        .filter(|col| col.is_enabled() && col.is_query_set())
        .all(|col| match tuple.get(col.id()) {
            Some(value) => col.query_contains(value),
            None => false,
        })
}

/// Set every tuple's query flag and return indices of the tuples that pass.
pub fn apply_query(tuples: &mut [Tuple], columns: &[Column]) -> Vec<usize> {
    let mut passing = Vec::new();
    for (i, tuple) in tuples.iter_mut().enumerate() {
        let pass = tuple_passes(tuple, columns);
        tuple.set_query_flag(pass);
        if pass {
            passing.push(i);
        }
    }
    passing
}
