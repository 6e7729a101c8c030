//! Greedy multicollinearity pruning.
//!
//! Independent columns are visited from the strongest to the weakest
//! predictor of the dependent column. Each surviving column marks every other
//! surviving independent column it correlates with above the threshold, so of
//! two collinear independents the better predictor is kept.

/// Select the columns to remove.
///
/// * `dependent` – slot of the dependent column; never selected
/// * `candidates` – slots of the enabled columns (the dependent may appear)
/// * `threshold` – |r| strictly above which a pair counts as redundant
/// * `corr` – `corr(a, b)` returns the Pearson coefficient of slots `a`, `b`
///
/// The result lists slots in the order they were marked.
pub fn redundant_columns<F>(dependent: usize, candidates: &[usize], threshold: f64, corr: F) -> Vec<usize>
where
    F: Fn(usize, usize) -> f64,
{
    let independents: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&c| c != dependent)
        .collect();

    let mut ranked: Vec<(usize, f64)> = independents
        .iter()
        .map(|&c| (c, corr(dependent, c).abs()))
        .collect();
    // stable: equal strengths keep column order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut removed: Vec<usize> = Vec::new();
    for (rank, &(column, strength)) in ranked.iter().enumerate() {
        log::debug!("{rank}: column {column} |r| with dependent = {strength:.4}");
        if removed.contains(&column) {
            continue;
        }
        for &other in &independents {
            if other == column || removed.contains(&other) {
                continue;
            }
            let r = corr(column, other).abs();
            if r > threshold {
                log::debug!("column {other} removed: |r| with column {column} = {r:.4}");
                removed.push(other);
            }
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix_corr(m: Vec<Vec<f64>>) -> impl Fn(usize, usize) -> f64 {
        move |a, b| m[a][b]
    }

    #[test]
    fn keeps_stronger_predictor_of_collinear_pair() {
        // 0 = dependent; 1 and 2 collinear; 2 predicts 0 better
        let corr = matrix_corr(vec![
            vec![1.0, 0.5, 0.7, 0.1],
            vec![0.5, 1.0, 0.95, 0.2],
            vec![0.7, 0.95, 1.0, 0.1],
            vec![0.1, 0.2, 0.1, 1.0],
        ]);
        let removed = redundant_columns(0, &[0, 1, 2, 3], 0.8, corr);
        assert_eq!(removed, vec![1]);
    }

    #[test]
    fn negative_correlation_counts_by_magnitude() {
        let corr = matrix_corr(vec![
            vec![1.0, -0.9, 0.3],
            vec![-0.9, 1.0, -0.85],
            vec![0.3, -0.85, 1.0],
        ]);
        assert_eq!(redundant_columns(0, &[0, 1, 2], 0.8, corr), vec![2]);
    }

    #[test]
    fn removed_column_cannot_remove_others() {
        // 1 removes 2; 2 would have removed 3 but is already gone
        let corr = matrix_corr(vec![
            vec![1.0, 0.9, 0.5, 0.4],
            vec![0.9, 1.0, 0.9, 0.1],
            vec![0.5, 0.9, 1.0, 0.9],
            vec![0.4, 0.1, 0.9, 1.0],
        ]);
        assert_eq!(redundant_columns(0, &[0, 1, 2, 3], 0.8, corr), vec![2]);
    }

    #[test]
    fn only_candidates_are_considered() {
        let corr = matrix_corr(vec![
            vec![1.0, 0.9, 0.8, 0.7],
            vec![0.9, 1.0, 0.99, 0.99],
            vec![0.8, 0.99, 1.0, 0.99],
            vec![0.7, 0.99, 0.99, 1.0],
        ]);
        // slot 3 is disabled, so it is never a candidate
        let removed = redundant_columns(0, &[0, 1, 2], 0.8, corr);
        assert_eq!(removed, vec![2]);
        assert!(!removed.contains(&0));
    }

    #[test]
    fn threshold_is_strict() {
        let corr = matrix_corr(vec![
            vec![1.0, 0.6, 0.5],
            vec![0.6, 1.0, 0.8],
            vec![0.5, 0.8, 1.0],
        ]);
        assert!(redundant_columns(0, &[0, 1, 2], 0.8, corr).is_empty());
    }
}
