/// Pearson correlation coefficient of two equally long series.
///
/// Returns `None` when the coefficient is undefined: fewer than two paired
/// values, a zero-variance series, or a non-finite result.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let x = &x[..n];
    let y = &y[..n];
    if is_constant(x) || is_constant(y) {
        return None;
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut num = 0.0;
    let mut den_x = 0.0;
    let mut den_y = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        num += dx * dy;
        den_x += dx * dx;
        den_y += dy * dy;
    }

    let den = (den_x * den_y).sqrt();
    if den == 0.0 {
        return None;
    }
    let r = num / den;
    // rounding can push |r| a hair past 1
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Whether every value equals the first. Such a series has no variance even
/// when its mean carries rounding error.
fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|&v| v == values[0])
}

/// Pearson coefficient with every failure mapped to `0`.
pub fn pearson_or_zero(x: &[f64], y: &[f64]) -> f64 {
    pearson(x, y).unwrap_or(0.0)
}

/// Full symmetric correlation matrix of `columns` (column-major series).
///
/// Row `i` is the correlation vector of column `i`. Undefined pairs are `0`,
/// so a constant column has an all-zero row, including its diagonal.
pub fn correlation_matrix(columns: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let k = columns.len();
    let mut matrix = vec![vec![0.0f64; k]; k];
    for i in 0..k {
        for j in i..k {
            let c = pearson_or_zero(&columns[i], &columns[j]);
            matrix[i][j] = c;
            matrix[j][i] = c;
        }
    }
    matrix
}
