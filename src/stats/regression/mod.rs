// Ordinary least squares with classical or cluster-robust standard errors

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Result of an OLS fit; vectors are ordered like the design columns
#[derive(Debug, Clone)]
pub struct OlsResult {
    /// Estimated coefficients
    pub coefficients: Vec<f64>,
    /// Standard errors of the coefficients
    pub std_errors: Vec<f64>,
    /// Two-sided p-values (normal approximation)
    pub p_values: Vec<f64>,
    /// Coefficient of determination
    pub r_squared: f64,
    /// Number of observations used
    pub nobs: usize,
    /// Number of clusters when cluster-robust errors were requested
    pub n_clusters: Option<usize>,
}

/// Fit `y = X b + e` by least squares
///
/// `x_columns` holds the design matrix column by column; an intercept must be
/// passed explicitly as a column of ones. With `clusters` the covariance is
/// the CR1 sandwich estimator: `G/(G-1) * (N-1)/(N-K)` small-sample scaling.
pub fn ols(y: &[f64], x_columns: &[Vec<f64>], clusters: Option<&[f64]>) -> Result<OlsResult> {
    let n = y.len();
    let k = x_columns.len();

    if k == 0 {
        return Err(Error::InvalidArgument(
            "regression needs at least one regressor".into(),
        ));
    }
    for column in x_columns {
        if column.len() != n {
            return Err(Error::InconsistentRowCount {
                expected: n,
                found: column.len(),
            });
        }
    }
    if n <= k {
        return Err(Error::InsufficientData(format!(
            "{} observations for {} regressors",
            n, k
        )));
    }

    // X^T X
    let xt_x = matrix_multiply_transpose(x_columns, x_columns);
    // (X^T X)^(-1)
    let xt_x_inv = matrix_inverse(&xt_x)?;
    // X^T y
    let xt_y = vec_multiply_transpose(x_columns, y);

    let coefficients: Vec<f64> = (0..k)
        .map(|i| (0..k).map(|j| xt_x_inv[i][j] * xt_y[j]).sum())
        .collect();

    let residuals: Vec<f64> = (0..n)
        .map(|row| {
            let fitted: f64 = (0..k).map(|j| coefficients[j] * x_columns[j][row]).sum();
            y[row] - fitted
        })
        .collect();

    let y_mean = y.iter().sum::<f64>() / n as f64;
    let ss_total: f64 = y.iter().map(|&v| (v - y_mean).powi(2)).sum();
    let ss_residual: f64 = residuals.iter().map(|r| r.powi(2)).sum();
    let r_squared = if ss_total > 0.0 {
        1.0 - ss_residual / ss_total
    } else {
        f64::NAN
    };

    let (covariance, n_clusters) = match clusters {
        None => {
            let mse = ss_residual / (n - k) as f64;
            let cov = xt_x_inv
                .iter()
                .map(|row| row.iter().map(|v| v * mse).collect())
                .collect::<Vec<Vec<f64>>>();
            (cov, None)
        }
        Some(ids) => {
            if ids.len() != n {
                return Err(Error::InconsistentRowCount {
                    expected: n,
                    found: ids.len(),
                });
            }
            let (cov, groups) = cluster_covariance(&xt_x_inv, x_columns, &residuals, ids)?;
            (cov, Some(groups))
        }
    };

    let std_errors: Vec<f64> = (0..k).map(|i| covariance[i][i].max(0.0).sqrt()).collect();
    let p_values = coefficients
        .iter()
        .zip(&std_errors)
        .map(|(&b, &se)| {
            if se > 0.0 {
                2.0 * (1.0 - normal_cdf((b / se).abs()))
            } else {
                f64::NAN
            }
        })
        .collect();

    Ok(OlsResult {
        coefficients,
        std_errors,
        p_values,
        r_squared,
        nobs: n,
        n_clusters,
    })
}

/// CR1 cluster-robust covariance
fn cluster_covariance(
    xt_x_inv: &[Vec<f64>],
    x_columns: &[Vec<f64>],
    residuals: &[f64],
    clusters: &[f64],
) -> Result<(Vec<Vec<f64>>, usize)> {
    let n = residuals.len();
    let k = x_columns.len();

    // per-cluster score sums X_g^T u_g
    let mut scores: HashMap<u64, Vec<f64>> = HashMap::new();
    for row in 0..n {
        let score = scores
            .entry(clusters[row].to_bits())
            .or_insert_with(|| vec![0.0; k]);
        for j in 0..k {
            score[j] += x_columns[j][row] * residuals[row];
        }
    }

    let g = scores.len();
    if g < 2 {
        return Err(Error::InsufficientData(
            "cluster-robust errors need at least two clusters".into(),
        ));
    }

    let mut meat = vec![vec![0.0; k]; k];
    for score in scores.values() {
        for i in 0..k {
            for j in 0..k {
                meat[i][j] += score[i] * score[j];
            }
        }
    }

    let bread_meat = matrix_product(xt_x_inv, &meat);
    let sandwich = matrix_product(&bread_meat, xt_x_inv);

    let scale = (g as f64 / (g - 1) as f64) * ((n - 1) as f64 / (n - k) as f64);
    let covariance = sandwich
        .into_iter()
        .map(|row| row.into_iter().map(|v| v * scale).collect())
        .collect();

    Ok((covariance, g))
}

/// Transposed product (A^T * B) of column-major matrices
fn matrix_multiply_transpose(a: &[Vec<f64>], b: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let mut result = vec![vec![0.0; b.len()]; a.len()];
    for i in 0..a.len() {
        for j in 0..b.len() {
            result[i][j] = a[i].iter().zip(&b[j]).map(|(x, y)| x * y).sum();
        }
    }
    result
}

/// Transposed product (A^T * y)
fn vec_multiply_transpose(a: &[Vec<f64>], y: &[f64]) -> Vec<f64> {
    a.iter()
        .map(|column| column.iter().zip(y).map(|(x, v)| x * v).sum())
        .collect()
}

/// Row-major product of square matrices
fn matrix_product(a: &[Vec<f64>], b: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = a.len();
    let mut result = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..n {
            result[i][j] = (0..n).map(|m| a[i][m] * b[m][j]).sum();
        }
    }
    result
}

/// Standard normal CDF (Abramowitz and Stegun 7.1.26)
pub(crate) fn normal_cdf(z: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if z < 0.0 { -1.0 } else { 1.0 };
    let x = z.abs() / (2.0_f64).sqrt();

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    0.5 * (1.0 + sign * y)
}

/// Matrix inverse by Gauss-Jordan elimination with partial pivoting
fn matrix_inverse(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let n = matrix.len();

    if n == 0 {
        return Err(Error::ComputationError("matrix is empty".into()));
    }
    if matrix.iter().any(|row| row.len() != n) {
        return Err(Error::ComputationError("matrix must be square".into()));
    }

    // augmented matrix [A|I]
    let mut augmented: Vec<Vec<f64>> = matrix
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut extended = row.clone();
            extended.extend((0..n).map(|j| if i == j { 1.0 } else { 0.0 }));
            extended
        })
        .collect();

    for i in 0..n {
        let mut max_row = i;
        let mut max_val = augmented[i][i].abs();
        for j in i + 1..n {
            let abs_val = augmented[j][i].abs();
            if abs_val > max_val {
                max_row = j;
                max_val = abs_val;
            }
        }

        if max_val < 1e-10 {
            return Err(Error::ComputationError(
                "design matrix is singular".into(),
            ));
        }

        if max_row != i {
            augmented.swap(i, max_row);
        }

        let pivot = augmented[i][i];
        for value in augmented[i].iter_mut() {
            *value /= pivot;
        }

        for j in 0..n {
            if j != i {
                let factor = augmented[j][i];
                if factor != 0.0 {
                    for m in 0..2 * n {
                        augmented[j][m] -= factor * augmented[i][m];
                    }
                }
            }
        }
    }

    Ok(augmented
        .into_iter()
        .map(|row| row[n..].to_vec())
        .collect())
}
