use std::fmt;

use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::SweepConfig;
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::rdd::groups::create_groups_dict;
use crate::rdd::DIST_FROM_CUT;
use crate::stats::estimator::{RddEstimator, ESTIMATE_COLUMN, PVALUE_COLUMN};

const BANDWIDTH_TOLERANCE: f64 = 1e-9;

/// Kind of a summary row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RowKind {
    /// Estimated effect of being placed on probation
    Probation,
    /// P-value of that estimate
    PValue,
}

/// Composite row key of the summary: bandwidth and row kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryKey {
    pub bandwidth: f64,
    pub kind: RowKind,
}

/// A summary cell: a number or a "not significant" marker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Value(f64),
    Masked(String),
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Value(v) => Some(*v),
            Cell::Masked(_) => None,
        }
    }

    pub fn is_masked(&self) -> bool {
        matches!(self, Cell::Masked(_))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Value(v) => write!(f, "{:.4}", v),
            Cell::Masked(marker) => f.write_str(marker),
        }
    }
}

/// One row of the summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub key: SummaryKey,
    /// Display label of the row kind, e.g. `probation` or `p-value`
    pub label: String,
    /// One cell per group, in column order
    pub cells: Vec<Cell>,
}

/// Bandwidth-sensitivity table: two rows per bandwidth, one column per group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandwidthSummary {
    columns: Vec<String>,
    rows: Vec<SummaryRow>,
}

impl BandwidthSummary {
    /// Group names in column order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in bandwidth-ascending order, estimate row before p-value row
    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    /// Cell at a bandwidth, row kind and group
    pub fn get(&self, bandwidth: f64, kind: RowKind, column: &str) -> Option<&Cell> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .find(|row| {
                row.key.kind == kind
                    && (row.key.bandwidth - bandwidth).abs() < BANDWIDTH_TOLERANCE
            })
            .map(|row| &row.cells[col])
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for BandwidthSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                let mut line = vec![row.key.bandwidth.to_string(), row.label.clone()];
                line.extend(row.cells.iter().map(|c| c.to_string()));
                line
            })
            .collect();

        let mut header = vec![String::new(), String::new()];
        header.extend(self.columns.iter().cloned());

        let widths: Vec<usize> = (0..header.len())
            .map(|i| {
                rendered
                    .iter()
                    .map(|line| line[i].len())
                    .chain(std::iter::once(header[i].len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        for line in std::iter::once(&header).chain(rendered.iter()) {
            let cells: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:>width$}", cell, width = *width))
                .collect();
            writeln!(f, "{}", cells.join("  ").trim_end())?;
        }
        Ok(())
    }
}

/// Sweep the default bandwidths `0.1, 0.2, ..., 1.2` and summarise the estimates
///
/// For every bandwidth the table is restricted to `|dist_from_cut| < bandwidth`,
/// split into groups by the indicator columns and handed to the estimator.
/// Estimates whose p-value is not below 0.1 are masked with `x`, their
/// p-values with `.`.
pub fn bandwidth_sensitivity_summary<K, C, R, E>(
    data: &DataFrame,
    outcome: &str,
    keys: &[K],
    columns: &[C],
    regressors: &[R],
    estimator: &E,
) -> Result<BandwidthSummary>
where
    K: AsRef<str>,
    C: AsRef<str>,
    R: AsRef<str>,
    E: RddEstimator + ?Sized,
{
    bandwidth_sensitivity_summary_with(
        data,
        outcome,
        keys,
        columns,
        regressors,
        estimator,
        &SweepConfig::default(),
    )
}

/// Same as [`bandwidth_sensitivity_summary`] with bandwidths, threshold and
/// markers taken from `config`
///
/// Bandwidths are estimated in parallel; the first failure aborts the sweep.
pub fn bandwidth_sensitivity_summary_with<K, C, R, E>(
    data: &DataFrame,
    outcome: &str,
    keys: &[K],
    columns: &[C],
    regressors: &[R],
    estimator: &E,
    config: &SweepConfig,
) -> Result<BandwidthSummary>
where
    K: AsRef<str>,
    C: AsRef<str>,
    R: AsRef<str>,
    E: RddEstimator + ?Sized,
{
    config.validate()?;
    if keys.len() != columns.len() {
        return Err(Error::InvalidArgument(format!(
            "{} group keys but {} indicator columns",
            keys.len(),
            columns.len()
        )));
    }
    // the distance column is needed by every window
    data.float_column(DIST_FROM_CUT)?;

    let keys: Vec<String> = keys.iter().map(|k| k.as_ref().to_string()).collect();
    let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
    let regressors: Vec<String> = regressors.iter().map(|r| r.as_ref().to_string()).collect();

    let windows: Vec<(Vec<f64>, Vec<f64>)> = config
        .bandwidths
        .par_iter()
        .map(|&bandwidth| {
            estimate_window(data, bandwidth, outcome, &keys, &columns, &regressors, estimator)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::with_capacity(2 * windows.len());
    let mut masked = 0;
    for (&bandwidth, (estimates, p_values)) in config.bandwidths.iter().zip(windows) {
        let mut estimate_cells = Vec::with_capacity(keys.len());
        let mut pvalue_cells = Vec::with_capacity(keys.len());

        for (estimate, p) in estimates.into_iter().zip(p_values) {
            // NaN p-values are never significant
            if p < config.significance_level {
                estimate_cells.push(Cell::Value(estimate));
                pvalue_cells.push(Cell::Value(p));
            } else {
                masked += 1;
                estimate_cells.push(Cell::Masked(config.masked_estimate.clone()));
                pvalue_cells.push(Cell::Masked(config.masked_pvalue.clone()));
            }
        }

        rows.push(SummaryRow {
            key: SummaryKey {
                bandwidth,
                kind: RowKind::Probation,
            },
            label: config.estimate_label.clone(),
            cells: estimate_cells,
        });
        rows.push(SummaryRow {
            key: SummaryKey {
                bandwidth,
                kind: RowKind::PValue,
            },
            label: config.pvalue_label.clone(),
            cells: pvalue_cells,
        });
    }

    info!(
        "bandwidth sweep over {} bandwidths and {} groups done, {} cells masked",
        config.bandwidths.len(),
        keys.len(),
        masked
    );

    Ok(BandwidthSummary {
        columns: keys,
        rows,
    })
}

/// Estimates and p-values of every group for one bandwidth, in key order
fn estimate_window<E>(
    data: &DataFrame,
    bandwidth: f64,
    outcome: &str,
    keys: &[String],
    columns: &[String],
    regressors: &[String],
    estimator: &E,
) -> Result<(Vec<f64>, Vec<f64>)>
where
    E: RddEstimator + ?Sized,
{
    let sample = data.within(DIST_FROM_CUT, bandwidth)?;
    let groups = create_groups_dict(&sample, keys, columns)?;
    debug!(
        "bandwidth {}: {} rows in window, {} groups",
        bandwidth,
        sample.row_count(),
        groups.len()
    );

    let table = estimator
        .estimate(&groups, outcome, regressors)
        .map_err(|err| Error::Estimation {
            bandwidth,
            message: err.to_string(),
        })?;

    let lookup = |key: &str, column: &str| {
        table.value(key, column).ok_or_else(|| Error::Estimation {
            bandwidth,
            message: format!("result has no {} for group {}", column, key),
        })
    };

    let mut estimates = Vec::with_capacity(keys.len());
    let mut p_values = Vec::with_capacity(keys.len());
    for key in keys {
        estimates.push(lookup(key, ESTIMATE_COLUMN)?);
        p_values.push(lookup(key, PVALUE_COLUMN)?);
    }
    Ok((estimates, p_values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdd::GroupDict;
    use crate::series::Series;
    use crate::stats::estimator::EstimationTable;

    struct ConstantEstimator {
        estimate: f64,
        p_value: f64,
    }

    impl RddEstimator for ConstantEstimator {
        fn estimate(
            &self,
            groups: &GroupDict,
            _outcome: &str,
            _regressors: &[String],
        ) -> Result<EstimationTable> {
            let n = groups.len();
            let mut table = EstimationTable::new(groups.keys());
            table.add_column(ESTIMATE_COLUMN, vec![self.estimate; n])?;
            table.add_column(PVALUE_COLUMN, vec![self.p_value; n])?;
            Ok(table)
        }
    }

    struct FailingEstimator;

    impl RddEstimator for FailingEstimator {
        fn estimate(&self, _: &GroupDict, _: &str, _: &[String]) -> Result<EstimationTable> {
            Err(Error::ComputationError("design matrix is singular".into()))
        }
    }

    fn data() -> DataFrame {
        let dist: Vec<f64> = (0..48).map(|i| -1.175 + i as f64 * 0.05).collect();
        let mut df = DataFrame::new();
        df.add_column(Series::from_vec(dist, DIST_FROM_CUT)).unwrap();
        df.add_column(Series::from_vec(vec![1.0; 48], "const")).unwrap();
        df
    }

    #[test]
    fn test_shape_and_order() {
        let estimator = ConstantEstimator {
            estimate: -0.2,
            p_value: 0.01,
        };
        let summary =
            bandwidth_sensitivity_summary(&data(), "y", &["All"], &["const"], &["const"], &estimator)
                .unwrap();

        assert_eq!(summary.rows().len(), 24);
        assert_eq!(summary.columns(), &["All".to_string()]);
        for (i, row) in summary.rows().iter().enumerate() {
            let expected = (i / 2 + 1) as f64 / 10.0;
            assert!((row.key.bandwidth - expected).abs() < 1e-12);
            let kind = if i % 2 == 0 { RowKind::Probation } else { RowKind::PValue };
            assert_eq!(row.key.kind, kind);
        }
        assert_eq!(summary.get(0.3, RowKind::Probation, "All"), Some(&Cell::Value(-0.2)));
        assert_eq!(summary.get(0.3, RowKind::PValue, "All"), Some(&Cell::Value(0.01)));
    }

    #[test]
    fn test_threshold_is_strict() {
        let estimator = ConstantEstimator {
            estimate: -0.2,
            p_value: 0.1,
        };
        let summary =
            bandwidth_sensitivity_summary(&data(), "y", &["All"], &["const"], &["const"], &estimator)
                .unwrap();
        assert_eq!(
            summary.get(1.2, RowKind::Probation, "All"),
            Some(&Cell::Masked("x".to_string()))
        );
        assert_eq!(
            summary.get(1.2, RowKind::PValue, "All"),
            Some(&Cell::Masked(".".to_string()))
        );
    }

    #[test]
    fn test_nan_p_value_is_masked() {
        let estimator = ConstantEstimator {
            estimate: 1.0,
            p_value: f64::NAN,
        };
        let summary =
            bandwidth_sensitivity_summary(&data(), "y", &["All"], &["const"], &["const"], &estimator)
                .unwrap();
        assert!(summary.rows().iter().all(|row| row.cells[0].is_masked()));
    }

    #[test]
    fn test_estimator_failure_aborts() {
        let result = bandwidth_sensitivity_summary(
            &data(),
            "y",
            &["All"],
            &["const"],
            &["const"],
            &FailingEstimator,
        );
        assert!(matches!(result, Err(Error::Estimation { .. })));
    }

    #[test]
    fn test_mismatched_groups() {
        let estimator = ConstantEstimator {
            estimate: 0.0,
            p_value: 0.0,
        };
        let result = bandwidth_sensitivity_summary(
            &data(),
            "y",
            &["All", "Other"],
            &["const"],
            &["const"],
            &estimator,
        );
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_custom_config() {
        let estimator = ConstantEstimator {
            estimate: 0.5,
            p_value: 0.04,
        };
        let config = SweepConfig {
            bandwidths: vec![0.25, 0.75],
            significance_level: 0.05,
            ..SweepConfig::default()
        };
        let summary = bandwidth_sensitivity_summary_with(
            &data(),
            "y",
            &["All"],
            &["const"],
            &["const"],
            &estimator,
            &config,
        )
        .unwrap();
        assert_eq!(summary.rows().len(), 4);
        assert_eq!(summary.get(0.75, RowKind::PValue, "All"), Some(&Cell::Value(0.04)));
    }

    #[test]
    fn test_display_and_json() {
        let estimator = ConstantEstimator {
            estimate: -0.25,
            p_value: 0.5,
        };
        let config = SweepConfig {
            bandwidths: vec![0.6],
            ..SweepConfig::default()
        };
        let summary = bandwidth_sensitivity_summary_with(
            &data(),
            "y",
            &["All"],
            &["const"],
            &["const"],
            &estimator,
            &config,
        )
        .unwrap();

        let text = summary.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("All"));
        assert!(lines[1].contains("probation") && lines[1].ends_with('x'));
        assert!(lines[2].contains("p-value") && lines[2].ends_with('.'));

        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["rows"][0]["key"]["kind"], "Probation");
        assert_eq!(json["rows"][0]["cells"][0], "x");
    }
}
