use log::{debug, warn};

use crate::config::EstimatorConfig;
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::na::NA;
use crate::rdd::GroupDict;
use crate::series::Series;
use crate::stats::regression::ols;

/// Column holding the estimated effect of being below the cutoff
pub const ESTIMATE_COLUMN: &str = "GPA below cutoff (1)";
/// Column holding the p-value of that estimate
pub const PVALUE_COLUMN: &str = "P-Value (1)";
/// Column holding the standard error of that estimate
pub const STD_ERROR_COLUMN: &str = "Std.err (1)";
/// Column holding the number of observations used
pub const NOBS_COLUMN: &str = "Observations";

/// Per-group regression results, one row per group name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EstimationTable {
    index: Vec<String>,
    columns: Vec<(String, Vec<f64>)>,
}

impl EstimationTable {
    /// Create a table with the given group names as rows and no columns
    pub fn new<S: Into<String>>(index: impl IntoIterator<Item = S>) -> Self {
        EstimationTable {
            index: index.into_iter().map(Into::into).collect(),
            columns: Vec::new(),
        }
    }

    /// Add or replace a column; its length must match the number of groups
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        if values.len() != self.index.len() {
            return Err(Error::InconsistentRowCount {
                expected: self.index.len(),
                found: values.len(),
            });
        }
        let name = name.into();
        match self.columns.iter_mut().find(|(key, _)| *key == name) {
            Some(column) => column.1 = values,
            None => self.columns.push((name, values)),
        }
        Ok(())
    }

    /// Group names in row order
    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Value for one group and column
    pub fn value(&self, group: &str, column: &str) -> Option<f64> {
        let row = self.index.iter().position(|g| g == group)?;
        self.column(column).map(|values| values[row])
    }
}

/// Regression routine run once per bandwidth by the sensitivity sweep
///
/// Given the groups of one bandwidth window, an outcome and the regressors,
/// returns an [`EstimationTable`] with at least [`ESTIMATE_COLUMN`] and
/// [`PVALUE_COLUMN`] for every group.
pub trait RddEstimator: Sync {
    fn estimate(
        &self,
        groups: &GroupDict,
        outcome: &str,
        regressors: &[String],
    ) -> Result<EstimationTable>;
}

/// OLS estimator reporting the coefficient of the treatment regressor
#[derive(Debug, Clone)]
pub struct OlsEstimator {
    treatment: String,
    cluster: Option<String>,
}

impl OlsEstimator {
    pub fn new(treatment: impl Into<String>) -> Self {
        OlsEstimator {
            treatment: treatment.into(),
            cluster: None,
        }
    }

    /// Use cluster-robust standard errors clustered on `column`
    pub fn with_cluster(mut self, column: impl Into<String>) -> Self {
        self.cluster = Some(column.into());
        self
    }

    pub fn from_config(config: &EstimatorConfig) -> Self {
        OlsEstimator {
            treatment: config.treatment.clone(),
            cluster: config.cluster.clone(),
        }
    }

    fn fit_group(
        &self,
        name: &str,
        table: &DataFrame,
        outcome: &str,
        regressors: &[String],
    ) -> Result<(f64, f64, f64, usize)> {
        let position = regressors
            .iter()
            .position(|r| *r == self.treatment)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "treatment regressor {} is not among the regressors",
                    self.treatment
                ))
            })?;

        let mut series = vec![table.float_column(outcome)?];
        for regressor in regressors {
            series.push(table.float_column(regressor)?);
        }
        if let Some(cluster) = &self.cluster {
            series.push(table.float_column(cluster)?);
        }

        // listwise deletion of incomplete rows
        let complete: Vec<usize> = (0..table.row_count())
            .filter(|&row| series.iter().all(|s| matches!(s.get(row), Some(NA::Value(_)))))
            .collect();
        let dropped = table.row_count() - complete.len();
        if dropped > 0 {
            warn!("group {}: dropped {} rows with missing values", name, dropped);
        }

        let gather = |s: &Series<f64>| -> Vec<f64> {
            complete.iter().map(|&row| s.values()[row].to_float()).collect()
        };

        let y = gather(series[0]);
        let x: Vec<Vec<f64>> = series[1..=regressors.len()]
            .iter()
            .map(|s| gather(*s))
            .collect();
        let clusters = self.cluster.as_ref().map(|_| gather(series[series.len() - 1]));

        let fit = ols(&y, &x, clusters.as_deref())?;
        debug!(
            "group {}: {} = {:.4} (se {:.4}, p {:.4}, n {})",
            name,
            self.treatment,
            fit.coefficients[position],
            fit.std_errors[position],
            fit.p_values[position],
            fit.nobs
        );

        Ok((
            fit.coefficients[position],
            fit.std_errors[position],
            fit.p_values[position],
            fit.nobs,
        ))
    }
}

impl Default for OlsEstimator {
    fn default() -> Self {
        Self::from_config(&EstimatorConfig::default())
    }
}

impl RddEstimator for OlsEstimator {
    fn estimate(
        &self,
        groups: &GroupDict,
        outcome: &str,
        regressors: &[String],
    ) -> Result<EstimationTable> {
        let mut estimates = Vec::with_capacity(groups.len());
        let mut std_errors = Vec::with_capacity(groups.len());
        let mut p_values = Vec::with_capacity(groups.len());
        let mut nobs = Vec::with_capacity(groups.len());

        for (name, table) in groups.iter() {
            let (estimate, se, p, n) = self.fit_group(name, table, outcome, regressors)?;
            estimates.push(estimate);
            std_errors.push(se);
            p_values.push(p);
            nobs.push(n as f64);
        }

        let mut result = EstimationTable::new(groups.keys());
        result.add_column(ESTIMATE_COLUMN, estimates)?;
        result.add_column(STD_ERROR_COLUMN, std_errors)?;
        result.add_column(PVALUE_COLUMN, p_values)?;
        result.add_column(NOBS_COLUMN, nobs)?;
        Ok(result)
    }
}
