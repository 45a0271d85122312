//! Configuration for the bandwidth sweep and the default estimator
//!
//! Configuration is plain TOML. Every field has a default matching the
//! probation analysis, so an empty document is a valid configuration:
//!
//! ```toml
//! [sweep]
//! bandwidths = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.1, 1.2]
//! significance_level = 0.1
//!
//! [estimator]
//! treatment = "gpalscutoff"
//! cluster = "clustervar"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Settings of the bandwidth-sensitivity sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Window radii, ascending
    pub bandwidths: Vec<f64>,
    /// A p-value must be strictly below this to stay unmasked
    pub significance_level: f64,
    /// Label of the estimate row
    pub estimate_label: String,
    /// Label of the p-value row
    pub pvalue_label: String,
    /// Replacement for a masked estimate
    pub masked_estimate: String,
    /// Replacement for a masked p-value
    pub masked_pvalue: String,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            bandwidths: (1..=12).map(|i| i as f64 / 10.0).collect(),
            significance_level: 0.1,
            estimate_label: "probation".to_string(),
            pvalue_label: "p-value".to_string(),
            masked_estimate: "x".to_string(),
            masked_pvalue: ".".to_string(),
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.bandwidths.is_empty() {
            return Err(Error::Config("bandwidths must not be empty".into()));
        }
        if self.bandwidths.iter().any(|b| !b.is_finite() || *b <= 0.0) {
            return Err(Error::Config("bandwidths must be positive and finite".into()));
        }
        if self.bandwidths.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::Config("bandwidths must be strictly ascending".into()));
        }
        if !(self.significance_level > 0.0 && self.significance_level <= 1.0) {
            return Err(Error::Config(format!(
                "significance_level must be in (0, 1], got {}",
                self.significance_level
            )));
        }
        Ok(())
    }
}

/// Settings of the built-in OLS estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Regressor whose coefficient is reported
    pub treatment: String,
    /// Column to cluster standard errors on
    pub cluster: Option<String>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        EstimatorConfig {
            treatment: "gpalscutoff".to_string(),
            cluster: None,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RddConfig {
    pub sweep: SweepConfig,
    pub estimator: EstimatorConfig,
}

impl RddConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: RddConfig = toml::from_str(source)?;
        config.sweep.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }
}
