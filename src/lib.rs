//! Data preparation for regression-discontinuity analysis of academic probation
//!
//! Derives cutoff indicators and outcomes, builds placebo-cutoff datasets,
//! bins distances from the cutoff, splits tables into indicator-defined
//! groups, and summarises estimates across a sweep of bandwidths.

pub mod column;
pub mod config;
pub mod dataframe;
pub mod error;
pub mod io;
pub mod na;
pub mod rdd;
pub mod series;
pub mod stats;

// Re-export commonly used types
pub use column::{Column, ColumnType};
pub use config::{EstimatorConfig, RddConfig, SweepConfig};
pub use dataframe::DataFrame;
pub use error::{Error, Result};
pub use na::NA;
pub use rdd::{
    bandwidth_sensitivity_summary, bandwidth_sensitivity_summary_with, calculate_bin_frequency,
    create_groups_dict, create_placebo_subdata, gen_placebo_data, prepare_data,
    BandwidthSummary, Cell, GroupDict, PlaceboSubdata, RowKind, SummaryKey,
};
pub use series::Series;
pub use stats::{EstimationTable, OlsEstimator, RddEstimator};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
