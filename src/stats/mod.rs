// Statistics module
//
// Least-squares regression and the estimator contract used by the bandwidth
// sensitivity sweep.

pub mod estimator;
pub mod regression;

pub use estimator::{
    EstimationTable, OlsEstimator, RddEstimator, ESTIMATE_COLUMN, NOBS_COLUMN, PVALUE_COLUMN,
    STD_ERROR_COLUMN,
};
pub use regression::{ols, OlsResult};
