//! Data preparation for the probation regression-discontinuity analysis
//!
//! The functions here are independent, stateless transformations. Each one
//! borrows its input table and returns a new owned value, so the caller's
//! data is never mutated.

pub mod binning;
pub mod derive;
pub mod groups;
pub mod placebo;
pub mod sweep;

pub use binning::{calculate_bin_frequency, create_placebo_subdata, PlaceboSubdata};
pub use derive::prepare_data;
pub use groups::{create_groups_dict, GroupDict};
pub use placebo::gen_placebo_data;
pub use sweep::{
    bandwidth_sensitivity_summary, bandwidth_sensitivity_summary_with, BandwidthSummary, Cell,
    RowKind, SummaryKey,
};

/// Distance of first-year GPA from the probation cutoff
pub const DIST_FROM_CUT: &str = "dist_from_cut";
/// Indicator: GPA below the cutoff
pub const GPA_BELOW_CUTOFF: &str = "gpalscutoff";
/// Indicator: GPA at or above the cutoff
pub const GPA_ABOVE_CUTOFF: &str = "gpagrcutoff";
/// Interaction of distance and the below-cutoff indicator
pub const GPA_X_BELOW: &str = "gpaXgpalscutoff";
/// Interaction of distance and the above-cutoff indicator
pub const GPA_X_ABOVE: &str = "gpaXgpagrcutoff";
/// Constant regressor
pub const CONST: &str = "const";
/// Binned distance from cutoff
pub const DIST_BIN: &str = "dist_from_cut_med10";
