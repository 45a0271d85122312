use crate::dataframe::DataFrame;
use crate::error::Result;
use crate::na::NA;
use crate::rdd::CONST;

const NEXT_GPA: &str = "nextGPA";
const TOTAL_CREDITS_RAW: &str = "totcredits_year2";
const SUSPENDED_SUMMER1: &str = "suspended_summer1";

/// Indicator for the subsequent-term GPA being at or above the cutoff
pub const NEXT_GPA_ABOVE_CUTOFF: &str = "nextGPA_above_cutoff";
/// Second-year credits, missing for students without a next GPA or suspended
pub const TOTAL_CREDITS_YEAR2: &str = "total_credits_year2";

/// Add the regression constant and the outcome variables derived from raw columns
///
/// Returns a new table with `const`, `nextGPA_above_cutoff` and
/// `total_credits_year2`. Columns that already exist under these names are
/// overwritten, so the operation is idempotent.
pub fn prepare_data(data: &DataFrame) -> Result<DataFrame> {
    let next_gpa = data.float_column(NEXT_GPA)?;
    let credits = data.float_column(TOTAL_CREDITS_RAW)?;
    let suspended = data.float_column(SUSPENDED_SUMMER1)?;

    let above_cutoff = next_gpa
        .map(|&gpa| if gpa >= 0.0 { 1.0 } else { 0.0 })
        .values()
        .to_vec();

    let total_credits: Vec<NA<f64>> = credits
        .values()
        .iter()
        .zip(next_gpa.values())
        .zip(suspended.values())
        .map(|((&credits, gpa), suspended)| {
            let was_suspended = matches!(suspended, NA::Value(s) if *s == 1.0);
            if gpa.is_na() || was_suspended {
                NA::NA
            } else {
                credits
            }
        })
        .collect();

    let mut prepared = data.clone();
    prepared.add_float_column(CONST, vec![NA::Value(1.0); data.row_count()])?;
    prepared.add_float_column(NEXT_GPA_ABOVE_CUTOFF, above_cutoff)?;
    prepared.add_float_column(TOTAL_CREDITS_YEAR2, total_credits)?;

    Ok(prepared)
}
