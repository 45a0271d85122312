use crate::dataframe::DataFrame;
use crate::error::Result;
use crate::na::NA;
use crate::rdd::{DIST_FROM_CUT, GPA_ABOVE_CUTOFF, GPA_BELOW_CUTOFF, GPA_X_ABOVE, GPA_X_BELOW};

/// Recompute the cutoff variables for a cutoff shifted by `cutoff_deviation`
///
/// The distance is moved so that the placebo cutoff sits at zero. A shifted
/// distance that is strictly negative is "below" the cutoff; zero and
/// positive distances are "above". Both interaction terms are rebuilt from the
/// shifted distance. The input table is not modified.
pub fn gen_placebo_data(data: &DataFrame, cutoff_deviation: f64) -> Result<DataFrame> {
    // Every column the placebo owns must be present up front
    for name in [GPA_BELOW_CUTOFF, GPA_ABOVE_CUTOFF, GPA_X_BELOW, GPA_X_ABOVE] {
        data.column(name)?;
    }

    let shifted = data
        .float_column(DIST_FROM_CUT)?
        .map(|&d| d - cutoff_deviation);

    let below: Vec<NA<f64>> = shifted
        .values()
        .iter()
        .map(|d| match d {
            NA::Value(v) if *v < 0.0 => NA::Value(1.0),
            _ => NA::Value(0.0),
        })
        .collect();
    let above: Vec<NA<f64>> = below
        .iter()
        .map(|b| b.map(|v| 1.0 - v))
        .collect();

    let x_below = interact(shifted.values(), &below);
    let x_above = interact(shifted.values(), &above);

    let mut placebo = data.clone();
    placebo.add_float_column(DIST_FROM_CUT, shifted.values().to_vec())?;
    placebo.add_float_column(GPA_BELOW_CUTOFF, below)?;
    placebo.add_float_column(GPA_ABOVE_CUTOFF, above)?;
    placebo.add_float_column(GPA_X_BELOW, x_below)?;
    placebo.add_float_column(GPA_X_ABOVE, x_above)?;

    Ok(placebo)
}

fn interact(distance: &[NA<f64>], indicator: &[NA<f64>]) -> Vec<NA<f64>> {
    distance
        .iter()
        .zip(indicator)
        .map(|(&d, &i)| d * i)
        .collect()
}
