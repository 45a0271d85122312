use std::cmp::Ordering;
use std::collections::HashMap;

use crate::dataframe::DataFrame;
use crate::error::Result;
use crate::na::NA;
use crate::rdd::{CONST, DIST_BIN, DIST_FROM_CUT};
use crate::series::Series;

/// Outer half-width of the binned window
pub const OUTER_WINDOW: f64 = 1.2;
/// Half-width of the narrow window
pub const INNER_WINDOW: f64 = 0.6;
/// Width of a distance bin
pub const BIN_WIDTH: f64 = 0.1;
/// Number of bins covering `[-OUTER_WINDOW, OUTER_WINDOW)`
pub const BIN_COUNT: usize = 24;

const EDGE_TOLERANCE: f64 = 1e-9;

/// Windowed subsets of a (placebo) observation table
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceboSubdata {
    /// Rows with `|dist_from_cut| < 1.2`, with the bin column added
    pub window12: DataFrame,
    /// Rows of `window12` with `|dist_from_cut| < 0.6`
    pub window06: DataFrame,
}

/// Bin position of a distance on the fixed `0.1` grid over `[-1.2, 1.2)`
///
/// Bins are left-inclusive. `None` when the distance falls outside the grid.
pub fn bin_position(distance: f64) -> Option<usize> {
    if !(-OUTER_WINDOW..OUTER_WINDOW).contains(&distance) {
        return None;
    }
    let scaled = (distance + OUTER_WINDOW) / BIN_WIDTH;
    let nearest = scaled.round();
    // decimal edges like -1.1 are not exact in binary; snap them to the edge
    let position = if (scaled - nearest).abs() < EDGE_TOLERANCE {
        nearest
    } else {
        scaled.floor()
    };
    // snapping only crosses interior edges, never out of the grid
    Some((position.max(0.0) as usize).min(BIN_COUNT - 1))
}

/// Label of a bin: its midpoint, `-1.15 + 0.1 * position`
pub fn bin_label(position: usize) -> f64 {
    let label = -OUTER_WINDOW + BIN_WIDTH / 2.0 + BIN_WIDTH * position as f64;
    (label * 100.0).round() / 100.0
}

/// Restrict to the 1.2 window, bin the distance, and cut the 0.6 window
pub fn create_placebo_subdata(placebo_data: &DataFrame) -> Result<PlaceboSubdata> {
    let mut window12 = placebo_data.within(DIST_FROM_CUT, OUTER_WINDOW)?;

    let bins: Vec<NA<f64>> = window12
        .float_column(DIST_FROM_CUT)?
        .values()
        .iter()
        .map(|d| match d {
            NA::Value(v) => bin_position(*v).map(bin_label).into(),
            NA::NA => NA::NA,
        })
        .collect();
    window12.add_float_column(DIST_BIN, bins)?;

    let window06 = window12.within(DIST_FROM_CUT, INNER_WINDOW)?;

    Ok(PlaceboSubdata { window12, window06 })
}

/// Frequency of each distinct value of a float column
///
/// Returns a table with columns `bins`, `freq` and `const`, sorted by bin
/// value ascending. Missing values are not counted.
pub fn calculate_bin_frequency(data: &DataFrame, bins: &str) -> Result<DataFrame> {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for value in data.float_column(bins)?.values().iter().filter_map(|v| v.value()) {
        // -0.0 and 0.0 are the same bin
        let key = if *value == 0.0 { 0.0f64 } else { *value };
        *counts.entry(key.to_bits()).or_insert(0) += 1;
    }

    let mut frequency: Vec<(f64, usize)> = counts
        .into_iter()
        .map(|(bits, count)| (f64::from_bits(bits), count))
        .collect();
    frequency.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let n = frequency.len();
    let mut table = DataFrame::new();
    table.add_column(Series::from_vec(
        frequency.iter().map(|(value, _)| *value).collect(),
        "bins",
    ))?;
    table.add_column(Series::from_vec(
        frequency.iter().map(|(_, count)| *count as f64).collect(),
        "freq",
    ))?;
    table.add_column(Series::constant(1.0, n, CONST))?;

    Ok(table)
}
