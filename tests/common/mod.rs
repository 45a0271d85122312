//! Common test utilities
//!
//! Synthetic probation datasets shared by the integration tests.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rddprep::{DataFrame, Series};

pub const REGRESSORS: [&str; 4] = ["const", "gpalscutoff", "gpaXgpalscutoff", "gpaXgpagrcutoff"];

/// `n` distances evenly spread over `[-1.2, 1.2]`
pub fn evenly_spaced_distances(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| -1.2 + 2.4 * i as f64 / (n - 1) as f64)
        .collect()
}

/// Observation table with cutoff indicators, interactions, group dummies and
/// an outcome that drops by `jump` below the cutoff
pub fn observations(distances: Vec<f64>, jump: f64, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = distances.len();

    let below: Vec<f64> = distances
        .iter()
        .map(|d| if *d < 0.0 { 1.0 } else { 0.0 })
        .collect();
    let above: Vec<f64> = below.iter().map(|b| 1.0 - b).collect();
    let x_below: Vec<f64> = distances.iter().zip(&below).map(|(d, b)| d * b).collect();
    let x_above: Vec<f64> = distances.iter().zip(&above).map(|(d, a)| d * a).collect();
    let male: Vec<f64> = (0..n).map(|i| (i % 2) as f64).collect();
    let female: Vec<f64> = male.iter().map(|m| 1.0 - m).collect();
    let cluster: Vec<f64> = (0..n).map(|i| (i % 40) as f64).collect();
    let outcome: Vec<f64> = distances
        .iter()
        .zip(&below)
        .map(|(d, b)| 2.0 + 0.8 * d + jump * b + rng.random_range(-0.1..0.1))
        .collect();

    let mut df = DataFrame::new();
    df.add_column(Series::from_vec(distances, "dist_from_cut")).unwrap();
    df.add_column(Series::from_vec(below, "gpalscutoff")).unwrap();
    df.add_column(Series::from_vec(above, "gpagrcutoff")).unwrap();
    df.add_column(Series::from_vec(x_below, "gpaXgpalscutoff")).unwrap();
    df.add_column(Series::from_vec(x_above, "gpaXgpagrcutoff")).unwrap();
    df.add_column(Series::from_vec(male, "male")).unwrap();
    df.add_column(Series::from_vec(female, "female")).unwrap();
    df.add_column(Series::from_vec(cluster, "clustervar")).unwrap();
    df.add_column(Series::from_vec(vec![1.0; n], "const")).unwrap();
    df.add_column(Series::from_vec(outcome, "nextGPA")).unwrap();
    df
}

/// Distances drawn uniformly from `[-1.5, 1.5)`
pub fn random_distances(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.random_range(-1.5..1.5)).collect()
}
