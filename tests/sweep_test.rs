mod common;

use rddprep::stats::{ESTIMATE_COLUMN, PVALUE_COLUMN};
use rddprep::{
    bandwidth_sensitivity_summary, bandwidth_sensitivity_summary_with, Cell, EstimationTable,
    Error, GroupDict, OlsEstimator, RddConfig, RddEstimator, Result, RowKind,
};

/// Reports p = 0.5 while every row lies within 0.5 of the cutoff, 0.01 otherwise
struct WindowStub;

impl RddEstimator for WindowStub {
    fn estimate(
        &self,
        groups: &GroupDict,
        _outcome: &str,
        _regressors: &[String],
    ) -> Result<EstimationTable> {
        let mut widest: f64 = 0.0;
        for (_, table) in groups.iter() {
            for d in table.float_column("dist_from_cut")?.to_vec_f64() {
                widest = widest.max(d.abs());
            }
        }
        let p = if widest <= 0.5 { 0.5 } else { 0.01 };

        let n = groups.len();
        let mut table = EstimationTable::new(groups.keys());
        table.add_column(ESTIMATE_COLUMN, vec![-0.25; n])?;
        table.add_column(PVALUE_COLUMN, vec![p; n])?;
        Ok(table)
    }
}

/// Returns a table without the p-value column
struct MalformedStub;

impl RddEstimator for MalformedStub {
    fn estimate(&self, groups: &GroupDict, _: &str, _: &[String]) -> Result<EstimationTable> {
        let mut table = EstimationTable::new(groups.keys());
        table.add_column(ESTIMATE_COLUMN, vec![0.0; groups.len()])?;
        Ok(table)
    }
}

#[test]
fn test_masking_scenario() {
    let data = common::observations(common::evenly_spaced_distances(100), -0.3, 42);
    let keys = ["All", "Male"];
    let summary = bandwidth_sensitivity_summary(
        &data,
        "nextGPA",
        &keys,
        &["const", "male"],
        &common::REGRESSORS,
        &WindowStub,
    )
    .unwrap();

    assert_eq!(summary.rows().len(), 24);
    assert_eq!(summary.columns(), &["All".to_string(), "Male".to_string()]);

    for step in 1..=12 {
        let bandwidth = step as f64 / 10.0;
        for key in keys {
            let estimate = summary.get(bandwidth, RowKind::Probation, key).unwrap();
            let p_value = summary.get(bandwidth, RowKind::PValue, key).unwrap();
            if step <= 5 {
                assert_eq!(estimate, &Cell::Masked("x".to_string()));
                assert_eq!(p_value, &Cell::Masked(".".to_string()));
            } else {
                assert_eq!(estimate, &Cell::Value(-0.25));
                assert_eq!(p_value, &Cell::Value(0.01));
            }
        }
    }
}

#[test]
fn test_rows_are_bandwidth_ascending() {
    let data = common::observations(common::evenly_spaced_distances(100), -0.3, 42);
    let summary = bandwidth_sensitivity_summary(
        &data,
        "nextGPA",
        &["All"],
        &["const"],
        &common::REGRESSORS,
        &WindowStub,
    )
    .unwrap();

    let labels: Vec<&str> = summary.rows().iter().map(|r| r.label.as_str()).collect();
    assert_eq!(&labels[..4], &["probation", "p-value", "probation", "p-value"]);
    assert!(summary
        .rows()
        .windows(2)
        .all(|pair| pair[0].key.bandwidth <= pair[1].key.bandwidth));
}

#[test]
fn test_malformed_estimator_result() {
    let data = common::observations(common::evenly_spaced_distances(100), -0.3, 42);
    let result = bandwidth_sensitivity_summary(
        &data,
        "nextGPA",
        &["All"],
        &["const"],
        &common::REGRESSORS,
        &MalformedStub,
    );
    assert!(matches!(result, Err(Error::Estimation { .. })));
}

#[test]
fn test_missing_distance_column() {
    let mut data = rddprep::DataFrame::new();
    data.add_column(rddprep::Series::from_vec(vec![1.0, 1.0], "const"))
        .unwrap();
    let result = bandwidth_sensitivity_summary(
        &data,
        "nextGPA",
        &["All"],
        &["const"],
        &common::REGRESSORS,
        &WindowStub,
    );
    assert!(matches!(result, Err(Error::ColumnNotFound(_))));
}

#[test]
fn test_ols_sweep_recovers_discontinuity() {
    let data = common::observations(common::random_distances(3000, 2024), -0.3, 2024);
    let config = RddConfig::from_toml_str(
        "[sweep]\nbandwidths = [0.4, 0.8, 1.2]\n\n[estimator]\ncluster = \"clustervar\"\n",
    )
    .unwrap();
    let estimator = OlsEstimator::from_config(&config.estimator);

    let summary = bandwidth_sensitivity_summary_with(
        &data,
        "nextGPA",
        &["All", "Male", "Female"],
        &["const", "male", "female"],
        &common::REGRESSORS,
        &estimator,
        &config.sweep,
    )
    .unwrap();

    assert_eq!(summary.rows().len(), 6);
    for key in ["All", "Male", "Female"] {
        let estimate = summary
            .get(1.2, RowKind::Probation, key)
            .and_then(Cell::as_f64)
            .unwrap();
        assert!((estimate + 0.3).abs() < 0.05, "{}: {}", key, estimate);
        let p_value = summary.get(1.2, RowKind::PValue, key).and_then(Cell::as_f64).unwrap();
        assert!(p_value < 0.1);
    }
}

#[test]
fn test_ols_sweep_collinear_design_fails() {
    // both indicators plus a constant are collinear
    let data = common::observations(common::random_distances(500, 9), -0.3, 9);
    let regressors = ["const", "gpalscutoff", "gpagrcutoff"];
    let result = bandwidth_sensitivity_summary(
        &data,
        "nextGPA",
        &["All"],
        &["const"],
        &regressors,
        &OlsEstimator::default(),
    );
    assert!(matches!(result, Err(Error::Estimation { .. })));
}
