use csv::{ReaderBuilder, Writer};
use std::fs::File;
use std::path::Path;

use crate::column::Column;
use crate::dataframe::DataFrame;
use crate::error::Result;
use crate::na::NA;
use crate::rdd::BandwidthSummary;
use crate::series::Series;

/// Tokens read as a missing value
const NA_TOKENS: [&str; 5] = ["", "NA", "NaN", "nan", "."];

fn is_na_token(token: &str) -> bool {
    NA_TOKENS.contains(&token)
}

/// Read a CSV file with a header row into a DataFrame
///
/// A column becomes a float column when every non-missing cell parses as a
/// number; otherwise it is kept as a string column.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let file = File::open(path.as_ref())?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    // records with a wrong field count are rejected by the reader
    for result in rdr.records() {
        let record = result?;
        for (values, field) in raw.iter_mut().zip(record.iter()) {
            values.push(field.to_string());
        }
    }

    let mut df = DataFrame::new();
    for (name, values) in headers.into_iter().zip(raw) {
        df.add_column(infer_column(name, values))?;
    }
    Ok(df)
}

fn infer_column(name: String, values: Vec<String>) -> Column {
    let parsed: Option<Vec<f64>> = values
        .iter()
        .map(|v| {
            if is_na_token(v) {
                Some(f64::NAN)
            } else {
                v.parse::<f64>().ok()
            }
        })
        .collect();

    match parsed {
        Some(numbers) => Column::Float64(Series::from_floats(numbers, name)),
        None => Column::String(Series::new(
            values
                .into_iter()
                .map(|v| if is_na_token(&v) { NA::NA } else { NA::Value(v) })
                .collect(),
            name,
        )),
    }
}

/// Write a DataFrame to a CSV file; missing values are written as empty fields
pub fn write_csv<P: AsRef<Path>>(df: &DataFrame, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(df.column_names())?;
    for row in 0..df.row_count() {
        let record: Vec<String> = df.columns().map(|c| c.cell_to_string(row)).collect();
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write a bandwidth summary as CSV with `bandwidth` and `row` key columns
pub fn write_summary_csv<P: AsRef<Path>>(summary: &BandwidthSummary, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut wtr = Writer::from_writer(file);

    let mut header = vec!["bandwidth".to_string(), "row".to_string()];
    header.extend(summary.columns().iter().cloned());
    wtr.write_record(&header)?;

    for row in summary.rows() {
        let mut record = vec![row.key.bandwidth.to_string(), row.label.clone()];
        record.extend(row.cells.iter().map(|cell| match cell.as_f64() {
            Some(v) => v.to_string(),
            None => cell.to_string(),
        }));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
