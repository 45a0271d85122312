use crate::na::NA;
use crate::series::Series;

/// Physical type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Float64,
    String,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Float64 => "float64",
            ColumnType::String => "string",
        }
    }
}

/// A typed column of a DataFrame
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Float64(Series<f64>),
    String(Series<String>),
}

impl Column {
    pub fn name(&self) -> &str {
        match self {
            Column::Float64(s) => s.name(),
            Column::String(s) => s.name(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Float64(s) => s.len(),
            Column::String(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Float64(_) => ColumnType::Float64,
            Column::String(_) => ColumnType::String,
        }
    }

    /// Text rendering of one cell; missing values render as an empty string
    pub fn cell_to_string(&self, row: usize) -> String {
        match self {
            Column::Float64(s) => match s.get(row) {
                Some(NA::Value(v)) => v.to_string(),
                _ => String::new(),
            },
            Column::String(s) => match s.get(row) {
                Some(NA::Value(v)) => v.clone(),
                _ => String::new(),
            },
        }
    }

    pub(crate) fn take(&self, positions: &[usize]) -> Column {
        match self {
            Column::Float64(s) => Column::Float64(s.take(positions)),
            Column::String(s) => Column::String(s.take(positions)),
        }
    }
}

impl From<Series<f64>> for Column {
    fn from(series: Series<f64>) -> Self {
        Column::Float64(series)
    }
}

impl From<Series<String>> for Column {
    fn from(series: Series<String>) -> Self {
        Column::String(series)
    }
}
