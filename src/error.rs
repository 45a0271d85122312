use thiserror::Error;

/// Error type shared by every operation in the crate
#[derive(Error, Debug)]
pub enum Error {
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("column type mismatch: column {name}, expected {expected}, found {found}")]
    ColumnTypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("inconsistent row count: expected {expected}, found {found}")]
    InconsistentRowCount { expected: usize, found: usize },

    #[error("estimation failed at bandwidth {bandwidth}: {message}")]
    Estimation { bandwidth: f64, message: String },

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("computation error: {0}")]
    ComputationError(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error")]
    Io(#[source] std::io::Error),

    #[error("CSV error")]
    Csv(#[source] csv::Error),

    #[error("JSON error")]
    Json(#[source] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
