// CSV input and output
pub mod csv;

pub use self::csv::{read_csv, write_csv, write_summary_csv};
