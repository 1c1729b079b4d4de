use thiserror::Error;

/// Errors raised by the statistics engine.
///
/// IO and format problems are reported through `anyhow` by the loader and
/// the CLI; this type only covers what the computations themselves reject.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatsError {
    #[error("cannot compute {op} of non-numeric column '{column}'")]
    NonNumeric { op: &'static str, column: String },

    #[error("cannot compare {left} with {right} in column '{column}'")]
    IncomparableTypes {
        column: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("column '{column}' has {actual} values but the index has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("quantile must be between 0 and 1, got {0}")]
    InvalidQuantile(f64),

    #[error("invalid percentiles: {0}")]
    InvalidPercentiles(String),

    #[error("{op} of '{column}' is undefined: no valid values")]
    Empty { op: &'static str, column: String },

    #[error("no columns match the selection")]
    NoColumnsSelected,
}

pub type Result<T> = std::result::Result<T, StatsError>;
