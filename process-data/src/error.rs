use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing column {0}")]
    MissingColumn(String),
    #[error("Bad value '{value}' in column {column} at row {row}")]
    BadValue {
        row: usize,
        column: String,
        value: String,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("Not enough complete rows: need more than {needed}, got {got}")]
    TooFewRows { needed: usize, got: usize },
    #[error("Singular design matrix, predictors are collinear")]
    Singular,
}
