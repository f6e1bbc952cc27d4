use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Date calculation error: {0}")]
    DateError(String),

    #[error("Invalid recurrence policy: min_days ({min_days}) and max_days ({max_days}) must be finite, non-negative and ordered")]
    InvalidRecurrencePolicy { min_days: f64, max_days: f64 },

    #[error("No record with id: {0}")]
    RecordNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
