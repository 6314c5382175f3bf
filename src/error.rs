use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("No pricing configured for model '{0}'")]
    UnknownModel(String),

    #[error("Classification call failed: {0}")]
    Classification(String),

    #[error("Invalid date '{value}': {details}")]
    Date { value: String, details: String },

    #[error("Export to '{path}' failed: {source}")]
    Export {
        path: String,
        #[source]
        source: Box<AuditError>,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
