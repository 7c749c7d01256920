use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StandardsError {
    #[error("unknown conversion factor key: {key}")]
    UnknownFactor { key: String },
}
