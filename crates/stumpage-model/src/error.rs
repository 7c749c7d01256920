use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown period type: {value}")]
    UnknownPeriodType { value: String },
    #[error("unknown price unit: {value}")]
    UnknownPriceUnit { value: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
