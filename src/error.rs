use thiserror::Error as ThisError;

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Stock {0} not found.")]
    NotFound(String),

    #[error("No observations supplied for {0}")]
    EmptyInput(String),

    #[error("Invalid symbol {input:?}: {reason}")]
    InvalidSymbol { input: String, reason: String },
}

impl IndexError {
    pub(crate) fn invalid_symbol(input: &str, reason: impl Into<String>) -> Self {
        IndexError::InvalidSymbol {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;
