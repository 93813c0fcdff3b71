use thiserror::Error;

/// Recurrence parsing and expansion errors
#[derive(Error, Debug)]
pub enum RecurError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unsupported recurrence rule part: {0}")]
    UnsupportedPart(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("Recurrence rule rejected: {0}")]
    RuleRejected(String),

    #[error(transparent)]
    CoreError(#[from] courtyard_core::error::CoreError),
}

pub type RecurResult<T> = std::result::Result<T, RecurError>;
