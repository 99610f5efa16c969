use thiserror::Error;

use crate::rfc::ical::recur::ValidationError;

/// RFC validation and expansion errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Recurrence rule validation error: {0}")]
    RecurValidationError(#[from] ValidationError),

    #[error(transparent)]
    CoreError(#[from] kunai_core::error::CoreError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
