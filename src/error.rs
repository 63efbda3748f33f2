// Typed errors for the construction stage resource

use thiserror::Error;

/// A rejected stage creation payload.
///
/// Each kind carries a fixed message that is returned to clients verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name exceeds maximum length of 255 characters.")]
    NameTooLong,
    #[error("Invalid start date format. It should be in ISO8601 format (e.g., 2022-12-31T14:59:00Z).")]
    InvalidStartDate,
    #[error("Invalid end_date format. It should be null or in ISO8601 format.")]
    InvalidEndDate,
    #[error("End date cannot be sooner than start date.")]
    EndBeforeStart,
    #[error("Invalid durationUnit. It should be one of HOURS, DAYS, WEEKS, or skipped.")]
    InvalidDurationUnit,
    #[error("Invalid color format. It should be null or a valid HEX color (e.g., #FF0000).")]
    InvalidColor,
    #[error("externalId exceeds maximum length of 255 characters.")]
    ExternalIdTooLong,
    #[error("Invalid status. It should be one of NEW, PLANNED, or DELETED.")]
    InvalidStatus,
}

/// Errors surfaced by the stage store and service
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Status update with a value outside the closed status set
    #[error("Invalid status value!")]
    InvalidStatus(String),

    #[error("Construction stage with ID {0} not found.")]
    NotFound(i64),

    /// Storage failure; the message is client-safe, driver details stay in `source`
    #[error("{message}")]
    Persistence {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },
}

impl StageError {
    /// Build a mapper for `map_err` that wraps a driver error with a client-safe message
    pub fn persistence(message: impl Into<String>) -> impl FnOnce(rusqlite::Error) -> StageError {
        let message = message.into();
        move |source| StageError::Persistence {
            message,
            source: Some(source),
        }
    }

    /// Caller mistakes (bad input, unknown id) as opposed to storage failures
    pub fn is_user_error(&self) -> bool {
        !matches!(self, StageError::Persistence { .. })
    }
}

pub type StageResult<T> = Result<T, StageError>;
