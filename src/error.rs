//! Error taxonomy and the per-thread last-error mirror.

use std::cell::Cell;

/// The four failure kinds reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FailedAllocatingMemory,
    InvalidOperation,
    /// Parse, pack or validation failure.
    FailedOperation,
    /// Bad identifier, missing argument, out-of-range tag.
    InvalidParameter,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed allocating memory")]
    FailedAllocatingMemory,
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    #[error("failed operation: {0}")]
    FailedOperation(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FailedAllocatingMemory => ErrorKind::FailedAllocatingMemory,
            Error::InvalidOperation(_) => ErrorKind::InvalidOperation,
            Error::FailedOperation(_) | Error::Io(_) => ErrorKind::FailedOperation,
            Error::InvalidParameter(_) => ErrorKind::InvalidParameter,
        }
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::FailedAllocatingMemory
    }
}

impl From<std::fmt::Error> for Error {
    fn from(_: std::fmt::Error) -> Self {
        Error::FailedOperation("formatting failed".to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

thread_local! {
    static LAST_ERROR: Cell<Option<ErrorKind>> = const { Cell::new(None) };
}

/// Kind of the most recent failure recorded on the calling thread.
pub fn last_error() -> Option<ErrorKind> {
    LAST_ERROR.with(Cell::get)
}

pub fn set_last_error(kind: ErrorKind) {
    LAST_ERROR.with(|e| e.set(Some(kind)));
}

pub fn clear_last_error() {
    LAST_ERROR.with(|e| e.set(None));
}

/// Mirror a failing result into the thread-local slot and hand it back unchanged.
pub(crate) fn record<T>(result: Result<T>) -> Result<T> {
    if let Err(ref e) = result {
        set_last_error(e.kind());
    }
    result
}
