//! Error types.
//!
//! Registry operations never fail: unknown lane ids are ignored and invalid widths are
//! corrected. The only fallible path is writing to the output sink.

use thiserror::Error;

/// Errors returned by operations that write to the terminal.
#[derive(Debug, Error)]
pub enum Error {
    /// Writing or flushing the output sink failed.
    #[error("failed to write to the display sink: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
