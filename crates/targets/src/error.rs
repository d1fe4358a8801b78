//! Body-level error type.

use thiserror::Error;

/// Errors returned by a body's `run` method.
///
/// The engine does not retry: any body error aborts the rest of the plan,
/// so the only distinction carried here is whether a cause is attached.
#[derive(Debug, Error)]
pub enum BodyError {
    /// The body ran and reported failure (failed test suite, non-zero exit,
    /// rejected publish, ...).
    #[error("{0}")]
    Failed(String),

    /// The body could not be started or its I/O broke underneath it.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
