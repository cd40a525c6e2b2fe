//! Error type for the small set of fallible operations in this crate.
//!
//! Every algorithmic function is total over well-formed inputs (spec §7):
//! the error surface here is deliberately narrow — a bad secret length, a
//! forced-but-unsupported backend, or a streaming state used before reset.

use thiserror::Error;

/// Errors returned by the public API.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum XxError {
    /// A caller-supplied secret was shorter than [`crate::secret::SECRET_MIN`],
    /// or a canonical digest buffer had the wrong length.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// A backend was forced via [`crate::backend::BackendId`] that the
    /// current CPU/OS does not support.
    #[error("backend {0:?} is not supported on this CPU/OS")]
    UnsupportedBackend(crate::backend::BackendId),

    /// `update` or `digest` was called on a streaming state that was never
    /// reset (or, in principle, that failed to reset).
    #[error("streaming state used before reset")]
    InvalidState,

    /// The aligned accumulator allocation failed.
    #[error("allocation failure")]
    Alloc,
}

pub type Result<T> = core::result::Result<T, XxError>;
