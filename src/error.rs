//! Error types for model building and solving.

use thiserror::Error;

/// Errors raised by [`Model`](crate::Model) operations.
///
/// Every failed native call surfaces the raw status code the engine
/// returned, so callers can tell an invalid-handle failure apart from a
/// licensing or out-of-memory one without this layer guessing at the
/// engine's taxonomy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A native engine call returned a non-zero status code.
    #[error("native call `{call}` failed with status code {code}")]
    Engine {
        /// The engine entry point that failed.
        call: &'static str,
        /// The raw, engine-defined status code (always non-zero).
        code: i32,
    },

    /// A constraint references a variable index the model has not
    /// committed. Raised before any native call of the constraints phase,
    /// so the pending queues are left untouched.
    #[error(
        "constraint `{constraint}` references variable index {index}, \
         but only {committed} variables are committed"
    )]
    UncommittedVariable {
        /// Name of the offending constraint; empty when unnamed.
        constraint: String,
        /// The referenced variable index.
        index: usize,
        /// Number of variables committed to the model.
        committed: usize,
    },
}

impl Error {
    pub(crate) fn engine(call: &'static str, status: crate::engine::EngineError) -> Self {
        Error::Engine {
            call,
            code: status.code(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
