use thiserror::Error;

/// Result type used throughout the crate.
///
/// This is a standard Rust `Result` where the error variant is the
/// crate-specific [`Error`] enum.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum representing possible errors that can occur in this crate.
///
/// Runtime operations (logging, subscribing, dispatching) never return
/// errors; only configuration-time problems surface here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A severity name from configuration did not match any known level.
    #[error("unknown severity level {0:?}")]
    UnknownSeverity(String),
}
