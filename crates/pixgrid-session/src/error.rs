//! Session store errors.

/// Errors from creating sessions or configuring the store.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The OS random number generator could not produce an id.
    #[error("secure randomness unavailable: {0}")]
    Randomness(getrandom::Error),

    /// Store configuration is unusable.
    #[error("invalid session config: {0}")]
    InvalidConfig(String),
}
