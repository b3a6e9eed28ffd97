//! Expiry policy.

use std::time::Duration;

use crate::error::SessionError;

/// How long sessions live and how often expired ones are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// A session idle for longer than this is removed on the next
    /// reaper pass.
    pub idle_timeout: Duration,

    /// Time between reaper passes.
    pub reap_interval: Duration,
}

impl SessionConfig {
    /// Default idle timeout: 30 minutes.
    pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

    /// Default reaper interval: 5 minutes.
    pub const DEFAULT_REAP_INTERVAL: Duration = Duration::from_secs(5 * 60);

    /// Check that the policy can work as intended.
    ///
    /// The reap interval must be non-zero, and the idle timeout must
    /// be strictly longer than it, so a session touched just before a
    /// pass always survives that pass.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfig`] describing the violation.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.reap_interval.is_zero() {
            return Err(SessionError::InvalidConfig(
                "reap interval must be greater than zero".to_owned(),
            ));
        }
        if self.idle_timeout <= self.reap_interval {
            return Err(SessionError::InvalidConfig(format!(
                "idle timeout ({}s) must exceed the reap interval ({}s)",
                self.idle_timeout.as_secs(),
                self.reap_interval.as_secs(),
            )));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Self::DEFAULT_IDLE_TIMEOUT,
            reap_interval: Self::DEFAULT_REAP_INTERVAL,
        }
    }
}
