use crate::ssh::SshError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    /// Cancellation observed mid-wait or mid-retry; a graceful stop, not a failure.
    #[error("Cancelled")]
    Cancelled,

    #[error("Connection failed after {attempts} attempts: {source}")]
    ConnectionFailed { attempts: u32, source: SshError },

    #[error("Agent is not connected")]
    NotConnected,

    #[error("Session failed: {0}")]
    Session(#[from] SshError),
}

impl AgentError {
    /// True for stops that belong to normal shutdown rather than failures.
    pub fn is_graceful(&self) -> bool {
        matches!(self, AgentError::Cancelled)
    }
}

pub type AgentResult<T> = Result<T, AgentError>;
