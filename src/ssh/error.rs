use thiserror::Error;

#[derive(Error, Debug)]
pub enum SshError {
    #[error("Dial failed: {0}")]
    Dial(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Authentication rejected for user {0}")]
    AuthRejected(String),

    #[error("Session open failed: {0}")]
    SessionOpen(String),

    #[error("Terminal setup failed: {0}")]
    Terminal(String),

    #[error("Command execution failed: {0}")]
    Exec(String),

    #[error("Remote command exited with status {0}")]
    CommandFailed(u32),

    #[error("Shell input closed")]
    ShellClosed,

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<russh::Error> for SshError {
    fn from(err: russh::Error) -> Self {
        SshError::Protocol(err.to_string())
    }
}

pub type SshResult<T> = Result<T, SshError>;
