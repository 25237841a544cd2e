use crate::ssh::error::SshResult;
use std::future::Future;

/// Target and credentials for one dial.
#[derive(Debug, Clone)]
pub struct DialOptions {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// Terminal parameters for an interactive shell.
#[derive(Debug, Clone)]
pub struct TerminalRequest {
    pub term: String,
    pub columns: u32,
    pub rows: u32,
}

impl Default for TerminalRequest {
    fn default() -> Self {
        Self {
            term: "xterm-256color".to_string(),
            columns: 100,
            rows: 30,
        }
    }
}

/// Capability surface of the underlying SSH protocol library.
///
/// The agent and orchestrator only ever see these traits; the production
/// implementation lives in [`crate::ssh::russh_client`] and tests substitute
/// their own.
pub trait SshClient: Send + Sync + 'static {
    type Conn: SshConnection;

    /// Establish an authenticated connection to the remote endpoint.
    fn dial(&self, opts: &DialOptions) -> impl Future<Output = SshResult<Self::Conn>> + Send;
}

pub trait SshConnection: Send + 'static {
    type Session: SshSession;
    type Shell: SshShell;

    /// Open a fresh session for a single command execution.
    fn open_session(&mut self) -> impl Future<Output = SshResult<Self::Session>> + Send;

    /// Open a long-lived interactive shell: session, terminal request, shell
    /// start, and a drain of remote output scoped to the shell's lifetime.
    fn open_shell(
        &mut self,
        term: &TerminalRequest,
    ) -> impl Future<Output = SshResult<Self::Shell>> + Send;

    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

pub trait SshSession: Send + 'static {
    /// Run one command synchronously, capturing combined stdout and stderr.
    fn run_captured(&mut self, command: &str) -> impl Future<Output = SshResult<String>> + Send;

    fn close(self) -> impl Future<Output = ()> + Send;
}

pub trait SshShell: Send + 'static {
    /// Write raw bytes to the shell's input stream.
    fn send(&mut self, bytes: &[u8]) -> impl Future<Output = SshResult<()>> + Send;

    fn close(self) -> impl Future<Output = ()> + Send;
}
