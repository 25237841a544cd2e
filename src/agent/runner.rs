use crate::agent::backoff::backoff_delay;
use crate::agent::error::{AgentError, AgentResult};
use crate::agent::types::AgentConfig;
use crate::ssh::{SshClient, SshConnection, SshSession, SshShell, TerminalRequest};
use std::time::Duration;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Grace period for the remote shell to become ready in interactive mode.
const SHELL_WARMUP: Duration = Duration::from_secs(10);

/// One SSH connection's full lifecycle: delayed start, connect-with-retry,
/// command loop, TTL-bounded termination, resource release.
///
/// An agent is owned exclusively by the task driving it; the only thing it
/// shares with the rest of the run is the cancellation token it observes.
pub struct Agent<C: SshClient> {
    id: usize,
    config: AgentConfig,
    client: C,
    conn: Option<C::Conn>,
    connected_at: Option<Instant>,
    index: usize,
}

impl<C: SshClient> Agent<C> {
    pub fn new(id: usize, config: AgentConfig, client: C) -> Self {
        Self {
            id,
            config,
            client,
            conn: None,
            connected_at: None,
            index: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Establish the connection, retrying with exponential backoff.
    ///
    /// A no-op when already connected. Every wait races the cancellation
    /// token, and no dial attempt starts after cancellation.
    pub async fn connect(&mut self, cancel: &CancellationToken) -> AgentResult<()> {
        if self.conn.is_some() {
            return Ok(());
        }

        if !self.config.start_delay.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => return Err(AgentError::Cancelled),
                _ = time::sleep(self.config.start_delay) => {}
            }
        }

        let opts = self.config.dial_options();
        let attempts = self.config.max_retries + 1;
        let mut attempt = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(AgentError::Cancelled);
            }

            match self.client.dial(&opts).await {
                Ok(conn) => {
                    self.connected_at = Some(Instant::now());
                    self.conn = Some(conn);
                    debug!(
                        agent = self.id,
                        host = %self.config.host,
                        port = self.config.port,
                        "connected"
                    );
                    return Ok(());
                }
                Err(err) => {
                    attempt += 1;
                    if attempt >= attempts {
                        error!(
                            agent = self.id,
                            attempts,
                            error = %err,
                            "connection failed after retries"
                        );
                        return Err(AgentError::ConnectionFailed {
                            attempts,
                            source: err,
                        });
                    }

                    let backoff = backoff_delay(attempt - 1);
                    warn!(
                        agent = self.id,
                        attempt,
                        backoff = ?backoff,
                        error = %err,
                        "connection failed, retrying"
                    );

                    tokio::select! {
                        _ = cancel.cancelled() => return Err(AgentError::Cancelled),
                        _ = time::sleep(backoff) => {}
                    }
                }
            }
        }
    }

    /// Run the command loop in the configured mode until cancellation, TTL
    /// expiry, or a terminal session failure.
    pub async fn run(&mut self, cancel: &CancellationToken) -> AgentResult<()> {
        if self.conn.is_none() {
            return Err(AgentError::NotConnected);
        }

        if self.config.interactive {
            self.run_interactive(cancel).await
        } else {
            self.run_standard(cancel).await
        }
    }

    /// One fresh session per command; combined output is captured and logged.
    async fn run_standard(&mut self, cancel: &CancellationToken) -> AgentResult<()> {
        loop {
            if cancel.is_cancelled() {
                info!(agent = self.id, "cancellation observed, closing agent");
                return Ok(());
            }
            if self.ttl_reached() {
                info!(agent = self.id, "connection TTL reached, closing agent");
                return Ok(());
            }

            let command = self.config.script.command_at(self.index).to_string();
            let conn = self.conn.as_mut().ok_or(AgentError::NotConnected)?;

            let mut session = match conn.open_session().await {
                Ok(session) => session,
                Err(err) => {
                    error!(agent = self.id, error = %err, "failed to open session");
                    self.close().await;
                    return Err(AgentError::Session(err));
                }
            };

            debug!(agent = self.id, command = %command, "running command");
            match session.run_captured(&command).await {
                Ok(output) => {
                    info!(agent = self.id, "{}", output.trim_end());
                    session.close().await;
                }
                Err(err) => {
                    error!(agent = self.id, error = %err, "failed to run command");
                    session.close().await;
                    self.close().await;
                    return Err(AgentError::Session(err));
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = time::sleep(self.config.command_interval()) => {}
            }

            self.index += 1;
        }
    }

    /// One persistent shell for the whole run; commands are written to its
    /// input and remote output is drained unread for the shell's lifetime.
    async fn run_interactive(&mut self, cancel: &CancellationToken) -> AgentResult<()> {
        let conn = self.conn.as_mut().ok_or(AgentError::NotConnected)?;

        let mut shell = match conn.open_shell(&TerminalRequest::default()).await {
            Ok(shell) => shell,
            Err(err) => {
                error!(agent = self.id, error = %err, "failed to open interactive shell");
                self.close().await;
                return Err(AgentError::Session(err));
            }
        };

        let result = self.interactive_loop(cancel, &mut shell).await;
        shell.close().await;

        if result.is_err() {
            self.close().await;
        }

        result
    }

    async fn interactive_loop(
        &mut self,
        cancel: &CancellationToken,
        shell: &mut <C::Conn as SshConnection>::Shell,
    ) -> AgentResult<()> {
        debug!(agent = self.id, "waiting for shell to start");
        tokio::select! {
            _ = cancel.cancelled() => return Err(AgentError::Cancelled),
            _ = time::sleep(SHELL_WARMUP) => {}
        }

        loop {
            if cancel.is_cancelled() {
                info!(agent = self.id, "cancellation observed, closing agent");
                return Ok(());
            }
            if self.ttl_reached() {
                info!(agent = self.id, "connection TTL reached, closing agent");
                return Ok(());
            }

            let command = self.config.script.command_at(self.index).to_string();
            debug!(agent = self.id, command = %command, "writing command to shell");
            if let Err(err) = shell.send(format!("{command}\r").as_bytes()).await {
                error!(agent = self.id, error = %err, "failed to write command to shell");
                return Err(AgentError::Session(err));
            }

            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = time::sleep(self.config.command_interval()) => {}
            }

            self.index += 1;
        }
    }

    fn ttl_reached(&self) -> bool {
        match self.connected_at {
            Some(connected_at) => connected_at.elapsed() >= self.config.ttl,
            None => false,
        }
    }

    /// Release the connection. Idempotent; invoked by the owning control flow
    /// on every exit path so no handle outlives its agent.
    pub async fn close(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            debug!(agent = self.id, "closing connection");
            conn.close().await;
        }
    }
}
