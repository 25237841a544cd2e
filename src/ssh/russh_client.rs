//! Production implementation of the SSH capability traits over `russh`.

use crate::ssh::client::{
    DialOptions, SshClient, SshConnection, SshSession, SshShell, TerminalRequest,
};
use crate::ssh::error::{SshError, SshResult};
use russh::client::{self, Handle, Msg};
use russh::keys::ssh_key;
use russh::{Channel, ChannelMsg, Disconnect, Pty};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const INPUT_BAUD: u32 = 14400;
const OUTPUT_BAUD: u32 = 14400;

/// Modes for the interactive shell terminal: echoing disabled, fixed rates.
const SHELL_MODES: [(Pty, u32); 4] = [
    (Pty::ECHO, 0),
    (Pty::ECHOCTL, 0),
    (Pty::TTY_OP_ISPEED, INPUT_BAUD),
    (Pty::TTY_OP_OSPEED, OUTPUT_BAUD),
];

/// Modes for one-shot command sessions: fixed rates only.
const EXEC_MODES: [(Pty, u32); 2] = [
    (Pty::TTY_OP_ISPEED, INPUT_BAUD),
    (Pty::TTY_OP_OSPEED, OUTPUT_BAUD),
];

/// Accepts any host key; the swarm targets disposable test servers.
#[derive(Debug)]
struct AcceptingHandler;

impl client::Handler for AcceptingHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &ssh_key::PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// Stateless dialer; one instance is cloned into every agent.
#[derive(Debug, Clone, Default)]
pub struct RusshClient;

impl RusshClient {
    pub fn new() -> Self {
        Self
    }
}

impl SshClient for RusshClient {
    type Conn = RusshConnection;

    async fn dial(&self, opts: &DialOptions) -> SshResult<RusshConnection> {
        let config = Arc::new(client::Config::default());
        let mut handle =
            client::connect(config, (opts.host.as_str(), opts.port), AcceptingHandler)
                .await
                .map_err(|err| SshError::Dial(err.to_string()))?;

        let auth = handle
            .authenticate_password(opts.username.as_str(), opts.password.as_str())
            .await
            .map_err(|err| SshError::Auth(err.to_string()))?;
        if !auth.success() {
            return Err(SshError::AuthRejected(opts.username.clone()));
        }

        Ok(RusshConnection { handle })
    }
}

pub struct RusshConnection {
    handle: Handle<AcceptingHandler>,
}

impl SshConnection for RusshConnection {
    type Session = RusshSession;
    type Shell = RusshShell;

    async fn open_session(&mut self) -> SshResult<RusshSession> {
        let channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(|err| SshError::SessionOpen(err.to_string()))?;

        Ok(RusshSession { channel })
    }

    async fn open_shell(&mut self, term: &TerminalRequest) -> SshResult<RusshShell> {
        let mut channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(|err| SshError::SessionOpen(err.to_string()))?;

        channel
            .request_pty(
                false,
                &term.term,
                term.columns,
                term.rows,
                0,
                0,
                &SHELL_MODES,
            )
            .await
            .map_err(|err| SshError::Terminal(err.to_string()))?;
        channel
            .request_shell(true)
            .await
            .map_err(|err| SshError::Terminal(err.to_string()))?;

        let (input, input_rx) = mpsc::channel(16);
        let drain = tokio::spawn(drain_shell(channel, input_rx));

        Ok(RusshShell { input, drain })
    }

    async fn close(&mut self) {
        let _ = self
            .handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await;
    }
}

pub struct RusshSession {
    channel: Channel<Msg>,
}

impl SshSession for RusshSession {
    async fn run_captured(&mut self, command: &str) -> SshResult<String> {
        self.channel
            .request_pty(false, "xterm-256color", 100, 30, 0, 0, &EXEC_MODES)
            .await
            .map_err(|err| SshError::Terminal(err.to_string()))?;
        self.channel
            .exec(true, command)
            .await
            .map_err(|err| SshError::Exec(err.to_string()))?;

        let mut output = Vec::new();
        let mut exit_status = None;
        while let Some(msg) = self.channel.wait().await {
            match msg {
                ChannelMsg::Data { ref data } => output.extend_from_slice(data),
                ChannelMsg::ExtendedData { ref data, .. } => output.extend_from_slice(data),
                ChannelMsg::ExitStatus { exit_status: status } => exit_status = Some(status),
                _ => {}
            }
        }

        match exit_status {
            Some(status) if status != 0 => Err(SshError::CommandFailed(status)),
            _ => Ok(String::from_utf8_lossy(&output).into_owned()),
        }
    }

    async fn close(mut self) {
        let _ = self.channel.eof().await;
    }
}

pub struct RusshShell {
    input: mpsc::Sender<Vec<u8>>,
    drain: JoinHandle<()>,
}

impl SshShell for RusshShell {
    async fn send(&mut self, bytes: &[u8]) -> SshResult<()> {
        self.input
            .send(bytes.to_vec())
            .await
            .map_err(|_| SshError::ShellClosed)
    }

    async fn close(self) {
        drop(self.input);
        let _ = self.drain.await;
    }
}

/// Owns the shell channel for its whole lifetime: forwards queued input and
/// discards remote output so the server never blocks on a full window. Ends
/// when the channel closes or the input side is dropped.
async fn drain_shell(mut channel: Channel<Msg>, mut input: mpsc::Receiver<Vec<u8>>) {
    loop {
        tokio::select! {
            msg = channel.wait() => {
                if msg.is_none() {
                    break;
                }
            }
            bytes = input.recv() => match bytes {
                Some(bytes) => {
                    if channel.data(&bytes[..]).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
        }
    }
}
