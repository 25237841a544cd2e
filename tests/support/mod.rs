#![allow(dead_code)]

//! Mock implementations of the SSH capability traits, recording every call
//! so scenario tests can assert on attempt counts, timing, and payloads.

use parking_lot::Mutex;
use sshswarm::ssh::{
    DialOptions, SshClient, SshConnection, SshError, SshResult, SshSession, SshShell,
    TerminalRequest,
};
use std::sync::Arc;
use tokio::time::Instant;

#[derive(Debug, Default)]
struct MockState {
    dial_failures: usize,
    fail_session_open: bool,
    fail_exec: bool,
    fail_shell_open: bool,
    fail_shell_write: bool,

    dials: Vec<Instant>,
    sessions_opened: usize,
    commands: Vec<String>,
    shells_opened: usize,
    shells_closed: usize,
    shell_writes: Vec<(Instant, Vec<u8>)>,
    connections_closed: usize,
}

/// Shared mock endpoint; clones hand out connections against the same state.
#[derive(Clone, Default)]
pub struct MockClient {
    state: Arc<Mutex<MockState>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `failures` dials (across all agents), then succeed.
    pub fn failing_dials(failures: usize) -> Self {
        let client = Self::new();
        client.state.lock().dial_failures = failures;
        client
    }

    pub fn failing_session_open() -> Self {
        let client = Self::new();
        client.state.lock().fail_session_open = true;
        client
    }

    pub fn failing_exec() -> Self {
        let client = Self::new();
        client.state.lock().fail_exec = true;
        client
    }

    pub fn failing_shell_open() -> Self {
        let client = Self::new();
        client.state.lock().fail_shell_open = true;
        client
    }

    pub fn failing_shell_write() -> Self {
        let client = Self::new();
        client.state.lock().fail_shell_write = true;
        client
    }

    pub fn dial_count(&self) -> usize {
        self.state.lock().dials.len()
    }

    pub fn dial_times(&self) -> Vec<Instant> {
        self.state.lock().dials.clone()
    }

    pub fn sessions_opened(&self) -> usize {
        self.state.lock().sessions_opened
    }

    pub fn commands(&self) -> Vec<String> {
        self.state.lock().commands.clone()
    }

    pub fn shells_opened(&self) -> usize {
        self.state.lock().shells_opened
    }

    pub fn shells_closed(&self) -> usize {
        self.state.lock().shells_closed
    }

    pub fn shell_writes(&self) -> Vec<(Instant, String)> {
        self.state
            .lock()
            .shell_writes
            .iter()
            .map(|(at, bytes)| (*at, String::from_utf8_lossy(bytes).into_owned()))
            .collect()
    }

    pub fn connections_closed(&self) -> usize {
        self.state.lock().connections_closed
    }
}

impl SshClient for MockClient {
    type Conn = MockConnection;

    async fn dial(&self, _opts: &DialOptions) -> SshResult<MockConnection> {
        let mut state = self.state.lock();
        state.dials.push(Instant::now());

        if state.dial_failures > 0 {
            state.dial_failures -= 1;
            return Err(SshError::Dial("connection refused".to_string()));
        }

        Ok(MockConnection {
            state: self.state.clone(),
        })
    }
}

pub struct MockConnection {
    state: Arc<Mutex<MockState>>,
}

impl SshConnection for MockConnection {
    type Session = MockSession;
    type Shell = MockShell;

    async fn open_session(&mut self) -> SshResult<MockSession> {
        let mut state = self.state.lock();
        if state.fail_session_open {
            return Err(SshError::SessionOpen("channel rejected".to_string()));
        }

        state.sessions_opened += 1;
        Ok(MockSession {
            state: self.state.clone(),
        })
    }

    async fn open_shell(&mut self, _term: &TerminalRequest) -> SshResult<MockShell> {
        let mut state = self.state.lock();
        if state.fail_shell_open {
            return Err(SshError::Terminal("pty rejected".to_string()));
        }

        state.shells_opened += 1;
        Ok(MockShell {
            state: self.state.clone(),
        })
    }

    async fn close(&mut self) {
        self.state.lock().connections_closed += 1;
    }
}

pub struct MockSession {
    state: Arc<Mutex<MockState>>,
}

impl SshSession for MockSession {
    async fn run_captured(&mut self, command: &str) -> SshResult<String> {
        let mut state = self.state.lock();
        if state.fail_exec {
            return Err(SshError::Exec("broken pipe".to_string()));
        }

        state.commands.push(command.to_string());
        Ok(format!("ran: {command}"))
    }

    async fn close(self) {}
}

pub struct MockShell {
    state: Arc<Mutex<MockState>>,
}

impl SshShell for MockShell {
    async fn send(&mut self, bytes: &[u8]) -> SshResult<()> {
        let mut state = self.state.lock();
        if state.fail_shell_write {
            return Err(SshError::ShellClosed);
        }

        state.shell_writes.push((Instant::now(), bytes.to_vec()));
        Ok(())
    }

    async fn close(self) {
        self.state.lock().shells_closed += 1;
    }
}
