pub mod client;
pub mod error;
pub mod russh_client;

pub use client::{DialOptions, SshClient, SshConnection, SshSession, SshShell, TerminalRequest};
pub use error::{SshError, SshResult};
pub use russh_client::RusshClient;
