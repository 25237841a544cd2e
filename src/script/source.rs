use crate::script::error::{ScriptError, ScriptResult};
use std::path::Path;
use std::sync::Arc;

/// Command issued on every cycle when no script was supplied.
pub const DEFAULT_COMMAND: &str = "echo 'Hello, world!'";

/// Ordered sequence of commands shared read-only by every agent in a run.
///
/// An empty script means "no script": every index yields [`DEFAULT_COMMAND`].
/// A finite script yields its entries in order and an empty string for every
/// index past the end, so an agent can run dry without terminating early.
#[derive(Debug, Clone, Default)]
pub struct CommandScript {
    commands: Arc<[String]>,
}

impl CommandScript {
    pub fn new(commands: Vec<String>) -> Self {
        Self {
            commands: commands.into(),
        }
    }

    /// Load a script from a file path or, if the argument names no existing
    /// file, treat the argument itself as the script text.
    pub async fn load(script: &str) -> ScriptResult<Self> {
        let text = if Path::new(script).is_file() {
            tokio::fs::read_to_string(script)
                .await
                .map_err(|source| ScriptError::ReadFailed {
                    path: script.to_string(),
                    source,
                })?
        } else {
            script.to_string()
        };

        Ok(Self::parse(&text))
    }

    /// Split script text into commands: on newlines, falling back to
    /// semicolons when the text is a single line. Entries are kept verbatim.
    pub fn parse(text: &str) -> Self {
        let mut commands: Vec<String> = text.split('\n').map(str::to_owned).collect();
        if commands.len() == 1 {
            commands = text.split(';').map(str::to_owned).collect();
        }

        Self::new(commands)
    }

    /// Command for the given cycle index.
    pub fn command_at(&self, index: usize) -> &str {
        if self.commands.is_empty() {
            return DEFAULT_COMMAND;
        }

        self.commands.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
