pub mod error;
pub mod source;

pub use error::{ScriptError, ScriptResult};
pub use source::{CommandScript, DEFAULT_COMMAND};
