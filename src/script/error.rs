use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to read script file {path}: {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },
}

pub type ScriptResult<T> = Result<T, ScriptError>;
