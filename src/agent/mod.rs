pub mod backoff;
pub mod error;
pub mod runner;
pub mod types;

pub use backoff::backoff_delay;
pub use error::{AgentError, AgentResult};
pub use runner::Agent;
pub use types::AgentConfig;
