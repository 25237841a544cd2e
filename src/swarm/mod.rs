pub mod orchestrator;
pub mod shutdown;
pub mod types;

pub use orchestrator::Swarm;
pub use shutdown::{spawn_signal_listener, ShutdownController, ShutdownState};
pub use types::RunConfig;
