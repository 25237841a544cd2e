use std::num::NonZeroU32;
use std::time::Duration;

/// Run-wide configuration shared by every agent in a swarm.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Number of concurrent agents.
    pub count: usize,
    /// Per-agent connection lifetime.
    pub ttl: Duration,
    /// Upper bound for the random pre-connect delay; zero disables staggering.
    pub max_start_delay: Duration,
    /// Commands per minute.
    pub cadence: NonZeroU32,
    pub interactive: bool,
    pub max_retries: u32,
}
