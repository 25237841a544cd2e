use crate::script::CommandScript;
use crate::ssh::DialOptions;
use std::num::NonZeroU32;
use std::time::Duration;

/// Immutable per-agent configuration, fanned out by the orchestrator.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Wait before the first dial, staggering swarm arrival.
    pub start_delay: Duration,
    /// Connection lifetime, measured from successful connect.
    pub ttl: Duration,
    /// Commands per minute.
    pub cadence: NonZeroU32,
    pub interactive: bool,
    /// Additional dial attempts after the first failure.
    pub max_retries: u32,
    pub script: CommandScript,
}

impl AgentConfig {
    /// Pause between command starts. Computed in floating point so cadences
    /// above 60 yield sub-second pauses instead of truncating to zero.
    pub fn command_interval(&self) -> Duration {
        Duration::from_secs_f64(60.0 / f64::from(self.cadence.get()))
    }

    pub fn dial_options(&self) -> DialOptions {
        DialOptions {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_cadence(cadence: u32) -> AgentConfig {
        AgentConfig {
            host: "localhost".to_string(),
            port: 22,
            username: "sshswarm".to_string(),
            password: "hunter2".to_string(),
            start_delay: Duration::ZERO,
            ttl: Duration::from_secs(60),
            cadence: NonZeroU32::new(cadence).unwrap(),
            interactive: false,
            max_retries: 0,
            script: CommandScript::default(),
        }
    }

    #[test]
    fn test_command_interval_at_default_cadence() {
        let config = config_with_cadence(6);
        assert_eq!(config.command_interval(), Duration::from_secs(10));
    }

    #[test]
    fn test_command_interval_above_sixty_stays_positive() {
        let config = config_with_cadence(120);
        assert_eq!(config.command_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_command_interval_for_uneven_cadence() {
        let interval = config_with_cadence(7).command_interval();
        assert!(interval > Duration::from_secs(8));
        assert!(interval < Duration::from_secs(9));
    }
}
