use crate::agent::{Agent, AgentConfig};
use crate::script::CommandScript;
use crate::ssh::SshClient;
use crate::swarm::types::RunConfig;
use rand::Rng;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Fans a run configuration out into independent agents and waits for every
/// one of them to reach a terminal state.
pub struct Swarm<C> {
    config: RunConfig,
    script: CommandScript,
    client: C,
}

impl<C: SshClient + Clone> Swarm<C> {
    pub fn new(config: RunConfig, script: CommandScript, client: C) -> Self {
        Self {
            config,
            script,
            client,
        }
    }

    /// Run every agent through connect, command loop, close. One agent's
    /// failure or stop never aborts any other; the call returns once all
    /// agents have finished.
    pub async fn run(&self, cancel: &CancellationToken) {
        let mut agents = JoinSet::new();

        debug!(count = self.config.count, "creating agents");
        for id in 1..=self.config.count {
            let agent = Agent::new(id, self.agent_config(), self.client.clone());
            let cancel = cancel.clone();

            debug!(agent = id, "starting agent");
            agents.spawn(async move {
                drive(agent, &cancel).await;
            });
        }

        while let Some(joined) = agents.join_next().await {
            if let Err(err) = joined {
                error!(error = %err, "agent task aborted");
            }
        }
    }

    fn agent_config(&self) -> AgentConfig {
        let start_delay = match self.config.max_start_delay.as_secs() {
            0 => Duration::ZERO,
            max => Duration::from_secs(rand::thread_rng().gen_range(0..max)),
        };

        AgentConfig {
            host: self.config.host.clone(),
            port: self.config.port,
            username: self.config.username.clone(),
            password: self.config.password.clone(),
            start_delay,
            ttl: self.config.ttl,
            cadence: self.config.cadence,
            interactive: self.config.interactive,
            max_retries: self.config.max_retries,
            script: self.script.clone(),
        }
    }
}

/// Full lifecycle of one agent. Close always runs, whatever the loop did.
async fn drive<C: SshClient>(mut agent: Agent<C>, cancel: &CancellationToken) {
    match agent.connect(cancel).await {
        Ok(()) => {
            debug!(agent = agent.id(), "connected, starting command loop");
            match agent.run(cancel).await {
                Ok(()) => {}
                Err(err) if err.is_graceful() => {
                    debug!(agent = agent.id(), "stopped during shutdown");
                }
                Err(err) => {
                    error!(agent = agent.id(), error = %err, "command loop failed");
                }
            }
        }
        Err(err) if err.is_graceful() => {
            debug!(agent = agent.id(), "cancelled before connecting");
        }
        Err(err) => {
            error!(agent = agent.id(), error = %err, "failed to connect");
        }
    }

    agent.close().await;
}
