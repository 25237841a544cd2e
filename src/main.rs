use anyhow::Context;
use clap::Parser;
use dialoguer::{Input, Password};
use sshswarm::script::CommandScript;
use sshswarm::ssh::RusshClient;
use sshswarm::swarm::{spawn_signal_listener, RunConfig, ShutdownController, Swarm};
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// SSH connection swarm for load testing a single remote endpoint.
#[derive(Parser, Debug)]
#[command(name = "sshswarm", version, about)]
struct Cli {
    /// Host to connect to
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Port to connect to
    #[arg(long, default_value_t = 22)]
    port: u16,

    /// Username to connect with
    #[arg(short = 'u', long, default_value = "sshswarm")]
    username: String,

    /// Password to connect with
    #[arg(short = 'p', long, default_value = "")]
    password: String,

    /// Number of connections to make
    #[arg(long, default_value_t = 1)]
    count: usize,

    /// Time to live for each connection, in seconds
    #[arg(long, default_value_t = 60)]
    ttl: u64,

    /// Maximum random delay in seconds before connecting
    #[arg(long = "random-max", default_value_t = 0)]
    random_max: u64,

    /// Commands per minute
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(1..))]
    rate: u32,

    /// Use one interactive TTY session per agent instead of per-command sessions
    #[arg(long = "tty", default_value_t = false)]
    tty: bool,

    /// Log level (debug, info, warn, error)
    #[arg(long = "log-level", default_value = "info")]
    log_level: String,

    /// Script to run on the remote host: a file path or literal commands
    #[arg(long)]
    script: Option<String>,

    /// Maximum connection retry attempts
    #[arg(long = "max-retries", default_value_t = 0)]
    max_retries: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();

    prompt_missing(&mut cli)?;
    init_tracing(&cli.log_level);

    let script = match &cli.script {
        Some(script) => CommandScript::load(script).await?,
        None => CommandScript::default(),
    };

    info!(
        host = %cli.host,
        port = cli.port,
        username = %cli.username,
        count = cli.count,
        ttl = cli.ttl,
        "starting swarm"
    );

    let cadence = NonZeroU32::new(cli.rate).context("rate must be at least 1")?;
    let config = RunConfig {
        host: cli.host,
        port: cli.port,
        username: cli.username,
        password: cli.password,
        count: cli.count,
        ttl: Duration::from_secs(cli.ttl),
        max_start_delay: Duration::from_secs(cli.random_max),
        cadence,
        interactive: cli.tty,
        max_retries: cli.max_retries,
    };

    let shutdown = ShutdownController::new();
    let listener = spawn_signal_listener(shutdown.clone());

    Swarm::new(config, script, RusshClient::new())
        .run(&shutdown.token())
        .await;

    listener.abort();
    info!("all connections closed");

    Ok(())
}

/// Prompt for any identity field the flags left empty.
fn prompt_missing(cli: &mut Cli) -> anyhow::Result<()> {
    if cli.host.is_empty() {
        cli.host = Input::new()
            .with_prompt("Host to connect to")
            .validate_with(|input: &String| {
                if input.is_empty() {
                    Err("Host cannot be empty")
                } else {
                    Ok(())
                }
            })
            .interact_text()
            .context("Failed to read host")?;
    }

    if cli.username.is_empty() {
        cli.username = Input::new()
            .with_prompt("Username to connect with")
            .validate_with(|input: &String| {
                if input.is_empty() {
                    Err("Username cannot be empty")
                } else {
                    Ok(())
                }
            })
            .interact_text()
            .context("Failed to read username")?;
    }

    if cli.password.is_empty() {
        cli.password = Password::new()
            .with_prompt("Password for the SSH connection")
            .interact()
            .context("Failed to read password")?;
    }

    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
