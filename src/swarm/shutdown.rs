use parking_lot::RwLock;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// Two-stage shutdown: the first interrupt starts a cooperative grace
/// period, the second abandons it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownState {
    Running,
    GracePeriod,
    ForcedExit,
}

impl ShutdownState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ShutdownState::ForcedExit)
    }
}

/// Owns the run-wide cancellation token and the interrupt state machine.
///
/// Agents hold clones of the token and only ever observe it; the controller
/// is the single place that cancels.
#[derive(Clone)]
pub struct ShutdownController {
    state: Arc<RwLock<ShutdownState>>,
    cancel: CancellationToken,
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownController {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(ShutdownState::Running)),
            cancel: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> ShutdownState {
        *self.state.read()
    }

    /// Token observed by every agent in the run.
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Advance the machine one step for an external interrupt and return the
    /// state entered. Running -> GracePeriod signals the token; GracePeriod ->
    /// ForcedExit is terminal and absorbs any further interrupts.
    pub fn interrupt(&self) -> ShutdownState {
        let mut state = self.state.write();

        let next = match *state {
            ShutdownState::Running => {
                self.cancel.cancel();
                ShutdownState::GracePeriod
            }
            ShutdownState::GracePeriod | ShutdownState::ForcedExit => ShutdownState::ForcedExit,
        };

        *state = next;
        next
    }
}

/// Listen for Ctrl+C and feed interrupts to the controller. Entering
/// ForcedExit terminates the process immediately, bypassing all cleanup.
pub fn spawn_signal_listener(controller: ShutdownController) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }

            match controller.interrupt() {
                ShutdownState::GracePeriod => {
                    warn!("interrupt received, shutting down gracefully (interrupt again to force)");
                }
                ShutdownState::ForcedExit => {
                    error!("second interrupt received, forcing exit");
                    std::process::exit(130);
                }
                ShutdownState::Running => {}
            }
        }
    })
}
