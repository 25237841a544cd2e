use std::time::Duration;

/// Ceiling for the exponential backoff schedule.
const MAX_BACKOFF: Duration = Duration::from_secs(16);

/// Backoff before retry `attempt` (0-based): 1s, 2s, 4s, 8s, then capped at 16s.
pub fn backoff_delay(attempt: u32) -> Duration {
    match 1u64.checked_shl(attempt) {
        Some(secs) => Duration::from_secs(secs).min(MAX_BACKOFF),
        None => MAX_BACKOFF,
    }
}
