use chrono::{DateTime, Utc};

use crate::switch::heartbeat::HeartbeatState;

/// Outcome of one watchdog evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchdogVerdict {
    /// Disconnected session or no heartbeat recorded: nothing to evaluate.
    Idle,
    /// Elapsed time is still under the limit.
    Active { minutes_inactive: u32 },
    /// Elapsed time reached the limit; the transfer executor must run.
    /// Exactly-equal elapsed and limit counts as expired.
    Expired { minutes_inactive: u32 },
}

/// Pure evaluation of the inactivity condition.
///
/// The caller runs this on every tick; firing the transfer exactly once
/// per expiry falls out of the executor being idempotent per asset.
pub fn evaluate(
    connected: bool,
    heartbeat: &HeartbeatState,
    now: DateTime<Utc>,
) -> WatchdogVerdict {
    if !connected || heartbeat.last_heartbeat.is_none() {
        return WatchdogVerdict::Idle;
    }

    let minutes_inactive = heartbeat.minutes_inactive(now);
    if minutes_inactive >= heartbeat.inactivity_limit_minutes {
        WatchdogVerdict::Expired { minutes_inactive }
    } else {
        WatchdogVerdict::Active { minutes_inactive }
    }
}
