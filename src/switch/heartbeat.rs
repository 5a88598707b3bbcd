use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Inactivity limits are expressed in minutes, capped at 24 hours.
pub const MAX_INACTIVITY_MINUTES: u32 = 1440;

/// Last proof-of-activity plus the configured inactivity limit.
///
/// The limit is shared by the active lock configuration: locking again
/// overwrites it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HeartbeatState {
    pub last_heartbeat: Option<DateTime<Utc>>,
    pub inactivity_limit_minutes: u32,
}

impl HeartbeatState {
    /// Whole minutes elapsed since the last heartbeat, 0 if none recorded.
    pub fn minutes_inactive(&self, now: DateTime<Utc>) -> u32 {
        match self.last_heartbeat {
            None => 0,
            Some(last) => {
                let elapsed = now.signed_duration_since(last);
                if elapsed <= Duration::zero() {
                    0
                } else {
                    (elapsed.num_seconds() / 60) as u32
                }
            }
        }
    }

    pub fn record(&mut self, now: DateTime<Utc>) {
        self.last_heartbeat = Some(now);
    }

    /// Rewind the last heartbeat past the limit (demo/test hook only).
    pub fn rewind_past_limit(&mut self, now: DateTime<Utc>) -> u32 {
        let simulated_minutes = self.inactivity_limit_minutes + 1;
        self.last_heartbeat = Some(now - Duration::minutes(simulated_minutes as i64));
        simulated_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_inactive_never_is_zero() {
        let state = HeartbeatState::default();
        assert_eq!(state.minutes_inactive(Utc::now()), 0);
    }

    #[test]
    fn test_minutes_inactive_floors() {
        let now = Utc::now();
        let state = HeartbeatState {
            last_heartbeat: Some(now - Duration::seconds(179)),
            inactivity_limit_minutes: 5,
        };
        assert_eq!(state.minutes_inactive(now), 2);
    }

    #[test]
    fn test_record_resets_elapsed() {
        let now = Utc::now();
        let mut state = HeartbeatState {
            last_heartbeat: Some(now - Duration::minutes(10)),
            inactivity_limit_minutes: 5,
        };
        state.record(now);
        assert_eq!(state.minutes_inactive(now), 0);
    }

    #[test]
    fn test_rewind_exceeds_limit() {
        let now = Utc::now();
        let mut state = HeartbeatState {
            last_heartbeat: Some(now),
            inactivity_limit_minutes: 5,
        };
        let rewound = state.rewind_past_limit(now);
        assert_eq!(rewound, 6);
        assert_eq!(state.minutes_inactive(now), 6);
    }
}
