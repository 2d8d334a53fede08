use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signed time remaining until a launch, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Countdown(i64);

impl Countdown {
    pub fn from_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    /// Time from `now` until `target`; negative once `target` has passed.
    pub fn between(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self((target - now).num_seconds())
    }

    pub fn seconds(&self) -> i64 {
        self.0
    }

    pub fn is_elapsed(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Countdown {
    /// Formats as `3d 4h 5m 6s`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let total = self.0.unsigned_abs();
        let days = total / 86_400;
        let hours = (total % 86_400) / 3_600;
        let minutes = (total % 3_600) / 60;
        let seconds = total % 60;
        write!(f, "{}{}d {}h {}m {}s", sign, days, hours, minutes, seconds)
    }
}
