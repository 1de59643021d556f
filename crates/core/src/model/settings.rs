use serde::{Deserialize, Serialize};

/// Time-limit presets offered before a quiz starts, in minutes. `0` means no limit.
pub const TIME_LIMIT_PRESETS: [u32; 4] = [0, 45, 60, 180];

/// Per-attempt configuration chosen before the session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSettings {
    time_limit_minutes: Option<u32>,
    negative_marking: bool,
}

impl SessionSettings {
    /// Creates settings. A time limit of `Some(0)` is treated as no limit.
    #[must_use]
    pub fn new(time_limit_minutes: Option<u32>, negative_marking: bool) -> Self {
        Self {
            time_limit_minutes: time_limit_minutes.filter(|minutes| *minutes > 0),
            negative_marking,
        }
    }

    /// No time limit, negative marking off.
    #[must_use]
    pub fn untimed() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_time_limit_minutes(mut self, minutes: u32) -> Self {
        self.time_limit_minutes = Some(minutes).filter(|m| *m > 0);
        self
    }

    #[must_use]
    pub fn with_negative_marking(mut self, enabled: bool) -> Self {
        self.negative_marking = enabled;
        self
    }

    #[must_use]
    pub fn time_limit_minutes(&self) -> Option<u32> {
        self.time_limit_minutes
    }

    /// Time limit expressed in seconds (one tick is one second).
    #[must_use]
    pub fn time_limit_seconds(&self) -> Option<u64> {
        self.time_limit_minutes
            .map(|minutes| u64::from(minutes) * 60)
    }

    #[must_use]
    pub fn negative_marking(&self) -> bool {
        self.negative_marking
    }
}
