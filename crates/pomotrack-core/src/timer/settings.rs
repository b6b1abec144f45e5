use serde::{Deserialize, Serialize};

use super::kind::IntervalKind;
use crate::error::ConfigError;

/// Upper bounds accepted from user input, in minutes (interval for the cadence).
pub const MAX_WORK_MINUTES: u32 = 60;
pub const MAX_SHORT_BREAK_MINUTES: u32 = 30;
pub const MAX_LONG_BREAK_MINUTES: u32 = 60;
pub const MAX_LONG_BREAK_INTERVAL: u32 = 10;

/// Timer settings.
///
/// Durations are whole minutes. Every `long_break_interval`-th completed
/// work interval is followed by a long break instead of a short one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_work")]
    pub work: u32,
    #[serde(default = "default_short_break")]
    pub short_break: u32,
    #[serde(default = "default_long_break")]
    pub long_break: u32,
    #[serde(default)]
    pub auto_start_breaks: bool,
    #[serde(default)]
    pub auto_start_pomodoros: bool,
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
}

fn default_work() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_long_break_interval() -> u32 {
    4
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work: default_work(),
            short_break: default_short_break(),
            long_break: default_long_break(),
            auto_start_breaks: false,
            auto_start_pomodoros: false,
            long_break_interval: default_long_break_interval(),
        }
    }
}

impl Settings {
    pub fn duration_minutes(&self, kind: IntervalKind) -> u32 {
        match kind {
            IntervalKind::Work => self.work,
            IntervalKind::ShortBreak => self.short_break,
            IntervalKind::LongBreak => self.long_break,
        }
    }

    /// Full length of an interval of `kind`, in seconds.
    pub fn duration_secs(&self, kind: IntervalKind) -> u64 {
        u64::from(self.duration_minutes(kind)).saturating_mul(60)
    }

    /// Whether the interval following a finished `kind` starts on its own.
    pub fn auto_starts_after(&self, finished: IntervalKind) -> bool {
        match finished {
            IntervalKind::Work => self.auto_start_breaks,
            IntervalKind::ShortBreak | IntervalKind::LongBreak => self.auto_start_pomodoros,
        }
    }

    /// Check every field against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("work", self.work, MAX_WORK_MINUTES)?;
        check_range("short_break", self.short_break, MAX_SHORT_BREAK_MINUTES)?;
        check_range("long_break", self.long_break, MAX_LONG_BREAK_MINUTES)?;
        check_range(
            "long_break_interval",
            self.long_break_interval,
            MAX_LONG_BREAK_INTERVAL,
        )?;
        Ok(())
    }
}

fn check_range(key: &str, value: u32, max: u32) -> Result<(), ConfigError> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            key,
            format!("{value} is outside the accepted range 1..={max}"),
        ))
    }
}
