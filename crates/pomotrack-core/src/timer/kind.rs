use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// The three interval kinds a session cycles through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntervalKind {
    #[default]
    Work,
    ShortBreak,
    LongBreak,
}

impl IntervalKind {
    pub const ALL: [IntervalKind; 3] = [
        IntervalKind::Work,
        IntervalKind::ShortBreak,
        IntervalKind::LongBreak,
    ];

    pub fn is_break(&self) -> bool {
        !matches!(self, IntervalKind::Work)
    }

    /// Machine name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalKind::Work => "work",
            IntervalKind::ShortBreak => "short-break",
            IntervalKind::LongBreak => "long-break",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IntervalKind::Work => "Work",
            IntervalKind::ShortBreak => "Short Break",
            IntervalKind::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for IntervalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IntervalKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" | "pomodoro" => Ok(IntervalKind::Work),
            "short-break" | "short_break" | "short" => Ok(IntervalKind::ShortBreak),
            "long-break" | "long_break" | "long" => Ok(IntervalKind::LongBreak),
            other => Err(ValidationError::InvalidValue {
                field: "kind".into(),
                message: format!("unknown interval kind '{other}'"),
            }),
        }
    }
}

/// Render a second count as `mm:ss`.
///
/// Minutes are not wrapped at 60, so 3600 seconds renders as `60:00`.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
