use std::fmt::{self, Display, Formatter};

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Where an election sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleStage {
    NotStarted,
    Active,
    Ended,
}

impl Display for LifecycleStage {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            LifecycleStage::NotStarted => "not-started",
            LifecycleStage::Active => "active",
            LifecycleStage::Ended => "ended",
        })
    }
}

/// Time left until the target instant, broken into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    /// Break a millisecond count into units, truncating sub-second
    /// precision. Negative counts clamp to zero.
    pub fn from_millis(millis: i64) -> Self {
        let millis = millis.max(0);
        Self {
            days: millis / 86_400_000,
            hours: (millis / 3_600_000) % 24,
            minutes: (millis / 60_000) % 60,
            seconds: (millis / 1_000) % 60,
        }
    }
}

impl Display for Countdown {
    /// Renders e.g. `2d 0h 0m 0s`. A unit appears once it is non-zero or a
    /// larger unit appears; seconds always appear.
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        if self.days > 0 {
            write!(formatter, "{}d ", self.days)?;
        }
        if self.hours > 0 || self.days > 0 {
            write!(formatter, "{}h ", self.hours)?;
        }
        if self.minutes > 0 || self.hours > 0 || self.days > 0 {
            write!(formatter, "{}m ", self.minutes)?;
        }
        write!(formatter, "{}s", self.seconds)
    }
}

/// A point-in-time view of an election's lifecycle, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub stage: LifecycleStage,
    /// `None` once the target instant has passed.
    pub remaining: Option<Countdown>,
    pub display: String,
}

impl StatusReport {
    /// Build a report from the activation flag and the signed time left
    /// until the target instant.
    pub fn from_remaining(is_active: bool, until_target: Duration) -> Self {
        let millis = until_target.num_milliseconds();
        if millis <= 0 {
            return if is_active {
                Self {
                    stage: LifecycleStage::Ended,
                    remaining: None,
                    display: "Election has ended".to_string(),
                }
            } else {
                // An overdue opening is transitional: the record stays
                // not-started until an admin activates it.
                Self {
                    stage: LifecycleStage::NotStarted,
                    remaining: None,
                    display: "Election ready to activate".to_string(),
                }
            };
        }
        let remaining = Countdown::from_millis(millis);
        Self {
            stage: if is_active {
                LifecycleStage::Active
            } else {
                LifecycleStage::NotStarted
            },
            remaining: Some(remaining),
            display: remaining.to_string(),
        }
    }
}
