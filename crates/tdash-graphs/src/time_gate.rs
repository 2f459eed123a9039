//! Hour-window gating of chart visibility in a fixed timezone.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use tdash_common::{Result, TDashError};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock of the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Half-open hour range `[start, end)` on a 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    start: u32,
    end: u32,
}

impl HourWindow {
    /// Panics when the range is empty or runs past midnight; use
    /// [`HourWindow::try_new`] for untrusted input.
    pub const fn new(start: u32, end: u32) -> Self {
        assert!(start < end && end <= 24, "hour window must satisfy start < end <= 24");
        Self { start, end }
    }

    pub fn try_new(start: u32, end: u32) -> Result<Self> {
        if start < end && end <= 24 {
            Ok(Self { start, end })
        } else {
            Err(TDashError::validation(format!(
                "Invalid hour window [{start}, {end})"
            )))
        }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn contains(&self, hour: u32) -> bool {
        self.start <= hour && hour < self.end
    }
}

impl fmt::Display for HourWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", hour_label(self.start), hour_label(self.end))
    }
}

/// `15` -> `"3PM"`, `0` and `24` -> `"12AM"`.
pub fn hour_label(hour: u32) -> String {
    let suffix = if hour % 24 < 12 { "AM" } else { "PM" };
    let twelve = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{twelve}{suffix}")
}

/// Abbreviation of `tz` at `at`, e.g. `IST` for Asia/Kolkata.
pub fn zone_abbreviation(tz: &Tz, at: DateTime<Utc>) -> String {
    at.with_timezone(tz).format("%Z").to_string()
}

/// Decides whether a chart may be shown at a given instant.
#[derive(Debug, Clone)]
pub struct TimeGate {
    timezone: Tz,
    windows: Vec<HourWindow>,
}

impl TimeGate {
    pub fn new(timezone: Tz, windows: &[HourWindow]) -> Self {
        Self {
            timezone,
            windows: windows.to_vec(),
        }
    }

    /// Hour of `now` in the gate's timezone.
    pub fn local_hour(&self, now: DateTime<Utc>) -> u32 {
        now.with_timezone(&self.timezone).hour()
    }

    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        let hour = self.local_hour(now);
        self.windows.iter().any(|window| window.contains(hour))
    }

    pub fn is_open(&self, clock: &dyn Clock) -> bool {
        self.is_open_at(clock.now())
    }

    /// Human phrase for the windows: `"between 3PM and 5PM IST"` for one
    /// window, `"between 3PM-5PM IST and 7AM-11AM IST"` for several.
    pub fn describe(&self, at: DateTime<Utc>) -> String {
        let zone = zone_abbreviation(&self.timezone, at);
        match self.windows.as_slice() {
            [] => "never".to_string(),
            [only] => format!(
                "between {} and {} {zone}",
                hour_label(only.start),
                hour_label(only.end)
            ),
            many => {
                let parts: Vec<String> = many.iter().map(|w| format!("{w} {zone}")).collect();
                format!("between {}", parts.join(" and "))
            }
        }
    }
}
