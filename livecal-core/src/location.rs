//! Named time zone used to read feed timestamps.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;

use crate::error::{LiveCalError, LiveCalResult};

pub const DEFAULT_TZID: &str = "Asia/Tokyo";

/// An IANA time zone, resolved once and passed through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    tz: Tz,
}

impl Location {
    /// Look up an IANA zone by name. An empty name means UTC.
    pub fn load(name: &str) -> LiveCalResult<Self> {
        if name.is_empty() {
            return Ok(Self { tz: Tz::UTC });
        }

        let tz = name
            .parse::<Tz>()
            .map_err(|e| LiveCalError::LocationLoad {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { tz })
    }

    /// Canonical IANA name of the zone
    pub fn name(&self) -> &'static str {
        self.tz.name()
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Interpret a wall-clock time in this zone.
    ///
    /// Ambiguous times (DST fold) resolve to the earlier instant. Times that
    /// fall in a DST gap are moved forward by an hour, which keeps the offset
    /// that was in force before the transition.
    pub fn localize(&self, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Some(dt),
            LocalResult::Ambiguous(earliest, _) => Some(earliest),
            LocalResult::None => self
                .tz
                .from_local_datetime(&(naive + TimeDelta::hours(1)))
                .earliest(),
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self {
            tz: chrono_tz::Asia::Tokyo,
        }
    }
}
