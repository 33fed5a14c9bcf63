//! Core pipeline for livecal.
//!
//! Turns a JSON program feed into an iCalendar document:
//! - `feed` decodes the day-grouped program records
//! - `convert` keeps live broadcasts and maps them to events
//! - `uid` derives content-addressed event ids
//! - `calendar` assembles the in-memory calendar
//! - `ics` generates, normalizes and reads .ics text

pub mod calendar;
pub mod convert;
pub mod error;
pub mod feed;
pub mod ics;
pub mod location;
pub mod uid;

pub use calendar::{Calendar, CalendarEvent, DEFAULT_CALENDAR_NAME};
pub use convert::{live_events, program_to_event};
pub use error::{LiveCalError, LiveCalResult};
pub use feed::{Program, ProgramDay, decode_feed};
pub use location::{DEFAULT_TZID, Location};
pub use uid::program_uid;
