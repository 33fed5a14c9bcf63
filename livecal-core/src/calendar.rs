//! In-memory calendar model.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::location::Location;

/// Calendar name used when none is configured
pub const DEFAULT_CALENDAR_NAME: &str = "サッカー男子 リオ五輪アジア最終予選";

/// A single timed event
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    /// Content-addressed id (hex SHA-1 of the source program)
    pub id: String,
    /// Creation stamp; the feed has none, so this is the start time
    pub stamp: DateTime<Tz>,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub summary: String,
    pub description: String,
    /// IANA name attached to DTSTART/DTEND
    pub timezone: String,
}

/// A whole calendar document
#[derive(Debug, Clone, PartialEq)]
pub struct Calendar {
    pub product_id: String,
    pub name: String,
    pub description: String,
    pub timezone: String,
    pub events: Vec<CalendarEvent>,
}

impl Calendar {
    /// Build a calendar whose product id, name and description are all `name`.
    pub fn assemble(name: &str, location: &Location, events: Vec<CalendarEvent>) -> Self {
        Calendar {
            product_id: name.to_string(),
            name: name.to_string(),
            description: name.to_string(),
            timezone: location.name().to_string(),
            events,
        }
    }
}
