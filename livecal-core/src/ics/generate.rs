//! ICS document generation.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use icalendar::{Component, EventLike, Property};

use super::content_line::{escape_text, fold_line};
use crate::calendar::{Calendar, CalendarEvent};
use crate::error::{LiveCalError, LiveCalResult};

/// Generate a complete .ics document for a calendar
pub fn generate_ics(calendar: &Calendar) -> LiveCalResult<String> {
    let mut cal = icalendar::Calendar::new();
    cal.append_property(Property::new("X-WR-CALNAME", calendar.name.as_str()));
    cal.append_property(Property::new("X-WR-CALDESC", calendar.description.as_str()));
    cal.append_property(Property::new("X-WR-TIMEZONE", calendar.timezone.as_str()));

    for event in &calendar.events {
        cal.push(to_ics_event(event));
    }
    let cal = cal.done();

    let mut rendered = String::new();
    write!(rendered, "{cal}")
        .map_err(|e| LiveCalError::Encode(format!("could not render calendar: {e}")))?;

    set_product_id(&rendered, &calendar.product_id)
}

fn to_ics_event(event: &CalendarEvent) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.id);
    ics_event.add_property("DTSTAMP", format_utc(&event.stamp));
    add_zoned_property(&mut ics_event, "DTSTART", &event.start, &event.timezone);
    add_zoned_property(&mut ics_event, "DTEND", &event.end, &event.timezone);
    ics_event.summary(&event.summary);
    ics_event.description(&event.description);
    ics_event.done()
}

/// DTSTAMP must be UTC
fn format_utc(dt: &DateTime<Tz>) -> String {
    dt.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ").to_string()
}

/// Add a local datetime property with a TZID parameter
fn add_zoned_property(ics_event: &mut icalendar::Event, name: &str, dt: &DateTime<Tz>, tzid: &str) {
    let mut prop = Property::new(name, dt.format("%Y%m%dT%H%M%S").to_string());
    prop.add_parameter("TZID", tzid);
    ics_event.append_property(prop);
}

/// Replace the icalendar crate's PRODID with ours, placed right after VERSION
fn set_product_id(ics: &str, product_id: &str) -> LiveCalResult<String> {
    let product_line = fold_line(&format!("PRODID:{}", escape_text(product_id)));
    let mut result = String::with_capacity(ics.len() + product_line.len());
    let mut inserted = false;
    let mut skipping = false;

    for line in ics.lines() {
        if skipping && line.starts_with(' ') {
            continue;
        }
        skipping = false;

        if line.starts_with("PRODID:") || line.starts_with("PRODID;") {
            skipping = true;
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");

        if !inserted && line.starts_with("VERSION:") {
            result.push_str(&product_line);
            result.push_str("\r\n");
            inserted = true;
        }
    }

    if !inserted {
        return Err(LiveCalError::Encode(
            "rendered calendar has no VERSION line".to_string(),
        ));
    }

    Ok(result)
}
