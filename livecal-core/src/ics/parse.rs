//! Reading .ics documents back into the calendar model.

use chrono::{DateTime, NaiveTime};
use chrono_tz::Tz;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};

use super::content_line::{property_name, property_value, unescape_text};
use crate::calendar::{Calendar, CalendarEvent};
use crate::error::{LiveCalError, LiveCalResult};
use crate::location::Location;

/// Parse an .ics document into a Calendar.
///
/// Floating and all-day times are read in the calendar's X-WR-TIMEZONE
/// (UTC when absent).
pub fn parse_calendar(content: &str) -> LiveCalResult<Calendar> {
    let unfolded = unfold(content);
    let parsed = read_calendar(&unfolded).map_err(|e| LiveCalError::IcsParse(e.to_string()))?;

    let timezone = calendar_property(&unfolded, "X-WR-TIMEZONE").unwrap_or_default();
    let location = Location::load(&timezone)?;

    let mut vevents = Vec::new();
    collect_vevents(&parsed.components, &mut vevents);
    let events = vevents
        .into_iter()
        .map(|vevent| parse_event(vevent, &location))
        .collect::<LiveCalResult<Vec<_>>>()?;

    Ok(Calendar {
        product_id: calendar_property(&unfolded, "PRODID").unwrap_or_default(),
        name: calendar_property(&unfolded, "X-WR-CALNAME").unwrap_or_default(),
        description: calendar_property(&unfolded, "X-WR-CALDESC").unwrap_or_default(),
        timezone: location.name().to_string(),
        events,
    })
}

fn collect_vevents<'a, 'b>(components: &'b [Component<'a>], out: &mut Vec<&'b Component<'a>>) {
    for component in components {
        if component.name == "VEVENT" {
            out.push(component);
        } else {
            collect_vevents(&component.components, out);
        }
    }
}

fn parse_event(vevent: &Component, location: &Location) -> LiveCalResult<CalendarEvent> {
    let uid = vevent
        .find_prop("UID")
        .map(|p| p.val.to_string())
        .ok_or_else(|| LiveCalError::IcsParse("VEVENT without UID".to_string()))?;

    let start = required_time(vevent, "DTSTART", location)?;
    let end = required_time(vevent, "DTEND", location)?;
    let stamp = match vevent.find_prop("DTSTAMP") {
        Some(prop) => to_zoned(prop, location)?.with_timezone(&start.timezone()),
        None => start,
    };

    // The parser has already unescaped TEXT values
    let text = |name: &str| {
        vevent
            .find_prop(name)
            .map(|p| p.val.to_string())
            .unwrap_or_default()
    };

    Ok(CalendarEvent {
        id: uid,
        stamp,
        start,
        end,
        summary: text("SUMMARY"),
        description: text("DESCRIPTION"),
        timezone: start.timezone().name().to_string(),
    })
}

fn required_time(vevent: &Component, name: &str, location: &Location) -> LiveCalResult<DateTime<Tz>> {
    let prop = vevent
        .find_prop(name)
        .ok_or_else(|| LiveCalError::IcsParse(format!("VEVENT without {name}")))?;
    to_zoned(prop, location)
}

/// Resolve a date/date-time property to an instant in its own zone
fn to_zoned(prop: &Property, location: &Location) -> LiveCalResult<DateTime<Tz>> {
    let invalid = || {
        LiveCalError::IcsParse(format!(
            "invalid {} value '{}'",
            prop.name.as_ref(),
            prop.val.as_ref()
        ))
    };

    let dpt = DatePerhapsTime::try_from(prop).map_err(|_| invalid())?;
    match dpt {
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => Ok(dt.with_timezone(&Tz::UTC)),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            Location::load(&tzid)?.localize(date_time).ok_or_else(invalid)
        }
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => {
            location.localize(naive).ok_or_else(invalid)
        }
        DatePerhapsTime::Date(date) => location
            .localize(date.and_time(NaiveTime::MIN))
            .ok_or_else(invalid),
    }
}

/// Value of a property set directly on the VCALENDAR
fn calendar_property(unfolded: &str, name: &str) -> Option<String> {
    let mut depth = 0usize;
    for line in unfolded.lines() {
        match property_name(line) {
            "BEGIN" => depth += 1,
            "END" => depth = depth.saturating_sub(1),
            prop if depth == 1 && prop.eq_ignore_ascii_case(name) => {
                return property_value(line).map(unescape_text);
            }
            _ => {}
        }
    }
    None
}
