//! Live program filtering and event mapping.

use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;

use crate::calendar::CalendarEvent;
use crate::error::{LiveCalError, LiveCalResult};
use crate::feed::{Program, ProgramDay};
use crate::location::Location;
use crate::uid::program_uid;

/// Layout of feed timestamps. Fractional seconds are accepted after `%S`.
pub const TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Digit positions of `YYYY-MM-DD HH:MM:SS`; every field is zero-padded
const FIXED_WIDTH_SHAPE: &[u8; 19] = b"dddd-dd-dd dd:dd:dd";

/// Map every live program, across all days, to an event.
///
/// Source order is kept. Non-live programs are dropped silently; the first
/// program that fails to map aborts the whole conversion.
pub fn live_events(days: &[ProgramDay], location: &Location) -> LiveCalResult<Vec<CalendarEvent>> {
    days.iter()
        .flat_map(|day| day.programs.iter())
        .filter(|program| program.is_live())
        .map(|program| program_to_event(program, location))
        .collect()
}

/// Map a single program to an event in `location`
pub fn program_to_event(program: &Program, location: &Location) -> LiveCalResult<CalendarEvent> {
    let start = parse_local_time(location, "start time", &program.start_time)?;
    let end = parse_local_time(location, "end time", &program.end_time)?;
    let id = program_uid(program)?;

    Ok(CalendarEvent {
        id,
        stamp: start,
        start,
        end,
        summary: program.title.clone(),
        description: program.venue.clone(),
        timezone: location.name().to_string(),
    })
}

fn parse_local_time(
    location: &Location,
    field: &'static str,
    value: &str,
) -> LiveCalResult<DateTime<Tz>> {
    let time_error = |reason: String| LiveCalError::TimeParse {
        field,
        value: value.to_string(),
        reason,
    };

    if !has_fixed_width_fields(value) {
        return Err(time_error(
            "expected zero-padded YYYY-MM-DD HH:MM:SS".to_string(),
        ));
    }

    let naive = NaiveDateTime::parse_from_str(value, TIME_LAYOUT)
        .map_err(|e| time_error(e.to_string()))?;

    location
        .localize(naive)
        .ok_or_else(|| time_error(format!("does not exist in {}", location.name())))
}

/// chrono accepts unpadded fields for `%m`, `%d`, ... so check widths up front
fn has_fixed_width_fields(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() < FIXED_WIDTH_SHAPE.len() {
        return false;
    }

    let (head, fraction) = bytes.split_at(FIXED_WIDTH_SHAPE.len());
    let head_ok = head
        .iter()
        .zip(FIXED_WIDTH_SHAPE)
        .all(|(b, shape)| match shape {
            b'd' => b.is_ascii_digit(),
            _ => b == shape,
        });
    let fraction_ok = match fraction.split_first() {
        None => true,
        Some((b'.', digits)) => !digits.is_empty() && digits.iter().all(u8::is_ascii_digit),
        Some(_) => false,
    };

    head_ok && fraction_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn program(title: &str, form: &str) -> Program {
        Program {
            start_time: "2024-01-01 20:00:00".to_string(),
            end_time: "2024-01-01 22:00:00".to_string(),
            title: title.to_string(),
            form: form.to_string(),
            venue: format!("{title} venue"),
            ..Program::default()
        }
    }

    fn day(programs: Vec<Program>) -> ProgramDay {
        ProgramDay {
            date: "2024-01-01".to_string(),
            programs,
        }
    }

    #[test]
    fn test_program_to_event_maps_fields() {
        let event = program_to_event(&program("Match A", "live"), &Location::default()).unwrap();

        assert_eq!(event.summary, "Match A");
        assert_eq!(event.description, "Match A venue");
        assert_eq!(event.timezone, "Asia/Tokyo");
        assert_eq!(event.stamp, event.start);
        assert_eq!(event.id.len(), 40);
        // 20:00 JST is 11:00 UTC
        assert_eq!(
            event.start.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap()
        );
        assert_eq!(
            event.end.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_times_follow_configured_location() {
        let location = Location::load("UTC").unwrap();
        let event = program_to_event(&program("Match A", "live"), &location).unwrap();

        assert_eq!(event.timezone, "UTC");
        assert_eq!(
            event.start.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 1, 1, 20, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_live_events_keeps_only_live_in_order() {
        let days = vec![
            day(vec![program("A", "live"), program("B", "delayed")]),
            day(vec![]),
            day(vec![program("C", "recorded"), program("D", "live"), program("E", "live")]),
        ];

        let events = live_events(&days, &Location::default()).unwrap();
        let summaries: Vec<_> = events.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(summaries, vec!["A", "D", "E"]);
    }

    #[test]
    fn test_non_live_programs_are_not_parsed() {
        let mut broken = program("B", "delayed");
        broken.start_time = "not a time".to_string();

        let events = live_events(&[day(vec![broken, program("A", "live")])], &Location::default())
            .unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_bad_timestamp_aborts() {
        let mut bad = program("A", "live");
        bad.end_time = "2024/01/01 22:00".to_string();

        let err = live_events(&[day(vec![program("Z", "live"), bad])], &Location::default())
            .unwrap_err();
        match err {
            LiveCalError::TimeParse { field, value, .. } => {
                assert_eq!(field, "end time");
                assert_eq!(value, "2024/01/01 22:00");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fractional_seconds_are_accepted() {
        let mut fractional = program("A", "live");
        fractional.start_time = "2024-01-01 20:00:00.5".to_string();

        let event = program_to_event(&fractional, &Location::load("UTC").unwrap()).unwrap();
        assert_eq!(
            event.start.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 1, 1, 20, 0, 0).unwrap() + chrono::TimeDelta::milliseconds(500)
        );
    }

    #[test]
    fn test_unpadded_fields_are_rejected() {
        for value in [
            "2024-1-01 20:00:00",
            "2024-01-1 20:00:00",
            "2024-01-01 8:00:00",
            "2024-01-01 20:00:00.",
            "2024-01-01 20:00:00Z",
        ] {
            let mut bad = program("A", "live");
            bad.start_time = value.to_string();
            assert!(
                matches!(
                    program_to_event(&bad, &Location::default()),
                    Err(LiveCalError::TimeParse { .. })
                ),
                "{value:?} should not parse"
            );
        }
    }

    #[test]
    fn test_empty_timestamp_is_an_error() {
        let mut bad = program("A", "live");
        bad.start_time.clear();
        assert!(matches!(
            program_to_event(&bad, &Location::default()),
            Err(LiveCalError::TimeParse { field: "start time", .. })
        ));
    }
}
