//! Program feed types.
//!
//! The feed is a JSON array of day groups, each listing that day's
//! programs. Field names follow the upstream feed, so most of them are
//! renamed on the way in. Missing and `null` fields decode to their zero
//! value.

use std::io::Read;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::LiveCalResult;

/// Form value marking a live broadcast
pub const LIVE_FORM: &str = "live";

/// One day of the feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramDay {
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(rename = "progs", deserialize_with = "null_as_default")]
    pub programs: Vec<Program>,
}

/// A single scheduled program.
///
/// Field declaration order is the serialization order, which the event id
/// is derived from (see [`crate::uid`]). Do not reorder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Program {
    /// Start time, `YYYY-MM-DD HH:MM:SS` in the feed's local zone
    #[serde(rename = "time_s", deserialize_with = "null_as_default")]
    pub start_time: String,
    #[serde(rename = "time_s_und", deserialize_with = "null_as_default")]
    pub start_time_raw: i64,
    /// End time, same layout as `start_time`
    #[serde(rename = "time_e", deserialize_with = "null_as_default")]
    pub end_time: String,
    #[serde(rename = "time_e_und", deserialize_with = "null_as_default")]
    pub end_time_raw: i64,
    /// Non-zero when the upstream listing hides this entry
    #[serde(rename = "nodisp", deserialize_with = "null_as_default")]
    pub suppressed: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub media: String,
    #[serde(rename = "ttl", deserialize_with = "null_as_default")]
    pub title: String,
    /// Broadcast form: "live", "delayed", ...
    #[serde(deserialize_with = "null_as_default")]
    pub form: String,
    #[serde(rename = "saiho", deserialize_with = "null_as_default")]
    pub match_location: String,
    #[serde(rename = "shutsuen", deserialize_with = "null_as_default")]
    pub venue: String,
    #[serde(rename = "biko", deserialize_with = "null_as_default")]
    pub note: String,
    #[serde(rename = "matchID", deserialize_with = "null_as_default")]
    pub match_id: String,
}

impl Program {
    pub fn is_live(&self) -> bool {
        self.form == LIVE_FORM
    }
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Decode a whole feed from `reader`.
///
/// The input must be a JSON array of day groups; anything else is a
/// decode error and nothing is returned.
pub fn decode_feed<R: Read>(reader: R) -> LiveCalResult<Vec<ProgramDay>> {
    let days = serde_json::from_reader(reader)?;
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LiveCalError;

    #[test]
    fn test_decode_feed_maps_upstream_keys() {
        let input = r#"[{"date":"2024-01-01","progs":[{
            "time_s":"2024-01-01 20:00:00","time_s_und":1704106800,
            "time_e":"2024-01-01 22:00:00","time_e_und":1704114000,
            "nodisp":1,"media":"BS1","ttl":"Match A","form":"live",
            "saiho":"Doha","shutsuen":"Stadium X","biko":"extended","matchID":"m-1"
        }]}]"#;

        let days = decode_feed(input.as_bytes()).unwrap();

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, "2024-01-01");
        let program = &days[0].programs[0];
        assert_eq!(program.start_time, "2024-01-01 20:00:00");
        assert_eq!(program.start_time_raw, 1704106800);
        assert_eq!(program.end_time_raw, 1704114000);
        assert_eq!(program.suppressed, 1);
        assert_eq!(program.media, "BS1");
        assert_eq!(program.title, "Match A");
        assert_eq!(program.match_location, "Doha");
        assert_eq!(program.venue, "Stadium X");
        assert_eq!(program.note, "extended");
        assert_eq!(program.match_id, "m-1");
        assert!(program.is_live());
    }

    #[test]
    fn test_missing_fields_default_to_zero_values() {
        let days = decode_feed(r#"[{"progs":[{"ttl":"Only a title"}]}, {}]"#.as_bytes()).unwrap();

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "");
        assert_eq!(
            days[0].programs[0],
            Program {
                title: "Only a title".to_string(),
                ..Program::default()
            }
        );
        assert!(days[1].programs.is_empty());
    }

    #[test]
    fn test_null_fields_default_to_zero_values() {
        let days = decode_feed(
            r#"[{"date":null,"progs":[{"ttl":"Match A","biko":null,"nodisp":null,"form":"live"}]},
                {"date":"2024-01-02","progs":null}]"#
                .as_bytes(),
        )
        .unwrap();

        assert_eq!(days[0].date, "");
        let program = &days[0].programs[0];
        assert_eq!(program.note, "");
        assert_eq!(program.suppressed, 0);
        assert!(program.is_live());
        assert!(days[1].programs.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let days =
            decode_feed(r#"[{"date":"d","extra":true,"progs":[{"form":"live","x":[1]}]}]"#.as_bytes())
                .unwrap();
        assert!(days[0].programs[0].is_live());
    }

    #[test]
    fn test_only_exact_live_form_counts() {
        for form in ["Live", "live ", "delayed", ""] {
            let program = Program {
                form: form.to_string(),
                ..Program::default()
            };
            assert!(!program.is_live(), "form {form:?} should not be live");
        }
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        let err = decode_feed("[{".as_bytes()).unwrap_err();
        assert!(matches!(err, LiveCalError::Decode(_)));
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        assert!(matches!(
            decode_feed(r#"{"date":"2024-01-01"}"#.as_bytes()),
            Err(LiveCalError::Decode(_))
        ));
        assert!(matches!(
            decode_feed(r#"[{"progs":[{"time_s_und":"soon"}]}]"#.as_bytes()),
            Err(LiveCalError::Decode(_))
        ));
    }
}
