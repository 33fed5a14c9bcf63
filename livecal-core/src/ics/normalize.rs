//! Parse-then-print normalization of .ics documents.
//!
//! The document is unfolded, checked by the icalendar parser, and printed
//! back line by line: CRLF endings, 75-octet folding, blank lines dropped.
//! BEGIN/END pairs must balance for printing to succeed.

use std::fmt::Write;

use icalendar::parser::{read_calendar, unfold};

use super::content_line::{fold_line, property_name, property_value};
use crate::error::{LiveCalError, LiveCalResult};

/// Normalize an .ics document
pub fn normalize(content: &str) -> LiveCalResult<String> {
    let unfolded = unfold(content);
    read_calendar(&unfolded).map_err(|e| LiveCalError::IcsParse(e.to_string()))?;

    print_lines(&unfolded)
}

fn print_lines(unfolded: &str) -> LiveCalResult<String> {
    let mut out = String::with_capacity(unfolded.len() + unfolded.len() / 25);
    let mut open: Vec<&str> = Vec::new();

    for line in unfolded.lines().filter(|l| !l.trim().is_empty()) {
        let value = property_value(line)
            .ok_or_else(|| LiveCalError::IcsPrint(format!("content line without value: {line}")))?;

        match property_name(line) {
            "BEGIN" => open.push(value),
            "END" => match open.pop() {
                Some(name) if name == value => {}
                Some(name) => {
                    return Err(LiveCalError::IcsPrint(format!(
                        "END:{value} closes BEGIN:{name}"
                    )));
                }
                None => {
                    return Err(LiveCalError::IcsPrint(format!("END:{value} without BEGIN")));
                }
            },
            _ if open.is_empty() => {
                return Err(LiveCalError::IcsPrint(format!(
                    "property outside of a component: {line}"
                )));
            }
            _ => {}
        }

        write!(out, "{}\r\n", fold_line(line)).map_err(|e| LiveCalError::IcsPrint(e.to_string()))?;
    }

    if let Some(name) = open.pop() {
        return Err(LiveCalError::IcsPrint(format!("BEGIN:{name} is never closed")));
    }

    Ok(out)
}
