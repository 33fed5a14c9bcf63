//! Content-addressed event ids.
//!
//! An event's UID is the hex SHA-1 of its source program encoded as compact
//! JSON (declared field order, trailing newline). The encoder escapes `<`,
//! `>`, `&`, U+2028 and U+2029 so ids stay stable with the feed tooling that
//! produced earlier calendars.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::Formatter;
use sha1::{Digest, Sha1};

use crate::error::{LiveCalError, LiveCalResult};
use crate::feed::Program;

/// Derive the UID for a program
pub fn program_uid(program: &Program) -> LiveCalResult<String> {
    let encoded = canonical_json(program)?;
    Ok(hex::encode(Sha1::digest(&encoded)))
}

/// The exact bytes the UID is hashed over
pub fn canonical_json(program: &Program) -> LiveCalResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(256);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, HtmlSafeFormatter);
    program
        .serialize(&mut serializer)
        .map_err(|e| LiveCalError::Encode(format!("could not encode program: {e}")))?;
    buf.push(b'\n');
    Ok(buf)
}

/// Compact formatter that escapes HTML-significant characters
struct HtmlSafeFormatter;

impl Formatter for HtmlSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            let escaped = match ch {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..i].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}
