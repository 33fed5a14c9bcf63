//! ICS generation, normalization and reading.
//!
//! This module handles writing and reading .ics documents according to
//! RFC 5545.

mod content_line;
mod generate;
mod normalize;
mod parse;

pub use generate::generate_ics;
pub use normalize::normalize;
pub use parse::parse_calendar;
