//! Run settings.
//!
//! Layered lowest to highest: built-in defaults, an optional TOML file,
//! `LIVECAL_*` environment variables, then command-line flags.

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use livecal_core::{DEFAULT_CALENDAR_NAME, DEFAULT_TZID};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// IANA zone feed timestamps are read in
    pub tzid: String,
    /// Calendar name, also used as description and PRODID
    pub calname: String,
    /// Run the parse/print pass over the generated document
    pub normalize: bool,
}

/// Values given explicitly on the command line
#[derive(Debug, Default)]
pub struct Overrides {
    pub tzid: Option<String>,
    pub calname: Option<String>,
    pub raw: bool,
}

impl Settings {
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("tzid", DEFAULT_TZID)?
            .set_default("calname", DEFAULT_CALENDAR_NAME)?
            .set_default("normalize", true)?;

        if let Some(path) = file {
            builder = builder.add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(true),
            );
        }

        builder = builder
            .add_source(Environment::with_prefix("LIVECAL").try_parsing(true))
            .set_override_option("tzid", overrides.tzid.clone())?
            .set_override_option("calname", overrides.calname.clone())?;

        if overrides.raw {
            builder = builder.set_override("normalize", false)?;
        }

        builder
            .build()
            .context("Could not load settings")?
            .try_deserialize()
            .context("Invalid settings")
    }
}
