mod config;
mod logging;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use livecal_core::ics::{generate_ics, normalize};
use livecal_core::{Calendar, Location, decode_feed, live_events};
use tracing::{debug, error, info};

use crate::config::{Overrides, Settings};

#[derive(Parser)]
#[command(name = "livecal")]
#[command(about = "Read a JSON program feed on stdin and write its live broadcasts as an iCalendar")]
struct Cli {
    /// IANA time zone of the feed's timestamps [default: Asia/Tokyo]
    #[arg(long)]
    tzid: Option<String>,

    /// Calendar name, also used as its description and PRODID
    #[arg(long)]
    calname: Option<String>,

    /// TOML file with tzid / calname / normalize settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the parse/print normalization of the generated document
    #[arg(long)]
    raw: bool,
}

fn main() -> ExitCode {
    if let Err(e) = logging::init() {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let overrides = Overrides {
        tzid: cli.tzid,
        calname: cli.calname,
        raw: cli.raw,
    };
    let settings = Settings::load(cli.config.as_deref(), &overrides)?;
    debug!(?settings, "Resolved settings");

    // Resolve the zone before touching stdin
    let location = Location::load(&settings.tzid)?;

    let days = decode_feed(io::stdin().lock()).context("Could not decode program feed")?;
    let total: usize = days.iter().map(|day| day.programs.len()).sum();

    let events = live_events(&days, &location)?;
    info!(
        days = days.len(),
        programs = total,
        live = events.len(),
        "Mapped live programs"
    );

    let calendar = Calendar::assemble(&settings.calname, &location, events);
    let mut ics = generate_ics(&calendar)?;
    if settings.normalize {
        ics = normalize(&ics)?;
    }

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(ics.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Could not write calendar to stdout")?;

    Ok(())
}
