use anyhow::{bail, Context, Result};
use log::{error, info, warn};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use glyphguard::prelude::*;

fn main() -> Result<()> {
    // Load environment variables and initialize logging
    dotenv::dotenv().ok();
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting glyphguard v{}", glyphguard::VERSION);

    let config_path = match env::args_os().nth(1) {
        Some(path) => PathBuf::from(path),
        None => match env::var_os("GLYPHGUARD_CONFIG") {
            Some(path) => PathBuf::from(path),
            None => bail!("Usage: glyphguard <config-file> (or set GLYPHGUARD_CONFIG)"),
        },
    };

    let config = FilterConfig::load(&config_path)?;
    for problem in config.validate() {
        warn!("Config problem: {}", problem);
    }

    let filters = config.build_filters()?;
    if filters.is_empty() {
        warn!("No filters configured, every message will pass");
    }

    info!("Reading messages from stdin");
    let stdin = io::stdin();
    let stdout = io::stdout();
    let flagged = scan_messages(&filters, stdin.lock(), stdout.lock())?;

    info!("Done, {} message(s) flagged", flagged);
    Ok(())
}

/// Print the line number and matched phrases of every flagged message.
///
/// A line that is not valid UTF-8 is consumed and skipped; any other read
/// error ends the scan.
fn scan_messages<R: BufRead, W: Write>(filters: &FilterSet, input: R, mut out: W) -> Result<usize> {
    let mut flagged = 0usize;

    for (index, line) in input.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                error!("Skipping message {}: {}", index + 1, e);
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read message {}", index + 1));
            }
        };

        let matched = filters.matching(&line);
        if matched.is_empty() {
            continue;
        }

        flagged += 1;
        let phrases: Vec<&str> = matched.iter().map(|f| f.text()).collect();
        writeln!(out, "{}\t{}", index + 1, phrases.join(", "))
            .context("Failed to write to stdout")?;
    }

    Ok(flagged)
}
