// statlab/src/commands/compute.rs
//! The `compute` command: one recompute from a JSON payload, no browser.

use anyhow::{bail, Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs;
use std::io::{self, Read, Write};

use statlab_core::{headless_compute, parse_request, Outcome, PageKind, Update};

use crate::cli::ComputeCommand;
use crate::ui::report;

use super::resolve_config;

/// Reads the payload from `--input`, or stdin when it is piped.
fn read_payload(cmd: &ComputeCommand) -> Result<String> {
    if let Some(path) = &cmd.input {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()));
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        debug!("stdin is a terminal; using the seed tables unchanged");
        return Ok(String::new());
    }
    let mut payload = String::new();
    stdin
        .lock()
        .read_to_string(&mut payload)
        .context("Failed to read payload from stdin")?;
    Ok(payload)
}

/// Writes `update` the way `compute` prints it.
pub fn write_update<W: Write>(writer: &mut W, update: &Update, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(update).context("Failed to serialize the update")?;
        writeln!(writer, "{}", text)?;
        return Ok(());
    }
    match &update.outcome {
        Outcome::Analysis(analysis) => {
            writeln!(writer, "{}", analysis.summary)?;
            if let Some(stats) = &analysis.stats {
                writeln!(writer, "{}", report::stats_table(stats))?;
            }
        }
        Outcome::Placeholder { message } => writeln!(writer, "{}", message)?,
        Outcome::Unchanged => writeln!(writer, "Nothing to recompute.")?,
        Outcome::Failed { message, .. } => bail!("{}", message),
    }
    Ok(())
}

/// Runs the `compute` command.
pub fn run_compute(cmd: ComputeCommand) -> Result<()> {
    let config = resolve_config(cmd.settings.config.as_deref(), cmd.settings.overrides())?;
    let page = PageKind::from(cmd.page);
    let request = parse_request(&read_payload(&cmd)?)?;

    info!("Recomputing page '{}'", page);
    let update = headless_compute(page, request, &config);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_update(&mut handle, &update, cmd.json)?;
    handle.flush()?;

    // JSON output is printed in full; the exit status still reports failure.
    if let Outcome::Failed { message, .. } = &update.outcome {
        bail!("{}", message);
    }
    Ok(())
}
