//! stagewalk CLI - loads a scenario and prints its traversals.
//!
//! # Flow
//!
//! ```text
//! main() -> load_scenario() -> Stage::configure(TranscriptRenderer)
//!                                   |
//!                                   v
//!                  baseline pass (no rules) -> pass with rules (if any)
//! ```
//!
//! The transcript goes to stdout. Logs go to `~/.stagewalk/logs/stagewalk.log`
//! (or `./.stagewalk/logs/`) so they never interleave with it; `RUST_LOG`
//! controls the filter.

mod transcript;

use anyhow::{Context, Result};
use std::{
    env,
    fs::{self, OpenOptions},
    io::{self, stdout},
    path::PathBuf,
    sync::Mutex,
};
use tracing_subscriber::{EnvFilter, fmt, fmt::writer::BoxMakeWriter, prelude::*};

use stagewalk_config::{ScenarioSource, load_scenario, log_file_candidates};
use stagewalk_core::Stage;

use crate::transcript::TranscriptRenderer;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let mut warnings = Vec::new();

    // Stdout carries the transcript, so without a log file logs go to stderr.
    let (writer, ansi, log_path) = match open_log_file(&mut warnings) {
        Some((path, file)) => (BoxMakeWriter::new(Mutex::new(file)), false, Some(path)),
        None => (BoxMakeWriter::new(io::stderr), true, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(ansi).with_writer(writer))
        .with(filter)
        .init();

    if let Some(path) = log_path {
        tracing::info!(path = %path.display(), "Logging initialized");
    }
    for warning in warnings {
        tracing::warn!("{warning}");
    }
}

/// First log file candidate that can be opened for append.
fn open_log_file(warnings: &mut Vec<String>) -> Option<(PathBuf, fs::File)> {
    log_file_candidates().into_iter().find_map(|path| {
        let opened = path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|()| OpenOptions::new().create(true).append(true).open(&path));
        match opened {
            Ok(file) => Some((path, file)),
            Err(e) => {
                warnings.push(format!("Cannot log to {}: {e}", path.display()));
                None
            }
        }
    })
}

fn run_pass<W: io::Write>(stage: &mut Stage<TranscriptRenderer<W>>, pass: &str) -> Result<()> {
    stage.renderer_mut().begin_pass(pass);
    let summary = stage
        .run_traversal()
        .with_context(|| format!("{pass} traversal failed"))?;
    stage.renderer_mut().summary(&summary);
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();

    let explicit = env::args_os().nth(1).map(PathBuf::from);
    let (scenario, source) = load_scenario(explicit).context("failed to load scenario")?;
    match &source {
        ScenarioSource::File(path) => {
            tracing::info!(path = %path.display(), "Scenario loaded");
        }
        ScenarioSource::BuiltIn => tracing::info!("Using built-in scenario"),
    }

    let renderer = TranscriptRenderer::new(
        stdout().lock(),
        scenario.playback.format,
        scenario.playback.settle(),
    );
    let mut stage = Stage::configure(&scenario.categories, scenario.direction(), renderer)
        .context("invalid scenario categories")?;

    // Bad rule ids fail here, before the first pass.
    let has_rules = !stage
        .resolve_incompatibilities(&scenario.incompatibilities)
        .context("invalid incompatibility rules")?
        .is_empty();

    run_pass(&mut stage, "baseline")?;

    if has_rules {
        stage
            .set_incompatibilities(&scenario.incompatibilities)
            .context("invalid incompatibility rules")?;
        run_pass(&mut stage, "with incompatibilities")?;
    }

    stage
        .renderer_mut()
        .finish()
        .context("failed to write transcript")?;
    Ok(())
}
