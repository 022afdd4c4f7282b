//! Terminal renderer: prints each batch as it settles.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use serde::Serialize;

use stagewalk_config::TranscriptFormat;
use stagewalk_core::{EdgeLabel, Renderer, Transition, TraversalSummary};
use stagewalk_types::UtilityId;

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Line<'a> {
    Category {
        name: &'a str,
        utilities: &'a [&'a UtilityId],
    },
    Batch {
        pass: &'a str,
        transitions: &'a [Transition<UtilityId, EdgeLabel>],
    },
    Summary {
        pass: &'a str,
        paths: &'a [Vec<UtilityId>],
        visited: usize,
        skipped: usize,
        peak_suppression: u32,
    },
}

/// Writes one line per category and per batch, then sleeps for the settle
/// time so a reader can follow along.
///
/// Write failures don't abort the traversal; the first one is kept and
/// reported by [`TranscriptRenderer::finish`].
pub struct TranscriptRenderer<W: Write> {
    out: W,
    format: TranscriptFormat,
    settle: Duration,
    pass: String,
    error: Option<io::Error>,
}

impl<W: Write> TranscriptRenderer<W> {
    pub fn new(out: W, format: TranscriptFormat, settle: Duration) -> Self {
        Self {
            out,
            format,
            settle,
            pass: "setup".to_owned(),
            error: None,
        }
    }

    /// Label subsequent batches with `pass` and print a header for it.
    pub fn begin_pass(&mut self, pass: &str) {
        pass.clone_into(&mut self.pass);
        if self.format == TranscriptFormat::Text {
            let header = format!("== {pass}");
            self.write_line(&header);
        }
    }

    pub fn summary(&mut self, summary: &TraversalSummary) {
        match self.format {
            TranscriptFormat::Text => {
                let line = format!(
                    "-- {} paths, {} visited, {} skipped, peak suppression {}",
                    summary.completed_paths(),
                    summary.visited(),
                    summary.skipped(),
                    summary.peak_suppression()
                );
                self.write_line(&line);
            }
            TranscriptFormat::Json => {
                let pass = self.pass.clone();
                self.write_json(&Line::Summary {
                    pass: &pass,
                    paths: summary.paths(),
                    visited: summary.visited(),
                    skipped: summary.skipped(),
                    peak_suppression: summary.peak_suppression(),
                });
            }
        }
    }

    /// Flush and surface the first write failure, if any.
    pub fn finish(&mut self) -> io::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = writeln!(self.out, "{line}") {
            tracing::warn!("Transcript write failed: {err}");
            self.error = Some(err);
        }
    }

    fn write_json(&mut self, line: &Line<'_>) {
        match serde_json::to_string(line) {
            Ok(json) => self.write_line(&json),
            Err(err) => tracing::warn!("Failed to encode transcript line: {err}"),
        }
    }
}

impl<W: Write> Renderer for TranscriptRenderer<W> {
    type Node = UtilityId;
    type Edge = EdgeLabel;

    fn create_category(&mut self, name: &str, utilities: &[&UtilityId]) {
        match self.format {
            TranscriptFormat::Text => {
                let ids: Vec<&str> = utilities.iter().map(|id| id.as_str()).collect();
                let line = format!("category {name}: {}", ids.join(" "));
                self.write_line(&line);
            }
            TranscriptFormat::Json => self.write_json(&Line::Category { name, utilities }),
        }
    }

    fn create_node(&mut self, id: &UtilityId) -> UtilityId {
        id.clone()
    }

    fn create_edge(&mut self, source: &UtilityId, target: &UtilityId) -> EdgeLabel {
        EdgeLabel::new(source, target)
    }

    fn apply(&mut self, batch: &[Transition<UtilityId, EdgeLabel>]) {
        match self.format {
            TranscriptFormat::Text => {
                let items: Vec<String> = batch.iter().map(ToString::to_string).collect();
                let line = items.join(", ");
                self.write_line(&line);
            }
            TranscriptFormat::Json => {
                let pass = self.pass.clone();
                self.write_json(&Line::Batch {
                    pass: &pass,
                    transitions: batch,
                });
            }
        }
        if !self.settle.is_zero() {
            thread::sleep(self.settle);
        }
    }
}
