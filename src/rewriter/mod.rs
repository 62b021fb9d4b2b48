//! Log rewriting: statistics first, then the log regrouped per component.
//!
//! The input is read twice. The first pass builds the [`CorrelationModel`],
//! whose statistics are written before anything else. The second pass feeds
//! every line to a [`SessionTracker`] and writes each session's buffered
//! lines when the session closes.

pub mod session;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::error::{ReconcileError, Result};
use crate::input::{self, LogLines};
use crate::model::{CorrelationModel, ModelSettings};
use crate::report::render_statistics;

pub use session::{ComponentLogs, LineOutcome, SessionState, SessionTracker};

/// Default chrono format of the execution-start suffix in output names.
pub const DEFAULT_SUFFIX_FORMAT: &str = "%Y%m%d_%H%M%S";

/// What a rewrite should produce.
#[derive(Debug, Clone, Default)]
pub struct RewriteOptions {
    pub settings: ModelSettings,
    /// Write the statistics report only.
    pub stats_only: bool,
}

/// Counters gathered while rewriting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    pub lines_read: usize,
    pub sessions_flushed: usize,
    pub lines_written: usize,
    pub unattributed_lines: usize,
    pub unclosed_sessions: usize,
    pub report_bytes: usize,
    pub input_bytes: u64,
}

/// Writes the statistics of `model`, then (unless `stats_only`) the lines
/// regrouped by session, in session-close order.
pub fn rewrite_lines<I, S, W>(
    model: CorrelationModel,
    lines: I,
    out: &mut W,
    stats_only: bool,
) -> Result<RewriteSummary>
where
    I: IntoIterator<Item = std::io::Result<S>>,
    S: AsRef<[u8]>,
    W: Write,
{
    let report = render_statistics(&model);
    out.write_all(report.as_bytes())?;
    let mut summary = RewriteSummary {
        report_bytes: report.len(),
        ..RewriteSummary::default()
    };
    if stats_only {
        return Ok(summary);
    }

    let mut tracker = SessionTracker::new(model);
    for line in lines {
        let line = line?;
        summary.lines_read += 1;
        let (outcome, flushed) = tracker.feed(line)?;
        if outcome == LineOutcome::Unattributed {
            summary.unattributed_lines += 1;
        }
        if let Some(logs) = flushed {
            summary.sessions_flushed += 1;
            for line in logs.lines() {
                out.write_all(line)?;
                out.write_all(b"\n")?;
                summary.lines_written += 1;
            }
        }
    }

    for logs in tracker.finish() {
        warn!(
            component = logs.component_id(),
            lines = logs.lines().len(),
            "Session never finished, its lines are dropped"
        );
        summary.unclosed_sessions += 1;
    }
    Ok(summary)
}

/// Rewrites an in-memory log. Both passes run over `log`.
pub fn rewrite_str(log: &str, options: &RewriteOptions) -> Result<String> {
    let model = CorrelationModel::build(log.lines(), options.settings.clone())?;
    let mut out = Vec::new();
    rewrite_lines(
        model,
        log.lines().map(Ok::<_, std::io::Error>),
        &mut out,
        options.stats_only,
    )?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// `<dir>/<stem>_<execution start>.<ext>` next to the input log.
pub fn rewritten_path(input: &Path, started: DateTime<Local>, suffix_format: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dbBuilder".to_string());
    let stamp = started.format(suffix_format);
    let name = match input.extension() {
        Some(ext) => format!("{stem}_{stamp}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{stamp}"),
    };
    input.with_file_name(name)
}

/// File-to-file rewriter.
#[derive(Debug, Clone)]
pub struct LogRewriter {
    input: PathBuf,
    output: PathBuf,
    options: RewriteOptions,
}

impl LogRewriter {
    /// Fails with [`ReconcileError::NotAFile`] unless `input` is a regular file,
    /// and with [`ReconcileError::OutputIsInput`] if `output` resolves to it.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, options: RewriteOptions) -> Result<Self> {
        let input = input.into();
        let output = output.into();
        if !input.is_file() {
            return Err(ReconcileError::NotAFile { path: input });
        }
        // The output is truncated before the second pass reads the input.
        if let Ok(resolved) = output.canonicalize() {
            if resolved == input.canonicalize()? {
                return Err(ReconcileError::OutputIsInput { path: output });
            }
        }
        Ok(Self {
            input,
            output,
            options,
        })
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Runs both passes. On failure the partial output file is removed.
    pub fn run(&self) -> Result<RewriteSummary> {
        let result = self.run_inner();
        if result.is_err() && self.output.exists() {
            if let Err(e) = fs::remove_file(&self.output) {
                warn!(path = %self.output.display(), "Failed to remove partial output: {}", e);
            }
        }
        result
    }

    fn run_inner(&self) -> Result<RewriteSummary> {
        info!(path = %self.input.display(), "Building correlation model");
        let model = CorrelationModel::build_from_path(&self.input, self.options.settings.clone())?;

        if let Some(parent) = self.output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut out = BufWriter::new(File::create(&self.output)?);

        info!(path = %self.output.display(), "Rewriting log");
        let mut lines: LogLines<_> = input::open_log(&self.input)?;
        let mut summary = rewrite_lines(model, &mut lines, &mut out, self.options.stats_only)?;
        out.flush()?;

        summary.input_bytes = lines.bytes_read();
        if summary.input_bytes == 0 {
            summary.input_bytes = fs::metadata(&self.input)?.len();
        }
        Ok(summary)
    }
}
