//! Rewrite command handler

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Local;
use humansize::{format_size, DECIMAL};
use tracing::info;

use wlr::cli::RewriteArgs;
use wlr::rewriter::rewritten_path;
use wlr::{Config, LogRewriter, RewriteOptions};

#[cfg(not(tarpaulin_include))]
pub fn handle(args: RewriteArgs) -> Result<()> {
    let started_at = Local::now();
    let started = Instant::now();

    let config = Config::load()?;
    let options = RewriteOptions {
        settings: super::engine_settings(&config, &args.engine)?,
        stats_only: args.stats_only || config.output.stats_only,
    };
    let output = args
        .output
        .unwrap_or_else(|| rewritten_path(&args.file, started_at, &config.output.suffix_format));

    let rewriter = LogRewriter::new(&args.file, &output, options)?;
    let summary = rewriter
        .run()
        .with_context(|| format!("Failed to rewrite {}", args.file.display()))?;

    info!(
        sessions = summary.sessions_flushed,
        lines = summary.lines_written,
        unattributed = summary.unattributed_lines,
        "Rewrite finished"
    );
    println!("Rewritten log: {}", output.display());
    println!(
        "Processed {} in {}",
        format_size(summary.input_bytes, DECIMAL),
        format_duration(started.elapsed())
    );
    Ok(())
}

/// `H:MM:SS.mmm`
fn format_duration(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    let secs = millis / 1000;
    format!(
        "{}:{:02}:{:02}.{:03}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        millis % 1000
    )
}
