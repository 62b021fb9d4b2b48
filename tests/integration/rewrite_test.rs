//! Two-pass rewrite over fixture logs

use std::fs;

use wlr::rewriter::rewrite_str;
use wlr::{LogRewriter, ModelSettings, Profile, ReconcileError, RewriteOptions};

use crate::helpers::{load_fixture, temp_fixture};

#[test]
fn rewrite_regroups_sessions_after_report() {
    let (temp_dir, input) = temp_fixture("dbBuilder.log");
    let output = temp_dir.path().join("out").join("rewritten.log");

    let summary = LogRewriter::new(&input, &output, RewriteOptions::default())
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        load_fixture("dbBuilder.rewritten.log")
    );
    assert_eq!(summary.lines_read, 16);
    assert_eq!(summary.sessions_flushed, 2);
    assert_eq!(summary.lines_written, 13);
    assert_eq!(summary.unattributed_lines, 1);
    assert_eq!(summary.unclosed_sessions, 0);
    assert_eq!(summary.input_bytes, fs::metadata(&input).unwrap().len());
}

#[test]
fn every_written_line_comes_from_the_input() {
    let log = load_fixture("dbBuilder.log");
    let output = rewrite_str(&log, &RewriteOptions::default()).unwrap();
    let (_, body) = output
        .split_once("###################################\n\n")
        .unwrap();

    let mut input_lines: Vec<&str> = log.lines().collect();
    for line in body.lines() {
        let pos = input_lines
            .iter()
            .position(|l| *l == line)
            .unwrap_or_else(|| panic!("line not in input: {}", line));
        input_lines.remove(pos);
    }
}

#[test]
fn stats_only_output_is_the_report() {
    let log = load_fixture("dbBuilder.log");
    let options = RewriteOptions {
        stats_only: true,
        ..RewriteOptions::default()
    };
    assert_eq!(
        rewrite_str(&log, &options).unwrap(),
        load_fixture("dbBuilder.report.txt")
    );
}

#[test]
fn purge_sessions_need_purge_profile() {
    let log = load_fixture("purge.log");

    let adjustment = rewrite_str(&log, &RewriteOptions::default()).unwrap();
    assert!(adjustment.ends_with("###################################\n\n"));

    let purge = RewriteOptions {
        settings: ModelSettings::new("fr", Profile::Purge).unwrap(),
        stats_only: false,
    };
    let rewritten = rewrite_str(&log, &purge).unwrap();
    let (_, body) = rewritten
        .split_once("###################################\n\n")
        .unwrap();
    assert_eq!(body, log);
}

#[test]
fn unbalanced_session_is_fatal_and_leaves_no_output() {
    let (temp_dir, input) = temp_fixture("unbalanced.log");
    let output = temp_dir.path().join("rewritten.log");

    let err = LogRewriter::new(&input, &output, RewriteOptions::default())
        .unwrap()
        .run()
        .unwrap_err();

    assert!(matches!(
        err,
        ReconcileError::SessionNotOpen { ref component } if component == "almanach3"
    ));
    assert!(!output.exists());
}
