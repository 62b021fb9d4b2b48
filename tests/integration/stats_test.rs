//! Statistics report over the fixture log

use wlr::{render_statistics, CorrelationModel, ModelSettings, Profile, StatisticsSummary};

use crate::helpers::{fixtures_dir, load_fixture, run_wlr, temp_fixture};

fn fixture_model() -> CorrelationModel {
    CorrelationModel::build_from_path(
        &fixtures_dir().join("dbBuilder.log"),
        ModelSettings::default(),
    )
    .unwrap()
}

#[test]
fn report_matches_expected_layout() {
    let report = render_statistics(&fixture_model());
    assert_eq!(report, load_fixture("dbBuilder.report.txt"));
}

#[test]
fn report_is_deterministic() {
    let first = render_statistics(&fixture_model());
    let second = render_statistics(&fixture_model());
    assert_eq!(first, second);
}

#[test]
fn summary_counts() {
    let summary = StatisticsSummary::from_model(&fixture_model());
    assert_eq!(summary.components, 2);
    assert_eq!(summary.simpledoc_deletions, 1);
    assert_eq!(summary.shared_basenames, vec!["10wysiwyg".to_string()]);
    assert_eq!(summary.components_with_potential_losses, 1);
    assert_eq!(summary.basenames_with_potential_losses, 2);
    assert_eq!(summary.merged.components, 2);
    assert_eq!(summary.renamed.names, 1);
}

#[test]
fn purge_profile_registers_purge_sessions() {
    let settings = ModelSettings::new("fr", Profile::Purge).unwrap();
    let model =
        CorrelationModel::build_from_path(&fixtures_dir().join("purge.log"), settings).unwrap();
    assert_eq!(model.components().iter().collect::<Vec<_>>(), vec!["blog4"]);
    assert!(model.is_deleted("simpledoc_3"));
}

#[test]
fn stats_command_prints_report() {
    let (temp_dir, path) = temp_fixture("dbBuilder.log");
    let (stdout, _stderr, exit_code) = run_wlr(&temp_dir, &["stats", path.to_str().unwrap()]);

    assert_eq!(exit_code, 0);
    assert_eq!(stdout, load_fixture("dbBuilder.report.txt"));
}

#[test]
fn stats_command_json() {
    let (temp_dir, path) = temp_fixture("dbBuilder.log");
    let (stdout, _stderr, exit_code) =
        run_wlr(&temp_dir, &["stats", "--json", path.to_str().unwrap()]);

    assert_eq!(exit_code, 0);
    insta::assert_snapshot!("stats_json", stdout);
}
