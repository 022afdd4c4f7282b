//! Scenario files driving a full stage setup.

use std::fs;

use stagewalk_config::{ConfigError, ScenarioConfig, ScenarioSource, load_scenario};
use stagewalk_core::{RecordingRenderer, Stage};
use stagewalk_types::{CategorySpec, Direction, RegistryError, RuleError};
use tempfile::TempDir;

use crate::common::path_strings;

fn stage_for(config: &ScenarioConfig) -> Stage<RecordingRenderer> {
    Stage::configure(
        &config.categories,
        config.direction(),
        RecordingRenderer::new(),
    )
    .unwrap()
}

#[test]
fn builtin_scenario_runs_baseline_then_rules() {
    let config = ScenarioConfig::builtin();
    let mut stage = stage_for(&config);
    assert_eq!(stage.graph().direction(), Direction::Undirected);

    let baseline = stage.run_traversal().unwrap();
    assert_eq!(baseline.completed_paths(), 72);

    stage.set_incompatibilities(&config.incompatibilities).unwrap();
    let constrained = stage.run_traversal().unwrap();
    assert_eq!(constrained.completed_paths(), 41);
    assert_eq!(constrained.skipped(), 18);
}

#[test]
fn scenario_file_configures_the_stage() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scenario.toml");
    fs::write(
        &path,
        r#"
directed = true

[[categories]]
name = "Power"
utilities = 2

[[categories]]
name = "Water"
utilities = 1

[[categories]]
name = "Gas"
utilities = 2

[incompatibilities]
Power1 = ["Gas2"]

[playback]
settle_ms = 0
"#,
    )
    .unwrap();

    let (config, source) = load_scenario(Some(path.clone())).unwrap();
    assert_eq!(source, ScenarioSource::File(path));

    let mut stage = stage_for(&config);
    assert_eq!(stage.graph().direction(), Direction::Directed);
    assert_eq!(stage.registry().path_count(), Some(4));

    // Directed: Gas nodes have no onward neighbours.
    assert!(stage.graph().neighbors("Gas1").unwrap().is_empty());
    assert_eq!(stage.graph().neighbors("Water1").unwrap(), ["Gas1", "Gas2"]);

    stage.set_incompatibilities(&config.incompatibilities).unwrap();

    let summary = stage.run_traversal().unwrap();
    assert_eq!(
        path_strings(&summary),
        vec!["Power1 Water1 Gas1", "Power2 Water1 Gas1", "Power2 Water1 Gas2"]
    );
}

#[test]
fn unknown_rule_ids_are_rejected_before_any_run() {
    let mut config = ScenarioConfig::builtin();
    config
        .incompatibilities
        .insert("A1".to_owned(), vec!["Z9".to_owned()]);

    let stage = stage_for(&config);
    let err = stage
        .resolve_incompatibilities(&config.incompatibilities)
        .unwrap_err();
    assert_eq!(
        err,
        RuleError::UnknownExcluded {
            trigger: "A1".to_owned(),
            excluded: "Z9".to_owned(),
        }
    );
    assert!(stage.renderer().batches().count() > 0, "setup still ran");
}

#[test]
fn invalid_categories_fail_configuration() {
    let err = Stage::configure(
        &[CategorySpec::new("A", 2), CategorySpec::new("A", 1)],
        Direction::Undirected,
        RecordingRenderer::new(),
    )
    .err()
    .unwrap();
    assert_eq!(
        err,
        RegistryError::DuplicateCategory {
            name: "A".to_owned()
        }
    );
}

#[test]
fn malformed_scenario_reports_its_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "directed = \"sometimes\"\n").unwrap();

    let err = load_scenario(Some(path.clone())).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert_eq!(err.path(), path);
}
