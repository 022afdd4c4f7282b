//! Traversals with incompatibility rules: skipping, hide/show batches and
//! the visual state a renderer sees while the walk is in progress.

use stagewalk_core::{RecordingRenderer, Stage};
use stagewalk_types::{CategorySpec, Direction};

use crate::common::{
    ProbeRenderer, path_strings, recording_stage, reference_categories, with_rules,
};

fn reference_rules() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![("A1", vec!["B2", "C1"]), ("B2", vec!["D1", "D2"])]
}

fn two_by_three() -> Vec<CategorySpec> {
    vec![
        CategorySpec::new("A", 2),
        CategorySpec::new("B", 2),
        CategorySpec::new("C", 2),
    ]
}

fn assert_all_visible(renderer: &RecordingRenderer) {
    assert_eq!(renderer.hidden_node_count(), 0);
    assert_eq!(renderer.hidden_edge_count(), 0);
    assert_eq!(renderer.highlighted_count(), 0);
}

#[test]
fn reference_rules_prune_the_walk() {
    let mut stage = recording_stage(&reference_categories(), Direction::Undirected);
    with_rules(&mut stage, &reference_rules());

    let summary = stage.run_traversal().unwrap();
    let paths = path_strings(&summary);

    assert_eq!(summary.completed_paths(), 41);
    assert_eq!(summary.skipped(), 18);
    assert_eq!(summary.peak_suppression(), 1);

    let from_a1 = paths.iter().filter(|p| p.starts_with("A1 ")).count();
    assert_eq!(from_a1, 9);
    for path in &paths {
        if path.starts_with("A1 ") {
            assert!(!path.contains("B2") && !path.contains("C1"), "{path}");
        }
        if path.contains("B2") {
            assert!(path.ends_with("D3"), "{path}");
        }
    }
    assert_all_visible(stage.renderer());
}

#[test]
fn excluded_utilities_are_hidden_while_their_trigger_is_on_the_path() {
    let renderer = ProbeRenderer::new(&["B2", "C1", "D1", "D2"]);
    let mut stage =
        Stage::configure(&reference_categories(), Direction::Directed, renderer).unwrap();
    with_rules(&mut stage, &reference_rules());
    stage.run_traversal().unwrap();

    let mut root = "";
    let mut below_b2 = false;
    for (edge, hidden) in stage.renderer().samples() {
        let (from, _) = edge.split_once('-').unwrap();
        if from.starts_with('A') {
            root = from;
            below_b2 = false;
        }
        if from == "B2" {
            below_b2 = true;
        }

        let expected: &[&str] = if root == "A1" {
            &["B2", "C1"]
        } else if below_b2 {
            &["D1", "D2"]
        } else {
            &[]
        };
        assert_eq!(hidden.as_slice(), expected, "at {edge}");
    }

    let inner = stage.renderer().inner();
    assert_eq!(inner.hidden_node_count(), 0);
    assert_eq!(inner.hidden_edge_count(), 0);
}

#[test]
fn overlapping_exclusions_restore_only_when_the_last_scope_closes() {
    let mut stage = recording_stage(&two_by_three(), Direction::Undirected);
    with_rules(&mut stage, &[("A1", vec!["C1"]), ("B1", vec!["C1"])]);

    let summary = stage.run_traversal().unwrap();
    assert_eq!(
        path_strings(&summary),
        vec!["A1 B1 C2", "A1 B2 C2", "A2 B1 C2", "A2 B2 C1", "A2 B2 C2"]
    );
    assert_eq!(summary.peak_suppression(), 2);

    // B1 under A1 adds a second hold on C1, which changes nothing visible.
    insta::assert_snapshot!(stage.renderer().transcript(), @r"
    hide C1, hide B1-C1, hide B2-C1
    highlight A1-B1
    highlight B1-C2
    unhighlight B1-C2
    unhighlight A1-B1
    highlight A1-B2
    highlight B2-C2
    unhighlight B2-C2
    unhighlight A1-B2
    show C1, show B1-C1, show B2-C1
    highlight A2-B1
    hide C1, hide B1-C1, hide B2-C1
    highlight B1-C2
    unhighlight B1-C2
    show C1, show B1-C1, show B2-C1
    unhighlight A2-B1
    highlight A2-B2
    highlight B2-C1
    unhighlight B2-C1
    highlight B2-C2
    unhighlight B2-C2
    unhighlight A2-B2
    ");
    assert_all_visible(stage.renderer());
}

#[test]
fn edges_follow_both_endpoints() {
    let mut stage = recording_stage(&two_by_three(), Direction::Directed);
    with_rules(&mut stage, &[("A1", vec!["C1"]), ("B1", vec!["B2"])]);

    let summary = stage.run_traversal().unwrap();
    assert_eq!(summary.completed_paths(), 6);
    assert_eq!(summary.skipped(), 2);
    assert_eq!(summary.peak_suppression(), 1);

    let batches: Vec<String> = stage
        .renderer()
        .events()
        .iter()
        .map(ToString::to_string)
        .filter(|line| line.starts_with("hide") || line.starts_with("show"))
        .collect();

    // B2-C1 is already hidden through C1, so B1 under A1 neither hides nor
    // shows it.
    assert_eq!(
        &batches[..3],
        [
            "hide C1, hide B1-C1, hide B2-C1",
            "hide B2, hide A1-B2, hide A2-B2, hide B2-C2",
            "show B2, show A1-B2, show A2-B2, show B2-C2",
        ]
    );
    assert_eq!(batches[3], "show C1, show B1-C1, show B2-C1");

    // Under A2 nothing else holds C1, so B2-C1 goes with B2.
    assert_eq!(
        batches[4],
        "hide B2, hide A1-B2, hide A2-B2, hide B2-C1, hide B2-C2"
    );
    assert_all_visible(stage.renderer());
}

#[test]
fn trigger_excluding_a_whole_category_yields_no_paths_below_it() {
    let categories = [
        CategorySpec::new("A", 2),
        CategorySpec::new("B", 2),
        CategorySpec::new("C", 1),
    ];
    let mut stage = recording_stage(&categories, Direction::Undirected);
    with_rules(&mut stage, &[("A1", vec!["B1", "B2"])]);

    let summary = stage.run_traversal().unwrap();
    assert_eq!(path_strings(&summary), vec!["A2 B1 C1", "A2 B2 C1"]);
    assert_eq!(summary.skipped(), 2);
    assert_all_visible(stage.renderer());
}

#[test]
fn excluding_an_ancestor_does_not_prune_and_settles() {
    let categories = [
        CategorySpec::new("A", 2),
        CategorySpec::new("B", 2),
        CategorySpec::new("C", 1),
    ];
    let mut stage = recording_stage(&categories, Direction::Directed);
    with_rules(&mut stage, &[("B1", vec!["A1"])]);

    let summary = stage.run_traversal().unwrap();
    assert_eq!(summary.completed_paths(), 4);
    assert_eq!(summary.skipped(), 0);

    let first_hide = stage
        .renderer()
        .events()
        .iter()
        .map(ToString::to_string)
        .find(|line| line.starts_with("hide"))
        .unwrap();
    assert_eq!(first_hide, "hide A1, hide A1-B1, hide A1-B2");
    assert_all_visible(stage.renderer());
}

#[test]
fn rules_can_be_replaced_and_cleared_between_runs() {
    let mut stage = recording_stage(&reference_categories(), Direction::Undirected);

    with_rules(&mut stage, &reference_rules());
    assert_eq!(stage.run_traversal().unwrap().completed_paths(), 41);

    with_rules(&mut stage, &[("D3", vec!["A1"])]);
    let summary = stage.run_traversal().unwrap();
    assert_eq!(summary.completed_paths(), 72);
    assert_eq!(summary.skipped(), 0);

    stage.clear_incompatibilities();
    assert!(stage.rules().is_empty());
    let summary = stage.run_traversal().unwrap();
    assert_eq!(summary.completed_paths(), 72);
    assert_eq!(summary.peak_suppression(), 0);
}
