//! Exhaustive enumeration without incompatibility rules.

use stagewalk_core::{RecordedEvent, Transition};
use stagewalk_types::{CategorySpec, Direction};

use crate::common::{path_strings, recording_stage, reference_categories};

#[test]
fn reference_layout_completes_seventy_two_paths() {
    for direction in [Direction::Directed, Direction::Undirected] {
        let mut stage = recording_stage(&reference_categories(), direction);
        let summary = stage.run_traversal().unwrap();
        assert_eq!(summary.completed_paths(), 72, "{direction:?}");
        assert_eq!(Some(summary.completed_paths()), stage.registry().path_count());
        assert_eq!(summary.skipped(), 0);
        assert_eq!(summary.peak_suppression(), 0);
    }
}

#[test]
fn path_count_is_product_of_category_sizes() {
    let layouts: [&[usize]; 4] = [&[1], &[1, 1, 1], &[5, 1, 2], &[2, 3, 2, 1, 2]];
    for sizes in layouts {
        let categories: Vec<CategorySpec> = sizes
            .iter()
            .enumerate()
            .map(|(i, &n)| CategorySpec::new(format!("S{i}x"), n))
            .collect();
        let mut stage = recording_stage(&categories, Direction::Undirected);
        let summary = stage.run_traversal().unwrap();
        assert_eq!(
            summary.completed_paths(),
            sizes.iter().product::<usize>(),
            "{sizes:?}"
        );
    }
}

#[test]
fn paths_are_enumerated_depth_first_in_registry_order() {
    let mut stage = recording_stage(&reference_categories(), Direction::Directed);
    let paths = path_strings(&stage.run_traversal().unwrap());

    assert_eq!(paths[0], "A1 B1 C1 D1");
    assert_eq!(paths[1], "A1 B1 C1 D2");
    assert_eq!(paths[3], "A1 B1 C2 D1");
    assert_eq!(paths[12], "A1 B2 C1 D1");
    assert_eq!(paths[24], "A2 B1 C1 D1");
    assert_eq!(paths[71], "A3 B2 C4 D3");

    let mut sorted = paths.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted, paths, "paths are unique and already in order");
}

#[test]
fn every_visit_below_the_first_stage_highlights_one_edge() {
    let mut stage = recording_stage(&reference_categories(), Direction::Undirected);
    let summary = stage.run_traversal().unwrap();

    let mut highlights = 0;
    let mut unhighlights = 0;
    for batch in stage.renderer().batches() {
        assert_eq!(batch.len(), 1, "highlight batches carry a single edge");
        match &batch[0] {
            Transition::HighlightEdge(_) => highlights += 1,
            Transition::UnhighlightEdge(_) => unhighlights += 1,
            other => panic!("unexpected transition without rules: {other:?}"),
        }
    }

    // A1..A3 are entered without an incoming edge.
    assert_eq!(highlights, summary.visited() - 3);
    assert_eq!(highlights, unhighlights);
    assert_eq!(stage.renderer().highlighted_count(), 0);
}

#[test]
fn highlight_precedes_descent_and_unhighlight_follows_unwind() {
    let mut stage = recording_stage(
        &[
            CategorySpec::new("A", 1),
            CategorySpec::new("B", 1),
            CategorySpec::new("C", 2),
        ],
        Direction::Directed,
    );
    stage.run_traversal().unwrap();
    insta::assert_snapshot!(stage.renderer().transcript(), @r"
    highlight A1-B1
    highlight B1-C1
    unhighlight B1-C1
    highlight B1-C2
    unhighlight B1-C2
    unhighlight A1-B1
    ");
}

#[test]
fn repeated_runs_emit_identical_events() {
    let mut stage = recording_stage(&reference_categories(), Direction::Undirected);

    let first_summary = stage.run_traversal().unwrap();
    let first: Vec<RecordedEvent> = stage.renderer_mut().take_events();
    let second_summary = stage.run_traversal().unwrap();
    let second: Vec<RecordedEvent> = stage.renderer_mut().take_events();

    assert!(!first.is_empty());
    assert_eq!(first, second);
    assert_eq!(first_summary, second_summary);
}

#[test]
fn direction_does_not_change_the_walk() {
    let mut directed = recording_stage(&reference_categories(), Direction::Directed);
    let mut undirected = recording_stage(&reference_categories(), Direction::Undirected);

    let a = directed.run_traversal().unwrap();
    let b = undirected.run_traversal().unwrap();

    assert_eq!(a, b);
    assert_eq!(
        directed.renderer().transcript(),
        undirected.renderer().transcript()
    );
}

#[test]
fn single_category_has_no_edges_to_highlight() {
    let mut stage = recording_stage(&[CategorySpec::new("Solo", 3)], Direction::Directed);
    let summary = stage.run_traversal().unwrap();
    assert_eq!(path_strings(&summary), vec!["Solo1", "Solo2", "Solo3"]);
    assert!(stage.renderer().events().is_empty());
}
