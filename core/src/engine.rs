//! Depth-first traversal with scoped suppression.
//!
//! The walk recurses over `(stage, previous utility)`. Utilities that are
//! suppressed when their turn comes are skipped outright, so they neither
//! render nor contribute paths. A trigger's exclusions are held for exactly
//! the duration of its subtree.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use stagewalk_types::{
    AdjacencyGraph, ConnectionIndex, GraphError, IncompatibilityMap, UtilityId, UtilityIndex,
};

use crate::ledger::{LedgerError, SuppressionLedger};
use crate::render::{Batch, Renderer, Scene, Transition};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraversalError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("suppression ledger not settled after traversal ({open_scopes} scopes still open)")]
    Unsettled { open_scopes: usize },
}

/// What one run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TraversalSummary {
    paths: Vec<Vec<UtilityId>>,
    visited: usize,
    skipped: usize,
    peak_suppression: u32,
}

impl TraversalSummary {
    /// Every completed root-to-leaf path, in traversal order.
    #[must_use]
    pub fn paths(&self) -> &[Vec<UtilityId>] {
        &self.paths
    }

    #[must_use]
    pub fn completed_paths(&self) -> usize {
        self.paths.len()
    }

    /// Utilities entered (highlighted and recursed into), counting repeats.
    #[must_use]
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Utilities passed over because they were suppressed at their turn.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Highest reference count any utility reached during the run.
    #[must_use]
    pub fn peak_suppression(&self) -> u32 {
        self.peak_suppression
    }
}

pub(crate) struct TraversalEngine<'a, R: Renderer> {
    graph: &'a AdjacencyGraph,
    rules: &'a IncompatibilityMap,
    scene: &'a mut Scene<R>,
    ledger: SuppressionLedger,
    path: Vec<UtilityIndex>,
    summary: TraversalSummary,
}

impl<'a, R: Renderer> TraversalEngine<'a, R> {
    pub(crate) fn new(
        graph: &'a AdjacencyGraph,
        rules: &'a IncompatibilityMap,
        scene: &'a mut Scene<R>,
    ) -> Self {
        Self {
            graph,
            rules,
            scene,
            ledger: SuppressionLedger::new(graph.registry().utility_count()),
            path: Vec::with_capacity(graph.registry().stage_count()),
            summary: TraversalSummary::default(),
        }
    }

    pub(crate) fn run(mut self) -> Result<TraversalSummary, TraversalError> {
        self.step(0, None)?;

        if !self.ledger.is_settled() {
            return Err(TraversalError::Unsettled {
                open_scopes: self.ledger.open_scopes(),
            });
        }
        self.summary.peak_suppression = self.ledger.peak();
        Ok(self.summary)
    }

    fn step(&mut self, stage: usize, previous: Option<UtilityIndex>) -> Result<(), TraversalError> {
        let graph = self.graph;
        let registry = graph.registry();

        let Some(category) = registry.category(stage) else {
            let path = self.path.iter().map(|&u| registry.id(u).clone()).collect();
            self.summary.paths.push(path);
            return Ok(());
        };

        for &utility in category.utilities() {
            let id = registry.id(utility);
            if self.ledger.is_active(utility) {
                tracing::trace!(
                    utility = %id,
                    count = self.ledger.count(utility),
                    "Skipping suppressed utility"
                );
                self.summary.skipped += 1;
                continue;
            }

            tracing::debug!(utility = %id, stage, "Visiting utility");
            self.summary.visited += 1;

            let highlighted = match previous {
                Some(previous) => {
                    let connection = graph.connection_between(previous, utility)?;
                    let edge = self.scene.edge(connection);
                    self.scene.apply(&[Transition::HighlightEdge(edge)]);
                    Some(connection)
                }
                None => None,
            };

            let triggers = self.rules.is_trigger(utility);
            if triggers {
                self.open_scope(utility);
            }

            self.path.push(utility);
            self.step(stage + 1, Some(utility))?;
            self.path.pop();

            if triggers {
                self.close_scope(utility)?;
            }

            if let Some(connection) = highlighted {
                let edge = self.scene.edge(connection);
                self.scene.apply(&[Transition::UnhighlightEdge(edge)]);
            }
        }

        Ok(())
    }

    fn open_scope(&mut self, trigger: UtilityIndex) {
        let rules = self.rules;
        let excluded = rules.excluded_by(trigger);
        let touched = self.touched_connections(excluded);
        let before: Vec<bool> = touched
            .iter()
            .map(|&c| self.connection_visible(c))
            .collect();

        let hidden = self.ledger.open_scope(trigger, excluded);

        let mut batch: Batch<R> = hidden
            .iter()
            .map(|&u| Transition::HideNode(self.scene.node(u)))
            .collect();
        for (&connection, was_visible) in touched.iter().zip(before) {
            if was_visible && !self.connection_visible(connection) {
                batch.push(Transition::HideEdge(self.scene.edge(connection)));
            }
        }

        tracing::debug!(
            trigger = %self.graph.registry().id(trigger),
            excluded = excluded.len(),
            newly_hidden = hidden.len(),
            "Opened suppression scope"
        );
        self.scene.apply(&batch);
    }

    fn close_scope(&mut self, trigger: UtilityIndex) -> Result<(), TraversalError> {
        let rules = self.rules;
        let excluded = rules.excluded_by(trigger);
        let touched = self.touched_connections(excluded);
        let before: Vec<bool> = touched
            .iter()
            .map(|&c| self.connection_visible(c))
            .collect();

        let restored = self.ledger.close_scope(trigger)?;

        let mut batch: Batch<R> = restored
            .iter()
            .map(|&u| Transition::ShowNode(self.scene.node(u)))
            .collect();
        for (&connection, was_visible) in touched.iter().zip(before) {
            if !was_visible && self.connection_visible(connection) {
                batch.push(Transition::ShowEdge(self.scene.edge(connection)));
            }
        }

        tracing::debug!(
            trigger = %self.graph.registry().id(trigger),
            restored = restored.len(),
            "Closed suppression scope"
        );
        self.scene.apply(&batch);
        Ok(())
    }

    /// Connections incident to any of `utilities`, deduplicated, in first-seen order.
    fn touched_connections(&self, utilities: &[UtilityIndex]) -> Vec<ConnectionIndex> {
        let mut seen = HashSet::new();
        utilities
            .iter()
            .flat_map(|&u| self.graph.incident(u).iter().copied())
            .filter(|&c| seen.insert(c))
            .collect()
    }

    /// A connection is visible iff neither endpoint is suppressed.
    fn connection_visible(&self, connection: ConnectionIndex) -> bool {
        let connection = self.graph.connection(connection);
        !self.ledger.is_active(connection.source()) && !self.ledger.is_active(connection.target())
    }
}
