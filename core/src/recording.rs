//! In-memory renderer that records every request it receives.
//!
//! Besides the raw event log it keeps the visibility and highlight state the
//! transitions imply, so callers can ask what a real renderer would be showing
//! at any point.

use std::collections::HashSet;
use std::fmt;

use stagewalk_types::UtilityId;

use crate::render::{EdgeLabel, Renderer, Transition};

pub type RecordedTransition = Transition<UtilityId, EdgeLabel>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedEvent {
    Category {
        name: String,
        utilities: Vec<UtilityId>,
    },
    Node(UtilityId),
    Edge(EdgeLabel),
    Batch(Vec<RecordedTransition>),
}

impl fmt::Display for RecordedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category { name, utilities } => {
                write!(f, "category {name} [")?;
                for (i, id) in utilities.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{id}")?;
                }
                f.write_str("]")
            }
            Self::Node(id) => write!(f, "node {id}"),
            Self::Edge(edge) => write!(f, "edge {edge}"),
            Self::Batch(batch) => {
                for (i, transition) in batch.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{transition}")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    events: Vec<RecordedEvent>,
    hidden_nodes: HashSet<UtilityId>,
    hidden_edges: HashSet<EdgeLabel>,
    highlighted: HashSet<EdgeLabel>,
}

impl RecordingRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Drain the event log, keeping the current visual state.
    pub fn take_events(&mut self) -> Vec<RecordedEvent> {
        std::mem::take(&mut self.events)
    }

    /// Only the transition batches, in order.
    pub fn batches(&self) -> impl Iterator<Item = &[RecordedTransition]> {
        self.events.iter().filter_map(|event| match event {
            RecordedEvent::Batch(batch) => Some(batch.as_slice()),
            _ => None,
        })
    }

    /// One line per event, as rendered by `Display`.
    #[must_use]
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&event.to_string());
            out.push('\n');
        }
        out
    }

    #[must_use]
    pub fn is_node_hidden(&self, id: &str) -> bool {
        self.hidden_nodes.contains(id)
    }

    #[must_use]
    pub fn is_edge_hidden(&self, source: &str, target: &str) -> bool {
        self.hidden_edges
            .iter()
            .any(|edge| edge.source == source && edge.target == target)
    }

    #[must_use]
    pub fn hidden_node_count(&self) -> usize {
        self.hidden_nodes.len()
    }

    #[must_use]
    pub fn hidden_edge_count(&self) -> usize {
        self.hidden_edges.len()
    }

    #[must_use]
    pub fn highlighted_count(&self) -> usize {
        self.highlighted.len()
    }
}

impl Renderer for RecordingRenderer {
    type Node = UtilityId;
    type Edge = EdgeLabel;

    fn create_category(&mut self, name: &str, utilities: &[&UtilityId]) {
        self.events.push(RecordedEvent::Category {
            name: name.to_owned(),
            utilities: utilities.iter().map(|&id| id.clone()).collect(),
        });
    }

    fn create_node(&mut self, id: &UtilityId) -> UtilityId {
        self.events.push(RecordedEvent::Node(id.clone()));
        // Created nodes stay hidden until a ShowNode batch reveals them.
        self.hidden_nodes.insert(id.clone());
        id.clone()
    }

    fn create_edge(&mut self, source: &UtilityId, target: &UtilityId) -> EdgeLabel {
        let edge = EdgeLabel::new(source, target);
        self.events.push(RecordedEvent::Edge(edge.clone()));
        self.hidden_edges.insert(edge.clone());
        edge
    }

    fn apply(&mut self, batch: &[RecordedTransition]) {
        for transition in batch {
            match transition {
                Transition::ShowNode(id) => {
                    self.hidden_nodes.remove(id);
                }
                Transition::HideNode(id) => {
                    self.hidden_nodes.insert(id.clone());
                }
                Transition::ShowEdge(edge) => {
                    self.hidden_edges.remove(edge);
                }
                Transition::HideEdge(edge) => {
                    self.hidden_edges.insert(edge.clone());
                }
                Transition::HighlightEdge(edge) => {
                    self.highlighted.insert(edge.clone());
                }
                Transition::UnhighlightEdge(edge) => {
                    self.highlighted.remove(edge);
                }
            }
        }
        self.events.push(RecordedEvent::Batch(batch.to_vec()));
    }
}
