//! Renderer contract.
//!
//! The core never draws anything. It asks a [`Renderer`] for opaque node and
//! edge handles at configuration time and later hands it batches of
//! [`Transition`]s. Each [`Renderer::apply`] call is one atomic visual
//! transition; the renderer returns only once the batch has settled, which is
//! the barrier the traversal waits on before moving on.

use std::fmt;

use serde::Serialize;

use stagewalk_types::{ConnectionIndex, UtilityId, UtilityIndex};

/// The closed set of visual effects the core can request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "target", rename_all = "snake_case")]
pub enum Transition<N, E> {
    ShowNode(N),
    HideNode(N),
    ShowEdge(E),
    HideEdge(E),
    HighlightEdge(E),
    UnhighlightEdge(E),
}

impl<N: fmt::Display, E: fmt::Display> fmt::Display for Transition<N, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShowNode(node) => write!(f, "show {node}"),
            Self::HideNode(node) => write!(f, "hide {node}"),
            Self::ShowEdge(edge) => write!(f, "show {edge}"),
            Self::HideEdge(edge) => write!(f, "hide {edge}"),
            Self::HighlightEdge(edge) => write!(f, "highlight {edge}"),
            Self::UnhighlightEdge(edge) => write!(f, "unhighlight {edge}"),
        }
    }
}

pub trait Renderer {
    type Node: Clone;
    type Edge: Clone;

    /// Called once per category, before its utilities are created.
    fn create_category(&mut self, _name: &str, _utilities: &[&UtilityId]) {}

    fn create_node(&mut self, id: &UtilityId) -> Self::Node;

    fn create_edge(&mut self, source: &Self::Node, target: &Self::Node) -> Self::Edge;

    /// Run `batch` as one simultaneous transition and block until it settles.
    fn apply(&mut self, batch: &[Transition<Self::Node, Self::Edge>]);
}

/// Edge handle for renderers that identify connections by their endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EdgeLabel {
    pub source: UtilityId,
    pub target: UtilityId,
}

impl EdgeLabel {
    #[must_use]
    pub fn new(source: &UtilityId, target: &UtilityId) -> Self {
        Self {
            source: source.clone(),
            target: target.clone(),
        }
    }
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

pub(crate) type Batch<R> = Vec<Transition<<R as Renderer>::Node, <R as Renderer>::Edge>>;

/// A renderer plus the handles it issued, indexed like the graph.
pub(crate) struct Scene<R: Renderer> {
    renderer: R,
    nodes: Vec<R::Node>,
    edges: Vec<R::Edge>,
}

impl<R: Renderer> Scene<R> {
    pub(crate) fn new(renderer: R) -> Self {
        Self {
            renderer,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub(crate) fn renderer(&self) -> &R {
        &self.renderer
    }

    pub(crate) fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub(crate) fn into_renderer(self) -> R {
        self.renderer
    }

    /// Register a node; handles must be added in utility index order.
    pub(crate) fn push_node(&mut self, id: &UtilityId) -> R::Node {
        let node = self.renderer.create_node(id);
        self.nodes.push(node.clone());
        node
    }

    /// Register an edge; handles must be added in connection index order.
    pub(crate) fn push_edge(&mut self, source: UtilityIndex, target: UtilityIndex) -> R::Edge {
        let edge = self
            .renderer
            .create_edge(&self.nodes[source.get()], &self.nodes[target.get()]);
        self.edges.push(edge.clone());
        edge
    }

    pub(crate) fn create_category(&mut self, name: &str, utilities: &[&UtilityId]) {
        self.renderer.create_category(name, utilities);
    }

    pub(crate) fn node(&self, utility: UtilityIndex) -> R::Node {
        self.nodes[utility.get()].clone()
    }

    pub(crate) fn edge(&self, connection: ConnectionIndex) -> R::Edge {
        self.edges[connection.get()].clone()
    }

    /// Apply a batch, skipping the call entirely when there is nothing in it.
    pub(crate) fn apply(&mut self, batch: &[Transition<R::Node, R::Edge>]) {
        if !batch.is_empty() {
            self.renderer.apply(batch);
        }
    }
}
