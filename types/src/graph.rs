//! Stage graph: complete bipartite connections between adjacent categories.
//!
//! Every utility in stage `i` connects to every utility in stage `i + 1`.
//! Nothing skips a stage and nothing connects within one. Connections are
//! always stored source-forward (stage `i` first); `Direction` only decides
//! whether they can also be queried from the later endpoint.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CategoryRegistry, ConnectionIndex, UtilityId, UtilityIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Connections are reachable only from the earlier stage.
    Directed,
    /// Connections are indexed from both endpoints.
    #[default]
    Undirected,
}

impl Direction {
    #[must_use]
    pub const fn from_directed(directed: bool) -> Self {
        if directed {
            Self::Directed
        } else {
            Self::Undirected
        }
    }

    #[must_use]
    pub const fn is_directed(self) -> bool {
        matches!(self, Self::Directed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("unknown utility {id:?}")]
    UnknownUtility { id: String },
    #[error("{a} and {b} are both in stage {stage}")]
    SameStage {
        a: UtilityId,
        b: UtilityId,
        stage: usize,
    },
    #[error("{a} (stage {a_stage}) and {b} (stage {b_stage}) are not in adjacent stages")]
    NonAdjacentStages {
        a: UtilityId,
        b: UtilityId,
        a_stage: usize,
        b_stage: usize,
    },
    #[error("no connection leads from {from} to {to} in a directed graph")]
    NotConnected { from: UtilityId, to: UtilityId },
}

/// A connection between a utility in stage `i` and one in stage `i + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    source: UtilityIndex,
    target: UtilityIndex,
}

impl Connection {
    /// The endpoint in the earlier stage.
    #[must_use]
    pub const fn source(self) -> UtilityIndex {
        self.source
    }

    /// The endpoint in the later stage.
    #[must_use]
    pub const fn target(self) -> UtilityIndex {
        self.target
    }

    /// The endpoint opposite `end`, or `None` if `end` is not on this connection.
    #[must_use]
    pub fn other(self, end: UtilityIndex) -> Option<UtilityIndex> {
        if end == self.source {
            Some(self.target)
        } else if end == self.target {
            Some(self.source)
        } else {
            None
        }
    }
}

/// Registry plus the connections built from it. Read-only after [`AdjacencyGraph::build`].
#[derive(Debug, Clone)]
pub struct AdjacencyGraph {
    registry: CategoryRegistry,
    direction: Direction,
    connections: Vec<Connection>,
    // Per utility, every connection touching it regardless of direction.
    incident: Vec<Vec<ConnectionIndex>>,
    by_endpoints: HashMap<(UtilityIndex, UtilityIndex), ConnectionIndex>,
}

impl AdjacencyGraph {
    /// Connect every adjacent stage pair. Connections are created per source
    /// utility in registry order, targets in registry order.
    #[must_use]
    pub fn build(registry: CategoryRegistry, direction: Direction) -> Self {
        let mut connections = Vec::new();
        let mut incident = vec![Vec::new(); registry.utility_count()];
        let mut by_endpoints = HashMap::new();

        for pair in registry.categories().windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            for &source in from.utilities() {
                for &target in to.utilities() {
                    let index = ConnectionIndex::new(connections.len());
                    connections.push(Connection { source, target });
                    incident[source.get()].push(index);
                    incident[target.get()].push(index);
                    by_endpoints.insert((source, target), index);
                }
            }
        }

        Self {
            registry,
            direction,
            connections,
            incident,
            by_endpoints,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    #[must_use]
    pub fn connection(&self, index: ConnectionIndex) -> Connection {
        self.connections[index.get()]
    }

    /// Every connection touching `utility`, in creation order.
    #[must_use]
    pub fn incident(&self, utility: UtilityIndex) -> &[ConnectionIndex] {
        &self.incident[utility.get()]
    }

    /// Connections whose source is `utility`, in creation order.
    pub fn outgoing(&self, utility: UtilityIndex) -> impl Iterator<Item = ConnectionIndex> + '_ {
        self.incident(utility)
            .iter()
            .copied()
            .filter(move |&c| self.connections[c.get()].source == utility)
    }

    /// Utilities directly reachable from `id`: the next stage, plus the
    /// previous stage when the graph is undirected.
    pub fn neighbors(&self, id: &str) -> Result<Vec<&UtilityId>, GraphError> {
        let utility = self.resolve(id)?;
        let neighbors = self
            .incident(utility)
            .iter()
            .map(|&c| self.connections[c.get()])
            .filter(|c| !self.direction.is_directed() || c.source == utility)
            .filter_map(|c| c.other(utility))
            .map(|u| self.registry.id(u))
            .collect();
        Ok(neighbors)
    }

    /// Locate the connection joining `a` and `b`.
    ///
    /// In an undirected graph either endpoint may be the anchor. In a
    /// directed graph `a` must be the earlier stage.
    pub fn connection_between(
        &self,
        a: UtilityIndex,
        b: UtilityIndex,
    ) -> Result<ConnectionIndex, GraphError> {
        let a_stage = self.registry.utility(a).stage();
        let b_stage = self.registry.utility(b).stage();

        let key = if a_stage + 1 == b_stage {
            (a, b)
        } else if b_stage + 1 == a_stage {
            if self.direction.is_directed() {
                return Err(GraphError::NotConnected {
                    from: self.registry.id(a).clone(),
                    to: self.registry.id(b).clone(),
                });
            }
            (b, a)
        } else if a_stage == b_stage {
            return Err(GraphError::SameStage {
                a: self.registry.id(a).clone(),
                b: self.registry.id(b).clone(),
                stage: a_stage,
            });
        } else {
            return Err(GraphError::NonAdjacentStages {
                a: self.registry.id(a).clone(),
                b: self.registry.id(b).clone(),
                a_stage,
                b_stage,
            });
        };

        // Adjacent stages are complete bipartite, so the key is always present.
        Ok(self.by_endpoints[&key])
    }

    /// [`Self::connection_between`] by utility id.
    pub fn connection_between_ids(&self, a: &str, b: &str) -> Result<ConnectionIndex, GraphError> {
        let a = self.resolve(a)?;
        let b = self.resolve(b)?;
        self.connection_between(a, b)
    }

    fn resolve(&self, id: &str) -> Result<UtilityIndex, GraphError> {
        self.registry
            .index_of(id)
            .ok_or_else(|| GraphError::UnknownUtility { id: id.to_owned() })
    }
}
