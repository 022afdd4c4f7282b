//! Caller-facing facade: configure once, install rules, traverse repeatedly.

use stagewalk_types::{
    AdjacencyGraph, CategoryRegistry, CategorySpec, Direction, IncompatibilityMap, RegistryError,
    RuleError, UtilityId,
};

use crate::engine::{TraversalEngine, TraversalError, TraversalSummary};
use crate::render::{Batch, Renderer, Scene, Transition};

/// A configured registry and graph, the active incompatibility rules, and
/// the renderer everything is drawn on.
pub struct Stage<R: Renderer> {
    graph: AdjacencyGraph,
    rules: IncompatibilityMap,
    scene: Scene<R>,
}

impl<R: Renderer> Stage<R> {
    /// Build the registry and graph and create every visual handle.
    ///
    /// Per category: the category hook, one node per utility, then one
    /// batch revealing them. Per source utility: one edge per outgoing
    /// connection, then one batch revealing them.
    pub fn configure(
        categories: &[CategorySpec],
        direction: Direction,
        renderer: R,
    ) -> Result<Self, RegistryError> {
        let registry = CategoryRegistry::build(categories)?;
        let graph = AdjacencyGraph::build(registry, direction);
        let mut scene = Scene::new(renderer);

        let registry = graph.registry();
        for category in registry.categories() {
            let ids: Vec<&UtilityId> = category
                .utilities()
                .iter()
                .map(|&u| registry.id(u))
                .collect();
            scene.create_category(category.name(), &ids);

            let batch: Batch<R> = ids
                .iter()
                .map(|id| Transition::ShowNode(scene.push_node(id)))
                .collect();
            scene.apply(&batch);
        }

        for category in registry.categories() {
            for &source in category.utilities() {
                let batch: Batch<R> = graph
                    .outgoing(source)
                    .map(|c| {
                        let connection = graph.connection(c);
                        Transition::ShowEdge(
                            scene.push_edge(connection.source(), connection.target()),
                        )
                    })
                    .collect();
                scene.apply(&batch);
            }
        }

        tracing::info!(
            categories = registry.stage_count(),
            utilities = registry.utility_count(),
            connections = graph.connections().len(),
            directed = direction.is_directed(),
            "Stage configured"
        );

        Ok(Self {
            graph,
            rules: IncompatibilityMap::empty(),
            scene,
        })
    }

    /// Resolve string-keyed rules against this stage's registry without installing them.
    pub fn resolve_incompatibilities<I, T, E, S>(
        &self,
        rules: I,
    ) -> Result<IncompatibilityMap, RuleError>
    where
        I: IntoIterator<Item = (T, E)>,
        T: AsRef<str>,
        E: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        IncompatibilityMap::resolve(self.graph.registry(), rules)
    }

    /// Resolve `rules` against this stage's registry and install them for
    /// subsequent traversals.
    ///
    /// On error the previously installed rules stay in place.
    pub fn set_incompatibilities<I, T, E, S>(&mut self, rules: I) -> Result<(), RuleError>
    where
        I: IntoIterator<Item = (T, E)>,
        T: AsRef<str>,
        E: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = self.resolve_incompatibilities(rules)?;
        tracing::info!(triggers = rules.len(), "Incompatibility rules installed");
        self.rules = rules;
        Ok(())
    }

    pub fn clear_incompatibilities(&mut self) {
        self.rules = IncompatibilityMap::empty();
    }

    /// Walk every category-respecting path once.
    ///
    /// Each call starts from an empty suppression ledger.
    pub fn run_traversal(&mut self) -> Result<TraversalSummary, TraversalError> {
        tracing::info!(triggers = self.rules.len(), "Traversal started");
        let summary = TraversalEngine::new(&self.graph, &self.rules, &mut self.scene).run()?;
        tracing::info!(
            paths = summary.completed_paths(),
            visited = summary.visited(),
            skipped = summary.skipped(),
            peak_suppression = summary.peak_suppression(),
            "Traversal finished"
        );
        Ok(summary)
    }

    #[must_use]
    pub fn graph(&self) -> &AdjacencyGraph {
        &self.graph
    }

    #[must_use]
    pub fn registry(&self) -> &CategoryRegistry {
        self.graph.registry()
    }

    #[must_use]
    pub fn rules(&self) -> &IncompatibilityMap {
        &self.rules
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        self.scene.renderer()
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        self.scene.renderer_mut()
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.scene.into_renderer()
    }
}
