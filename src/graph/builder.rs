use super::{Coordinates, DependencyGraph};
use tracing::debug;

/// Builder for constructing a dependency graph from raw coordinate strings
pub struct GraphBuilder {
    /// The graph being built
    graph: DependencyGraph,

    /// Edges seen more than once
    duplicate_edges: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: DependencyGraph::new(),
            duplicate_edges: 0,
        }
    }

    /// Start from a node so it is registered even without edges
    pub fn with_root(mut self, raw: &str) -> Self {
        self.graph.add_node(Coordinates::parse(raw));
        self
    }

    pub fn node(&mut self, raw: &str) -> &mut Self {
        self.graph.add_node(Coordinates::parse(raw));
        self
    }

    pub fn edge(&mut self, from: &str, to: &str) -> &mut Self {
        if !self
            .graph
            .add_edge(Coordinates::parse(from), Coordinates::parse(to))
        {
            self.duplicate_edges += 1;
        }
        self
    }

    pub fn edges<'a, I>(&mut self, edges: I) -> &mut Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (from, to) in edges {
            self.edge(from, to);
        }
        self
    }

    pub fn build(self) -> DependencyGraph {
        debug!(
            "Built graph: {} nodes, {} edges ({} duplicate edges ignored)",
            self.graph.node_count(),
            self.graph.edge_count(),
            self.duplicate_edges
        );
        self.graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
