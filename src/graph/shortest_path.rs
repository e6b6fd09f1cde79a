use super::{DependencyGraph, Edge, GraphError, Node, Topological};
use petgraph::graph::NodeIndex;

const UNREACHABLE: u32 = u32::MAX;

/// Single-source shortest paths with unit edge weights
///
/// Edges are relaxed in the topological order of the source, so every node
/// is settled once. A distance only improves on a strictly shorter path,
/// which makes the first path found in traversal order win ties.
#[derive(Debug)]
pub struct ShortestPath<'g> {
    graph: &'g DependencyGraph,
    source: NodeIndex,
    dist_to: Vec<u32>,
    edge_to: Vec<Option<NodeIndex>>,
}

impl<'g> ShortestPath<'g> {
    pub fn new(graph: &'g DependencyGraph, source: &str) -> Result<Self, GraphError> {
        let topological = Topological::new(graph, source)?;
        let source = graph.index_of(source)?;

        let mut dist_to = vec![UNREACHABLE; graph.node_count()];
        let mut edge_to = vec![None; graph.node_count()];
        dist_to[source.index()] = 0;

        for &from in topological.indices() {
            let base = dist_to[from.index()];
            if base == UNREACHABLE {
                continue;
            }
            for to in graph.successor_indices(from) {
                if dist_to[to.index()] > base + 1 {
                    dist_to[to.index()] = base + 1;
                    edge_to[to.index()] = Some(from);
                }
            }
        }

        Ok(Self {
            graph,
            source,
            dist_to,
            edge_to,
        })
    }

    pub fn source(&self) -> &'g Node {
        self.graph.node_at(self.source)
    }

    /// Number of edges on the shortest path, `None` when unreachable
    pub fn distance_to(&self, target: &str) -> Result<Option<u32>, GraphError> {
        let idx = self.graph.index_of(target)?;
        let distance = self.dist_to[idx.index()];
        Ok((distance != UNREACHABLE).then_some(distance))
    }

    pub fn has_path_to(&self, target: &str) -> bool {
        matches!(self.distance_to(target), Ok(Some(_)))
    }

    /// Edges from the source to `target`, empty when unreachable
    pub fn edges_to(&self, target: &str) -> Result<Vec<Edge>, GraphError> {
        let target = self.graph.index_of(target)?;
        if self.dist_to[target.index()] == UNREACHABLE {
            return Ok(Vec::new());
        }

        let mut edges = Vec::new();
        let mut current = target;
        while let Some(previous) = self.edge_to[current.index()] {
            edges.push(Edge {
                from: self.graph.node_at(previous).clone(),
                to: self.graph.node_at(current).clone(),
                weight: 1,
            });
            current = previous;
        }
        edges.reverse();
        Ok(edges)
    }

    /// Nodes from the source to `target` inclusive, empty when unreachable
    pub fn path_to(&self, target: &str) -> Result<Vec<&'g Node>, GraphError> {
        let target = self.graph.index_of(target)?;
        if self.dist_to[target.index()] == UNREACHABLE {
            return Ok(Vec::new());
        }

        let mut path = vec![self.graph.node_at(target)];
        let mut current = target;
        while let Some(previous) = self.edge_to[current.index()] {
            path.push(self.graph.node_at(previous));
            current = previous;
        }
        path.reverse();
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Coordinates;

    fn graph(edges: &[(&str, &str)]) -> DependencyGraph {
        DependencyGraph::from_edges(
            edges
                .iter()
                .map(|(a, b)| (Coordinates::parse(a), Coordinates::parse(b))),
        )
    }

    fn ids(path: &[&Node]) -> Vec<String> {
        path.iter().map(|n| n.identifier().to_string()).collect()
    }

    #[test]
    fn test_prefers_shorter_path() {
        let g = graph(&[
            (":app", ":a"),
            (":a", ":b"),
            (":b", "g:lib:1"),
            (":app", ":c"),
            (":c", "g:lib:1"),
        ]);
        let paths = g.shortest_paths(":app").unwrap();
        assert_eq!(paths.distance_to("g:lib").unwrap(), Some(2));
        assert_eq!(ids(&paths.path_to("g:lib").unwrap()), vec![":app", ":c", "g:lib"]);
    }

    #[test]
    fn test_path_to_source() {
        let g = graph(&[(":app", ":a")]);
        let paths = g.shortest_paths(":app").unwrap();
        assert_eq!(ids(&paths.path_to(":app").unwrap()), vec![":app"]);
        assert!(paths.edges_to(":app").unwrap().is_empty());
    }

    #[test]
    fn test_unreachable_is_empty() {
        let g = graph(&[(":app", ":a"), (":x", ":y")]);
        let paths = g.shortest_paths(":app").unwrap();
        assert!(!paths.has_path_to(":y"));
        assert_eq!(paths.distance_to(":y").unwrap(), None);
        assert!(paths.path_to(":y").unwrap().is_empty());
    }

    #[test]
    fn test_edges_to() {
        let g = graph(&[(":app", ":a"), (":a", ":b")]);
        let paths = g.shortest_paths(":app").unwrap();
        let edges = paths.edges_to(":b").unwrap();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].from.identifier(), ":app");
        assert_eq!(edges[1].to.identifier(), ":b");
    }

    #[test]
    fn test_missing_target() {
        let g = graph(&[(":app", ":a")]);
        let paths = g.shortest_paths(":app").unwrap();
        assert!(matches!(paths.path_to(":nope"), Err(GraphError::MissingNode(_))));
    }
}
