use super::{DependencyGraph, GraphError, Node};
use petgraph::graph::NodeIndex;

/// Reverse depth-first postorder from a source node
///
/// Children are visited in edge insertion order. Only nodes reachable from
/// the source appear. On a DAG this is a topological order; with cycles it is
/// still a well-defined traversal order.
#[derive(Debug)]
pub struct Topological<'g> {
    graph: &'g DependencyGraph,
    order: Vec<NodeIndex>,
}

impl<'g> Topological<'g> {
    pub fn new(graph: &'g DependencyGraph, source: &str) -> Result<Self, GraphError> {
        let start = graph.index_of(source)?;

        let mut visited = vec![false; graph.node_count()];
        let mut postorder = Vec::with_capacity(graph.node_count());
        let mut stack: Vec<(NodeIndex, Vec<NodeIndex>, usize)> = Vec::new();

        visited[start.index()] = true;
        stack.push((start, graph.successor_indices(start), 0));

        while let Some(frame) = stack.last_mut() {
            if let Some(&next) = frame.1.get(frame.2) {
                frame.2 += 1;
                if !visited[next.index()] {
                    visited[next.index()] = true;
                    let successors = graph.successor_indices(next);
                    stack.push((next, successors, 0));
                }
            } else if let Some((node, _, _)) = stack.pop() {
                postorder.push(node);
            }
        }

        postorder.reverse();
        Ok(Self {
            graph,
            order: postorder,
        })
    }

    pub fn order(&self) -> impl Iterator<Item = &'g Node> + '_ {
        self.order.iter().map(move |&idx| self.graph.node_at(idx))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn indices(&self) -> &[NodeIndex] {
        &self.order
    }
}
