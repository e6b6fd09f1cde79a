//! Dominance tree over a single-entry dependency graph
//!
//! A node `d` dominates `n` if every path from the root to `n` goes through
//! `d`. In a dependency graph that means removing `d` from the build also
//! removes `n`, which is what the size tree aggregates.
//!
//! # Algorithm
//!
//! Iterative data-flow formulation by Cooper, Harvey and Kennedy ("A Simple,
//! Fast Dominance Algorithm"). Nodes are numbered from the reverse postorder
//! of the root so the root carries the highest number; `intersect` walks two
//! candidates up the partial tree until they meet.

use super::{DependencyGraph, GraphError, Node, Topological};
use petgraph::graph::NodeIndex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

#[derive(Debug)]
pub struct DominanceTree {
    /// Root of the backing graph
    root: NodeIndex,

    /// Nodes of the backing graph, by index
    nodes: Vec<Node>,

    /// Identifier to index, as in the backing graph
    index: HashMap<String, NodeIndex>,

    /// Reverse postorder from the root
    order: Vec<NodeIndex>,

    /// Immediate dominator per node index. The root maps to itself.
    doms: Vec<NodeIndex>,

    dominance_graph: OnceLock<DependencyGraph>,
}

impl DominanceTree {
    /// Dominance tree of `graph` rooted at `root`
    ///
    /// Every node of the graph must be reachable from the root.
    pub fn new(graph: &DependencyGraph, root: &str) -> Result<Self, GraphError> {
        let topological = Topological::new(graph, root)?;
        let root_idx = graph.index_of(root)?;

        if topological.len() != graph.node_count() {
            let mut reached = vec![false; graph.node_count()];
            for idx in topological.indices() {
                reached[idx.index()] = true;
            }
            let unreachable = graph
                .nodes()
                .enumerate()
                .filter(|(i, _)| !reached[*i])
                .map(|(_, node)| node.identifier().to_string())
                .collect();
            return Err(GraphError::NotSingleEntry {
                root: root.to_string(),
                unreachable,
            });
        }

        let order = topological.indices().to_vec();
        let doms = compute_dominators(graph, root_idx, &order);

        Ok(Self {
            root: root_idx,
            nodes: graph.nodes().cloned().collect(),
            index: graph.node_map.clone(),
            order,
            doms,
            dominance_graph: OnceLock::new(),
        })
    }

    /// Dominance tree rooted at the first node without incoming edges
    pub fn from_root(graph: &DependencyGraph) -> Result<Self, GraphError> {
        let root = graph.root().ok_or(GraphError::NoRoot)?;
        Self::new(graph, root.identifier())
    }

    pub fn root(&self) -> &Node {
        &self.nodes[self.root.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Immediate dominator of a node, `None` for the root
    pub fn immediate_dominator(&self, identifier: &str) -> Result<Option<&Node>, GraphError> {
        let idx = self.index_of(identifier)?;
        if idx == self.root {
            return Ok(None);
        }
        Ok(Some(&self.nodes[self.doms[idx.index()].index()]))
    }

    /// Whether `dominator` dominates `node`. Every node dominates itself.
    pub fn dominates(&self, dominator: &str, node: &str) -> Result<bool, GraphError> {
        let dominator = self.index_of(dominator)?;
        let mut current = self.index_of(node)?;
        loop {
            if current == dominator {
                return Ok(true);
            }
            if current == self.root {
                return Ok(false);
            }
            current = self.doms[current.index()];
        }
    }

    /// Nodes whose dominator is themselves. Only the root, for a valid graph.
    pub fn self_dominating_nodes(&self) -> Vec<&Node> {
        self.order
            .iter()
            .filter(|idx| self.doms[idx.index()] == **idx)
            .map(|idx| &self.nodes[idx.index()])
            .collect()
    }

    /// Graph with an edge from each node's immediate dominator to the node
    ///
    /// Built on first use and shared afterwards.
    pub fn dominance_graph(&self) -> &DependencyGraph {
        self.dominance_graph.get_or_init(|| {
            let mut graph = DependencyGraph::new();
            graph.add_node(self.root().clone());
            for &idx in &self.order {
                let dom = self.doms[idx.index()];
                if dom != idx {
                    graph.add_edge(self.nodes[dom.index()].clone(), self.nodes[idx.index()].clone());
                }
            }
            graph
        })
    }

    /// Nodes immediately dominated by `identifier`, in reverse postorder
    pub fn dominated_by(&self, identifier: &str) -> Result<Vec<&Node>, GraphError> {
        let idx = self.index_of(identifier)?;
        Ok(self
            .order
            .iter()
            .filter(|&&n| n != idx && self.doms[n.index()] == idx)
            .map(|n| &self.nodes[n.index()])
            .collect())
    }

    pub(crate) fn root_index(&self) -> usize {
        self.root.index()
    }

    pub(crate) fn node_at(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// Immediately dominated nodes of every node, by index, in reverse postorder
    pub(crate) fn children_by_index(&self) -> Vec<Vec<usize>> {
        let mut children = vec![Vec::new(); self.nodes.len()];
        for &idx in &self.order {
            let dom = self.doms[idx.index()];
            if dom != idx {
                children[dom.index()].push(idx.index());
            }
        }
        children
    }

    fn index_of(&self, identifier: &str) -> Result<NodeIndex, GraphError> {
        self.index
            .get(identifier)
            .copied()
            .ok_or_else(|| GraphError::MissingNode(identifier.to_string()))
    }
}

fn compute_dominators(graph: &DependencyGraph, root: NodeIndex, order: &[NodeIndex]) -> Vec<NodeIndex> {
    let count = graph.node_count();

    let mut number = vec![0usize; count];
    for (i, idx) in order.iter().enumerate() {
        number[idx.index()] = order.len() - i;
    }

    let mut doms: Vec<Option<NodeIndex>> = vec![None; count];
    doms[root.index()] = Some(root);

    let mut changed = true;
    let mut passes = 0;
    while changed {
        changed = false;
        passes += 1;

        for &node in order.iter().filter(|&&idx| idx != root) {
            let predecessors = graph.predecessor_indices(node);
            let mut processed = predecessors
                .iter()
                .copied()
                .filter(|p| doms[p.index()].is_some());

            let Some(first) = processed.next() else {
                continue;
            };

            let mut new_idom = first;
            for predecessor in processed {
                new_idom = intersect(&doms, &number, root, predecessor, new_idom);
            }

            if doms[node.index()] != Some(new_idom) {
                doms[node.index()] = Some(new_idom);
                changed = true;
            }
        }
    }

    debug!("Dominators converged after {} pass(es) over {} nodes", passes, count);

    doms.into_iter().map(|dom| dom.unwrap_or(root)).collect()
}

fn intersect(
    doms: &[Option<NodeIndex>],
    number: &[usize],
    root: NodeIndex,
    mut left: NodeIndex,
    mut right: NodeIndex,
) -> NodeIndex {
    let dom_of = |idx: NodeIndex| doms[idx.index()].unwrap_or(root);
    while number[left.index()] != number[right.index()] {
        while number[left.index()] < number[right.index()] {
            left = dom_of(left);
        }
        while number[right.index()] < number[left.index()] {
            right = dom_of(right);
        }
    }
    left
}
