mod builder;
mod coordinates;
mod dominance;
mod shortest_path;
mod size_tree;
mod topological;

pub use builder::GraphBuilder;
pub use coordinates::{Coordinates, CoordinatesKind, VariantIdentification};
pub use dominance::DominanceTree;
pub use shortest_path::ShortestPath;
pub use size_tree::DependencySizeTree;
pub use topological::Topological;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::{Dfs, EdgeRef, Walker};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("'{0}' is not a node of this graph")]
    MissingNode(String),

    #[error("graph has no root (every node has an incoming edge)")]
    NoRoot,

    #[error(
        "graph is not single-entry from '{root}': {} node(s) unreachable: {}",
        unreachable.len(),
        unreachable.join(", ")
    )]
    NotSingleEntry {
        root: String,
        unreachable: Vec<String>,
    },
}

/// A graph node. Equality, hashing and ordering use the identifier only, so
/// two versions of the same library collapse into one node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node(Coordinates);

impl Node {
    pub fn new(coordinates: Coordinates) -> Self {
        Self(coordinates)
    }

    pub fn identifier(&self) -> &str {
        &self.0.identifier
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.0
    }

    pub fn into_coordinates(self) -> Coordinates {
        self.0
    }
}

impl From<Coordinates> for Node {
    fn from(coordinates: Coordinates) -> Self {
        Self(coordinates)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.identifier() == other.identifier()
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier().hash(state);
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identifier().cmp(other.identifier())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: Node,
    pub to: Node,
    pub weight: u32,
}

/// Directed dependency graph
///
/// Nodes and edges keep their insertion order: `nodes()`, `edges()` and
/// `adj()` always report them in the order they were added. Edges are
/// idempotent and nothing is ever removed; derived views are new graphs.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Nodes carry coordinates, edges carry a unit weight
    inner: DiGraph<Node, u32>,

    /// Map from identifier to node index
    node_map: HashMap<String, NodeIndex>,

    /// Incoming edge count per node index
    in_degree: Vec<usize>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            inner: DiGraph::new(),
            node_map: HashMap::new(),
            in_degree: Vec::new(),
        }
    }

    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (Coordinates, Coordinates)>,
    {
        let mut graph = Self::new();
        for (from, to) in edges {
            graph.add_edge(from, to);
        }
        graph
    }

    /// Register a node. Returns false if a node with the same identifier
    /// already exists; the first coordinates seen are kept.
    pub fn add_node(&mut self, node: impl Into<Node>) -> bool {
        let node = node.into();
        if self.node_map.contains_key(node.identifier()) {
            return false;
        }
        self.insert_node(node);
        true
    }

    fn insert_node(&mut self, node: Node) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(node.identifier()) {
            return idx;
        }
        let identifier = node.identifier().to_string();
        let idx = self.inner.add_node(node);
        self.node_map.insert(identifier, idx);
        self.in_degree.push(0);
        idx
    }

    /// Add an edge, registering both endpoints. Returns false if the edge
    /// already existed.
    pub fn add_edge(&mut self, from: impl Into<Node>, to: impl Into<Node>) -> bool {
        let from_idx = self.insert_node(from.into());
        let to_idx = self.insert_node(to.into());
        self.connect(from_idx, to_idx)
    }

    fn connect(&mut self, from: NodeIndex, to: NodeIndex) -> bool {
        if self.inner.find_edge(from, to).is_some() {
            return false;
        }
        self.inner.add_edge(from, to, 1);
        self.in_degree[to.index()] += 1;
        true
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.node_map.contains_key(identifier)
    }

    pub fn node(&self, identifier: &str) -> Option<&Node> {
        self.node_map
            .get(identifier)
            .and_then(|&idx| self.inner.node_weight(idx))
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.inner.node_indices().map(move |idx| &self.inner[idx])
    }

    /// All edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.inner.edge_references().map(move |edge| Edge {
            from: self.inner[edge.source()].clone(),
            to: self.inner[edge.target()].clone(),
            weight: *edge.weight(),
        })
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Outgoing edges of a node, in insertion order
    pub fn adj(&self, identifier: &str) -> Result<Vec<Edge>, GraphError> {
        let idx = self.index_of(identifier)?;
        let from = &self.inner[idx];
        Ok(self
            .ordered_edges(idx, Direction::Outgoing)
            .into_iter()
            .map(|edge| {
                let (_, target) = self.endpoints(edge);
                Edge {
                    from: from.clone(),
                    to: self.inner[target].clone(),
                    weight: self.inner[edge],
                }
            })
            .collect())
    }

    pub fn successors(&self, identifier: &str) -> Result<Vec<&Node>, GraphError> {
        let idx = self.index_of(identifier)?;
        Ok(self
            .successor_indices(idx)
            .into_iter()
            .map(|i| &self.inner[i])
            .collect())
    }

    pub fn predecessors(&self, identifier: &str) -> Result<Vec<&Node>, GraphError> {
        let idx = self.index_of(identifier)?;
        Ok(self
            .predecessor_indices(idx)
            .into_iter()
            .map(|i| &self.inner[i])
            .collect())
    }

    pub fn children(&self, identifier: &str) -> Result<Vec<&Node>, GraphError> {
        self.successors(identifier)
    }

    pub fn parents(&self, identifier: &str) -> Result<Vec<&Node>, GraphError> {
        self.predecessors(identifier)
    }

    pub fn in_degree(&self, identifier: &str) -> Result<usize, GraphError> {
        let idx = self.index_of(identifier)?;
        Ok(self.in_degree[idx.index()])
    }

    pub fn out_degree(&self, identifier: &str) -> Result<usize, GraphError> {
        let idx = self.index_of(identifier)?;
        Ok(self.inner.edges_directed(idx, Direction::Outgoing).count())
    }

    /// Nodes without incoming edges, in insertion order
    pub fn roots(&self) -> Vec<&Node> {
        self.inner
            .node_indices()
            .filter(|idx| self.in_degree[idx.index()] == 0)
            .map(|idx| &self.inner[idx])
            .collect()
    }

    /// The first node without incoming edges
    pub fn root(&self) -> Option<&Node> {
        self.roots().into_iter().next()
    }

    /// Every node reachable from `identifier`
    pub fn reachable_nodes(
        &self,
        identifier: &str,
        exclude_self: bool,
    ) -> Result<BTreeSet<&Node>, GraphError> {
        let start = self.index_of(identifier)?;
        Ok(Dfs::new(&self.inner, start)
            .iter(&self.inner)
            .filter(|&idx| !(exclude_self && idx == start))
            .map(|idx| &self.inner[idx])
            .collect())
    }

    /// Every node reachable from the first node, in insertion order, that
    /// matches `predicate`. Empty when nothing matches.
    pub fn reachable_nodes_matching<P>(&self, predicate: P, exclude_self: bool) -> BTreeSet<&Node>
    where
        P: Fn(&Node) -> bool,
    {
        let Some(start) = self.inner.node_indices().find(|&idx| predicate(&self.inner[idx])) else {
            return BTreeSet::new();
        };
        Dfs::new(&self.inner, start)
            .iter(&self.inner)
            .filter(|&idx| !(exclude_self && idx == start))
            .map(|idx| &self.inner[idx])
            .collect()
    }

    /// A copy of this graph with every edge reversed
    pub fn reversed(&self) -> Self {
        let mut reversed = Self::new();
        for node in self.nodes() {
            reversed.insert_node(node.clone());
        }
        for edge in self.inner.edge_references() {
            reversed.add_edge(
                self.inner[edge.target()].clone(),
                self.inner[edge.source()].clone(),
            );
        }
        reversed
    }

    /// The subgraph induced by the given identifiers
    pub fn subgraph<'a, I>(&self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let keep: HashSet<&str> = identifiers.into_iter().collect();
        let mut subgraph = Self::new();
        for node in self.nodes().filter(|n| keep.contains(n.identifier())) {
            subgraph.insert_node(node.clone());
        }
        for edge in self.edges() {
            if keep.contains(edge.from.identifier()) && keep.contains(edge.to.identifier()) {
                subgraph.add_edge(edge.from, edge.to);
            }
        }
        subgraph
    }

    /// A copy of this graph without the given `(from, to)` identifier pairs
    pub fn without_edges(&self, removed: &[(&str, &str)]) -> Self {
        let removed: HashSet<(&str, &str)> = removed.iter().copied().collect();
        let mut graph = Self::new();
        for node in self.nodes() {
            graph.insert_node(node.clone());
        }
        for edge in self.edges() {
            if !removed.contains(&(edge.from.identifier(), edge.to.identifier())) {
                graph.add_edge(edge.from, edge.to);
            }
        }
        graph
    }

    pub fn topological(&self, source: &str) -> Result<Topological<'_>, GraphError> {
        Topological::new(self, source)
    }

    pub fn shortest_paths(&self, source: &str) -> Result<ShortestPath<'_>, GraphError> {
        ShortestPath::new(self, source)
    }

    /// Shortest path from `source` to `target` inclusive, empty if unreachable
    pub fn shortest_path(&self, source: &str, target: &str) -> Result<Vec<&Node>, GraphError> {
        let paths = self.shortest_paths(source)?;
        paths.path_to(target)
    }

    /// Content fingerprint over nodes and edges in insertion order
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for node in self.nodes() {
            node.coordinates().hash(&mut hasher);
        }
        for edge in self.inner.edge_references() {
            edge.source().index().hash(&mut hasher);
            edge.target().index().hash(&mut hasher);
        }
        hasher.finish()
    }

    pub(crate) fn index_of(&self, identifier: &str) -> Result<NodeIndex, GraphError> {
        self.node_map
            .get(identifier)
            .copied()
            .ok_or_else(|| GraphError::MissingNode(identifier.to_string()))
    }

    pub(crate) fn node_at(&self, idx: NodeIndex) -> &Node {
        &self.inner[idx]
    }

    pub(crate) fn successor_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.ordered_edges(idx, Direction::Outgoing)
            .into_iter()
            .map(|edge| self.endpoints(edge).1)
            .collect()
    }

    pub(crate) fn predecessor_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.ordered_edges(idx, Direction::Incoming)
            .into_iter()
            .map(|edge| self.endpoints(edge).0)
            .collect()
    }

    /// petgraph walks adjacency lists newest first; edge indices are
    /// assigned in insertion order and never reused here.
    fn ordered_edges(&self, idx: NodeIndex, direction: Direction) -> Vec<EdgeIndex> {
        let mut edges: Vec<EdgeIndex> = self
            .inner
            .edges_directed(idx, direction)
            .map(|edge| edge.id())
            .collect();
        edges.sort();
        edges
    }

    fn endpoints(&self, edge: EdgeIndex) -> (NodeIndex, NodeIndex) {
        // Only called with indices taken from this graph
        self.inner
            .edge_endpoints(edge)
            .unwrap_or((NodeIndex::end(), NodeIndex::end()))
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
