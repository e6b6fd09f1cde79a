use super::{Coordinates, DominanceTree};
use serde::Serialize;
use std::cmp::Ordering;

/// Sizes aggregated over a dominance tree
///
/// A node's `tree_size` is its own size plus the tree sizes of every node it
/// immediately dominates. Shared dependencies are attributed once, to their
/// dominator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencySizeTree {
    pub node: Coordinates,
    pub size: Option<u64>,
    pub tree_size: u64,
    pub children: Vec<DependencySizeTree>,
}

impl DependencySizeTree {
    pub fn from_dominance_tree<S, C>(tree: &DominanceTree, size: S, comparator: C) -> Self
    where
        S: Fn(&Coordinates) -> Option<u64>,
        C: Fn(&DependencySizeTree, &DependencySizeTree) -> Ordering,
    {
        let children = tree.children_by_index();
        let root = tree.root_index();

        // Preorder puts every node after its dominator
        let mut preorder = Vec::with_capacity(children.len());
        let mut stack = vec![root];
        while let Some(index) = stack.pop() {
            preorder.push(index);
            stack.extend(children[index].iter().copied());
        }

        let mut built: Vec<Option<DependencySizeTree>> = vec![None; children.len()];
        for &index in preorder.iter().skip(1).rev() {
            let subtrees = children[index].iter().filter_map(|&c| built[c].take()).collect();
            built[index] = Some(aggregate(
                tree.node_at(index).coordinates(),
                subtrees,
                &size,
                &comparator,
            ));
        }

        let subtrees = children[root].iter().filter_map(|&c| built[c].take()).collect();
        aggregate(tree.node_at(root).coordinates(), subtrees, &size, &comparator)
    }

    /// Largest subtree first, then by coordinates
    pub fn by_tree_size_descending(a: &Self, b: &Self) -> Ordering {
        b.tree_size
            .cmp(&a.tree_size)
            .then_with(|| a.node.cmp(&b.node))
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this tree, itself included
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn find(&self, identifier: &str) -> Option<&DependencySizeTree> {
        self.iter().find(|t| t.node.identifier == identifier)
    }

    /// Every subtree in preorder, this one first
    pub fn iter(&self) -> impl Iterator<Item = &DependencySizeTree> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }
}

// Deep chains would otherwise drop recursively
impl Drop for DependencySizeTree {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut child) = pending.pop() {
            pending.append(&mut child.children);
        }
    }
}

fn aggregate<S, C>(
    node: &Coordinates,
    mut children: Vec<DependencySizeTree>,
    size: &S,
    comparator: &C,
) -> DependencySizeTree
where
    S: Fn(&Coordinates) -> Option<u64>,
    C: Fn(&DependencySizeTree, &DependencySizeTree) -> Ordering,
{
    children.sort_by(|a, b| comparator(a, b));

    let own = size(node);
    let tree_size = own.unwrap_or(0) + children.iter().map(|c| c.tree_size).sum::<u64>();

    DependencySizeTree {
        node: node.clone(),
        size: own,
        tree_size,
        children,
    }
}
