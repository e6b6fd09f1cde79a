use crate::graph::DependencySizeTree;
use std::fmt::Write;

const SLASH: &str = "\\--- ";
const PLUS: &str = "+--- ";
const TAB: &str = "     ";
const PIPE: &str = "|    ";

/// Binary unit every size in one printed tree is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SizeScale {
    B,
    KiB,
    MiB,
    GiB,
    TiB,
}

impl SizeScale {
    const ALL: [SizeScale; 5] = [
        SizeScale::TiB,
        SizeScale::GiB,
        SizeScale::MiB,
        SizeScale::KiB,
        SizeScale::B,
    ];

    pub fn divisor(self) -> u64 {
        match self {
            SizeScale::B => 1,
            SizeScale::KiB => 1 << 10,
            SizeScale::MiB => 1 << 20,
            SizeScale::GiB => 1 << 30,
            SizeScale::TiB => 1 << 40,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            SizeScale::B => "B",
            SizeScale::KiB => "KiB",
            SizeScale::MiB => "MiB",
            SizeScale::GiB => "GiB",
            SizeScale::TiB => "TiB",
        }
    }

    /// Largest unit in which `total` is still more than five units
    pub fn for_total(total: u64) -> Self {
        Self::ALL
            .into_iter()
            .find(|scale| total / scale.divisor() > 5)
            .unwrap_or(SizeScale::B)
    }

    pub fn format(self, bytes: u64) -> String {
        format!("{:.2} {}", bytes as f64 / self.divisor() as f64, self.unit())
    }
}

/// Renders a size tree as indented text
///
/// Inner nodes print their tree size, then their own size in parentheses
/// when known. Leaves print their own size only.
pub struct DominanceTreeWriter {
    scale: Option<SizeScale>,
}

impl DominanceTreeWriter {
    pub fn new() -> Self {
        Self { scale: None }
    }

    /// Fix the unit instead of deriving it from the root's tree size
    pub fn with_scale(mut self, scale: SizeScale) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn render(&self, tree: &DependencySizeTree) -> String {
        let scale = self
            .scale
            .unwrap_or_else(|| SizeScale::for_total(tree.tree_size));

        let mut out = String::new();
        out.push_str(&node_text(tree, scale));
        out.push('\n');

        // (subtree, prefix inherited from its ancestors, is last sibling)
        let mut stack: Vec<(&DependencySizeTree, String, bool)> = Vec::new();
        push_children(&mut stack, tree, String::new());
        while let Some((node, prefix, is_last)) = stack.pop() {
            out.push_str(&prefix);
            out.push_str(if is_last { SLASH } else { PLUS });
            out.push_str(&node_text(node, scale));
            out.push('\n');

            let child_prefix = format!("{}{}", prefix, if is_last { TAB } else { PIPE });
            push_children(&mut stack, node, child_prefix);
        }
        out
    }
}

impl Default for DominanceTreeWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_children<'t>(
    stack: &mut Vec<(&'t DependencySizeTree, String, bool)>,
    tree: &'t DependencySizeTree,
    prefix: String,
) {
    let count = tree.children.len();
    for (i, child) in tree.children.iter().enumerate().rev() {
        stack.push((child, prefix.clone(), i + 1 == count));
    }
}

fn node_text(tree: &DependencySizeTree, scale: SizeScale) -> String {
    let mut text = String::new();
    if !tree.is_leaf() {
        let _ = write!(text, "{} ", scale.format(tree.tree_size));
        if let Some(size) = tree.size {
            let _ = write!(text, "({}) ", scale.format(size));
        }
    } else if let Some(size) = tree.size {
        let _ = write!(text, "{} ", scale.format(size));
    }
    text.push_str(&tree.node.gav());
    text
}
