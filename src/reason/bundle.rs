use crate::graph::Coordinates;
use serde::{Deserialize, Serialize};

/// Records why a bundle rule suppressed or substituted advice
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BundleTrace {
    /// The child needs no declaration because its parent is declared
    DeclaredParent { parent: Coordinates, child: Coordinates },

    /// The parent needs no declaration because a child is declared and used
    UsedChild { parent: Coordinates, child: Coordinates },

    /// The primary was advised in place of the subordinate
    PrimaryMap {
        primary: Coordinates,
        subordinate: Coordinates,
    },
}

impl BundleTrace {
    pub fn top(&self) -> &Coordinates {
        match self {
            BundleTrace::DeclaredParent { parent, .. } => parent,
            BundleTrace::UsedChild { parent, .. } => parent,
            BundleTrace::PrimaryMap { primary, .. } => primary,
        }
    }

    pub fn bottom(&self) -> &Coordinates {
        match self {
            BundleTrace::DeclaredParent { child, .. } => child,
            BundleTrace::UsedChild { child, .. } => child,
            BundleTrace::PrimaryMap { subordinate, .. } => subordinate,
        }
    }

    pub fn involves(&self, coordinates: &Coordinates) -> bool {
        let gav = coordinates.gav();
        self.top().gav() == gav || self.bottom().gav() == gav
    }
}
