//! Nodes of the gene-reaction association graph
//!
//! Every reaction, gene and gene group of a [`Model`](crate::metabolic_model::model::Model) is
//! stored as a [`Node`] in the model's arena, and is addressed by a [`NodeId`]. The node holds
//! the parent and child relations, which are always modified in pairs by the model.
use std::fmt::{Display, Formatter};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::evidence::EvidenceId;
use crate::metabolic_model::gene::{Gene, GeneGroup};
use crate::metabolic_model::multiset::NodeMultiset;
use crate::metabolic_model::reaction::Reaction;

/// Stable handle of a node in the model arena
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What relations a node is allowed to take part in
pub trait Capabilities {
    /// Whether the node may have children
    fn accepts_children(&self) -> bool;
    /// Whether the node may have parents
    fn accepts_parents(&self) -> bool;
}

impl Capabilities for Reaction {
    fn accepts_children(&self) -> bool {
        true
    }
    fn accepts_parents(&self) -> bool {
        false
    }
}

impl Capabilities for Gene {
    fn accepts_children(&self) -> bool {
        false
    }
    fn accepts_parents(&self) -> bool {
        true
    }
}

impl Capabilities for GeneGroup {
    fn accepts_children(&self) -> bool {
        true
    }
    fn accepts_parents(&self) -> bool {
        true
    }
}

/// The closed set of node variants
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Reaction(Reaction),
    Gene(Gene),
    GeneGroup(GeneGroup),
}

impl NodeKind {
    /// Identifier of the wrapped entity
    pub fn id(&self) -> &str {
        match self {
            NodeKind::Reaction(r) => &r.id,
            NodeKind::Gene(g) => &g.id,
            NodeKind::GeneGroup(g) => &g.id,
        }
    }

    /// Short name of the variant, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeKind::Reaction(_) => "reaction",
            NodeKind::Gene(_) => "gene",
            NodeKind::GeneGroup(_) => "gene group",
        }
    }
}

impl Capabilities for NodeKind {
    fn accepts_children(&self) -> bool {
        match self {
            NodeKind::Reaction(r) => r.accepts_children(),
            NodeKind::Gene(g) => g.accepts_children(),
            NodeKind::GeneGroup(g) => g.accepts_children(),
        }
    }

    fn accepts_parents(&self) -> bool {
        match self {
            NodeKind::Reaction(r) => r.accepts_parents(),
            NodeKind::Gene(g) => g.accepts_parents(),
            NodeKind::GeneGroup(g) => g.accepts_parents(),
        }
    }
}

/// A node of the association graph
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub(crate) children: NodeMultiset,
    pub(crate) parents: NodeMultiset,
    pub(crate) evidences: IndexSet<EvidenceId>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Node {
        Node {
            kind,
            children: NodeMultiset::new(),
            parents: NodeMultiset::new(),
            evidences: IndexSet::new(),
        }
    }

    pub fn id(&self) -> &str {
        self.kind.id()
    }

    pub fn children(&self) -> &NodeMultiset {
        &self.children
    }

    pub fn parents(&self) -> &NodeMultiset {
        &self.parents
    }

    /// Evidences that reference this node
    pub fn evidences(&self) -> &IndexSet<EvidenceId> {
        &self.evidences
    }

    pub fn as_reaction(&self) -> Option<&Reaction> {
        match &self.kind {
            NodeKind::Reaction(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_gene(&self) -> Option<&Gene> {
        match &self.kind {
            NodeKind::Gene(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&GeneGroup> {
        match &self.kind {
            NodeKind::GeneGroup(g) => Some(g),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::gene::GroupType;

    #[test]
    fn capabilities() {
        let reaction = NodeKind::Reaction(Reaction::new("r"));
        let gene = NodeKind::Gene(Gene::new("g"));
        let group = NodeKind::GeneGroup(GeneGroup::new(GroupType::And));
        assert!(reaction.accepts_children() && !reaction.accepts_parents());
        assert!(!gene.accepts_children() && gene.accepts_parents());
        assert!(group.accepts_children() && group.accepts_parents());
    }
}
