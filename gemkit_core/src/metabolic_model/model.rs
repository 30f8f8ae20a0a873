//! This module provides the Model struct, the arena owning every entity of a metabolic model
//! together with the gene-reaction association graph connecting them
use indexmap::{IndexMap, IndexSet};
use thiserror::Error;
use tracing::debug;

use crate::evidence::reference::Reference;
use crate::evidence::{Evidence, EvidenceId};
use crate::metabolic_model::gene::{Gene, GeneActivity, GeneGroup, GroupType};
use crate::metabolic_model::metabolite::{Compartment, Metabolite};
use crate::metabolic_model::node::{Capabilities, Node, NodeId, NodeKind};
use crate::metabolic_model::reaction::Reaction;

/// Represents a Genome Scale Metabolic Model
///
/// Reactions, genes and gene groups are nodes of an arena and are addressed by [`NodeId`].
/// Nodes don't own each other, every relation is stored on both ends and is only changed
/// through the methods of the model.
#[derive(Clone, Debug, Default)]
pub struct Model {
    /// Id associated with the Model
    pub id: Option<String>,
    nodes: Vec<Option<Node>>,
    /// Map of reaction ids to their node
    reactions: IndexMap<String, NodeId>,
    /// Map of gene ids to their node
    genes: IndexMap<String, NodeId>,
    pub(crate) metabolites: IndexMap<String, Metabolite>,
    pub(crate) compartments: IndexMap<String, Compartment>,
    pub(crate) references: IndexMap<String, Reference>,
    pub(crate) evidences: IndexMap<EvidenceId, Evidence>,
}

/// Errors raised by structural operations on the association graph
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
    #[error("Node {child} is not present in the relations of {parent}")]
    ItemNotFound { parent: NodeId, child: NodeId },
    #[error("No node with handle {0} in the model")]
    UnknownNode(NodeId),
    #[error("Node {0} is not a {1}")]
    WrongKind(NodeId, &'static str),
    #[error("An entity with id {0} is already part of the model")]
    DuplicateId(String),
    #[error("Invalid gene group type `{0}`, expected `and` or `or`")]
    InvalidGroupType(String),
    #[error("Gene group {0} has to be collapsed but has no parent to receive its children")]
    MissingParent(NodeId),
    #[error("No metabolite with id {0} in the model")]
    UnknownMetabolite(String),
}

impl Model {
    pub fn new_empty() -> Self {
        Model::default()
    }

    // region Entity management

    fn insert_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node::new(kind)));
        id
    }

    /// Add a reaction to the model
    ///
    /// # Examples
    /// ```rust
    /// use gemkit_core::metabolic_model::model::Model;
    /// use gemkit_core::metabolic_model::reaction::ReactionBuilder;
    /// let mut model = Model::new_empty();
    /// let new_reaction = ReactionBuilder::default().id("new_reaction".to_string()).build().unwrap();
    /// let handle = model.add_reaction(new_reaction).unwrap();
    /// assert_eq!(model.reaction_id("new_reaction"), Some(handle));
    /// ```
    pub fn add_reaction(&mut self, reaction: Reaction) -> Result<NodeId, GraphError> {
        if self.reactions.contains_key(&reaction.id) {
            return Err(GraphError::DuplicateId(reaction.id));
        }
        let key = reaction.id.clone();
        let id = self.insert_node(NodeKind::Reaction(reaction));
        self.reactions.insert(key, id);
        Ok(id)
    }

    /// Add a gene to the model
    ///
    /// # Examples
    /// ```rust
    /// use gemkit_core::metabolic_model::gene::GeneBuilder;
    /// use gemkit_core::metabolic_model::model::Model;
    /// let mut model = Model::new_empty();
    /// let new_gene = GeneBuilder::default().id("new_gene".to_string()).build().unwrap();
    /// model.add_gene(new_gene).unwrap();
    /// ```
    pub fn add_gene(&mut self, gene: Gene) -> Result<NodeId, GraphError> {
        if self.genes.contains_key(&gene.id) {
            return Err(GraphError::DuplicateId(gene.id));
        }
        let key = gene.id.clone();
        let id = self.insert_node(NodeKind::Gene(gene));
        self.genes.insert(key, id);
        Ok(id)
    }

    /// Add a gene group to the model, it is not attached to anything yet
    pub fn add_gene_group(&mut self, group: GeneGroup) -> NodeId {
        self.insert_node(NodeKind::GeneGroup(group))
    }

    pub fn add_metabolite(&mut self, metabolite: Metabolite) -> Result<(), GraphError> {
        if self.metabolites.contains_key(&metabolite.id) {
            return Err(GraphError::DuplicateId(metabolite.id));
        }
        self.metabolites.insert(metabolite.id.clone(), metabolite);
        Ok(())
    }

    pub fn add_compartment(&mut self, compartment: Compartment) -> Result<(), GraphError> {
        if self.compartments.contains_key(&compartment.id) {
            return Err(GraphError::DuplicateId(compartment.id));
        }
        self.compartments.insert(compartment.id.clone(), compartment);
        Ok(())
    }

    /// Set the stoichiometric coefficient of a metabolite in a reaction
    pub fn set_stoichiometry(
        &mut self,
        reaction: NodeId,
        metabolite: &str,
        coefficient: f64,
    ) -> Result<(), GraphError> {
        if !self.metabolites.contains_key(metabolite) {
            return Err(GraphError::UnknownMetabolite(metabolite.to_string()));
        }
        self.reaction_mut(reaction)?
            .metabolites
            .insert(metabolite.to_string(), coefficient);
        Ok(())
    }

    /// Remove a reaction from the model, detaching its gene tree and deleting its evidences
    pub fn remove_reaction(&mut self, id: &str) -> Result<(), GraphError> {
        match self.reactions.get(id) {
            Some(&node) => self.remove_node(node),
            None => Ok(()),
        }
    }

    /// Remove a gene from the model, detaching it from every reaction and group
    pub fn remove_gene(&mut self, id: &str) -> Result<(), GraphError> {
        match self.genes.get(id) {
            Some(&node) => self.remove_node(node),
            None => Ok(()),
        }
    }

    /// Remove a node from the model
    ///
    /// The node is detached from the graph (see [`Model::prepare_deletion`]) and every evidence
    /// referencing it is removed.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), GraphError> {
        self.prepare_deletion(id)?;
        self.release(id);
        Ok(())
    }

    /// Drop a node from the arena, it has to be detached already
    fn release(&mut self, id: NodeId) {
        self.remove_all_evidences(&crate::evidence::ItemRef::Node(id));
        if let Some(slot) = self.nodes.get_mut(id.0) {
            if let Some(node) = slot.take() {
                match node.kind {
                    NodeKind::Reaction(r) => {
                        self.reactions.shift_remove(&r.id);
                    }
                    NodeKind::Gene(g) => {
                        self.genes.shift_remove(&g.id);
                    }
                    NodeKind::GeneGroup(_) => {}
                }
            }
        }
    }

    /// Release a gene group that is no longer attached to anything
    pub(crate) fn release_if_orphan_group(&mut self, id: NodeId) {
        let orphan = match self.node(id) {
            Ok(node) => node.as_group().is_some() && node.parents.is_empty(),
            Err(_) => false,
        };
        if orphan {
            debug!("Releasing detached gene group {}", id);
            // Its children were moved or deleted before it became an orphan
            let remaining = self.node(id).map(|n| n.children.snapshot()).unwrap_or_default();
            for child in remaining {
                let _ = self.remove_child_all(id, child);
            }
            self.release(id);
        }
    }

    /// Release every gene group without parents, returns how many were released
    pub fn purge_orphan_groups(&mut self) -> usize {
        let orphans: Vec<NodeId> = self
            .node_ids()
            .filter(|id| {
                self.node(*id)
                    .map(|n| n.as_group().is_some() && n.parents.is_empty())
                    .unwrap_or(false)
            })
            .collect();
        for id in &orphans {
            let _ = self.delete_children(*id);
            self.release(*id);
        }
        orphans.len()
    }

    // endregion Entity management

    // region Accessors

    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id.0), Some(Some(_)))
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, GraphError> {
        match self.nodes.get(id.0) {
            Some(Some(node)) => Ok(node),
            _ => Err(GraphError::UnknownNode(id)),
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, GraphError> {
        match self.nodes.get_mut(id.0) {
            Some(Some(node)) => Ok(node),
            _ => Err(GraphError::UnknownNode(id)),
        }
    }

    /// Handles of every node currently in the model
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| NodeId(i)))
    }

    pub fn reaction_id(&self, id: &str) -> Option<NodeId> {
        self.reactions.get(id).copied()
    }

    pub fn gene_id(&self, id: &str) -> Option<NodeId> {
        self.genes.get(id).copied()
    }

    /// Handles of all reactions, in insertion order
    pub fn reaction_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.reactions.values().copied()
    }

    /// Handles of all genes, in insertion order
    pub fn gene_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.genes.values().copied()
    }

    pub fn reaction(&self, id: NodeId) -> Result<&Reaction, GraphError> {
        self.node(id)?
            .as_reaction()
            .ok_or(GraphError::WrongKind(id, "reaction"))
    }

    pub fn reaction_mut(&mut self, id: NodeId) -> Result<&mut Reaction, GraphError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Reaction(r) => Ok(r),
            _ => Err(GraphError::WrongKind(id, "reaction")),
        }
    }

    pub fn gene(&self, id: NodeId) -> Result<&Gene, GraphError> {
        self.node(id)?
            .as_gene()
            .ok_or(GraphError::WrongKind(id, "gene"))
    }

    pub fn gene_mut(&mut self, id: NodeId) -> Result<&mut Gene, GraphError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Gene(g) => Ok(g),
            _ => Err(GraphError::WrongKind(id, "gene")),
        }
    }

    pub fn gene_group(&self, id: NodeId) -> Result<&GeneGroup, GraphError> {
        self.node(id)?
            .as_group()
            .ok_or(GraphError::WrongKind(id, "gene group"))
    }

    pub fn gene_group_mut(&mut self, id: NodeId) -> Result<&mut GeneGroup, GraphError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::GeneGroup(g) => Ok(g),
            _ => Err(GraphError::WrongKind(id, "gene group")),
        }
    }

    /// Type of the group if `id` is a gene group
    pub(crate) fn group_type(&self, id: NodeId) -> Option<GroupType> {
        self.node(id)
            .ok()
            .and_then(|n| n.as_group())
            .map(|g| g.group_type)
    }

    pub fn metabolite(&self, id: &str) -> Option<&Metabolite> {
        self.metabolites.get(id)
    }

    pub fn metabolites(&self) -> impl Iterator<Item = &Metabolite> {
        self.metabolites.values()
    }

    pub fn compartment(&self, id: &str) -> Option<&Compartment> {
        self.compartments.get(id)
    }

    pub fn compartments(&self) -> impl Iterator<Item = &Compartment> {
        self.compartments.values()
    }

    // endregion Accessors

    // region Association graph

    /// Check that `parent` may receive `child` as a child
    fn check_link(&self, parent: NodeId, child: NodeId) -> Result<(), GraphError> {
        let parent_node = self.node(parent)?;
        let child_node = self.node(child)?;
        if !parent_node.kind.accepts_children() {
            return Err(GraphError::UnsupportedOperation(format!(
                "a {} can't have children",
                parent_node.kind.kind_name()
            )));
        }
        if !child_node.kind.accepts_parents() {
            return Err(GraphError::UnsupportedOperation(format!(
                "a {} can't have parents",
                child_node.kind.kind_name()
            )));
        }
        Ok(())
    }

    /// Append `child` to the children of `parent`, and `parent` to the parents of `child`
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), GraphError> {
        self.check_link(parent, child)?;
        self.node_mut(parent)?.children.insert(child);
        self.node_mut(child)?.parents.insert(parent);
        Ok(())
    }

    /// Append `parent` to the parents of `child`, same as [`Model::add_child`] from the other end
    pub fn add_parent(&mut self, child: NodeId, parent: NodeId) -> Result<(), GraphError> {
        self.add_child(parent, child)
    }

    /// Remove one occurrence of `child` from `parent`
    ///
    /// # Errors
    /// [`GraphError::ItemNotFound`] if `child` is not a child of `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), GraphError> {
        self.check_link(parent, child)?;
        if !self.node_mut(parent)?.children.remove_one(child) {
            return Err(GraphError::ItemNotFound { parent, child });
        }
        self.node_mut(child)?.parents.remove_one(parent);
        Ok(())
    }

    /// Remove every occurrence of `child` from `parent`, doing nothing if there are none
    pub fn remove_child_all(&mut self, parent: NodeId, child: NodeId) -> Result<(), GraphError> {
        self.check_link(parent, child)?;
        self.node_mut(parent)?.children.remove_all(child);
        self.node_mut(child)?.parents.remove_all(parent);
        Ok(())
    }

    /// Remove one occurrence of `parent` from the parents of `child`
    pub fn remove_parent(&mut self, child: NodeId, parent: NodeId) -> Result<(), GraphError> {
        self.remove_child(parent, child)
    }

    /// Remove every occurrence of `parent` from the parents of `child`
    pub fn remove_parent_all(&mut self, child: NodeId, parent: NodeId) -> Result<(), GraphError> {
        self.remove_child_all(parent, child)
    }

    /// Recursively detach and empty the subtree below `id`
    ///
    /// Each child first deletes its own children, then is unlinked from `id`. Gene groups left
    /// without any parent are released from the model, genes are kept.
    pub fn delete_children(&mut self, id: NodeId) -> Result<(), GraphError> {
        let children: Vec<NodeId> = self.node(id)?.children.distinct().collect();
        for child in children {
            if !self.contains(child) {
                continue;
            }
            self.delete_children(child)?;
            self.node_mut(id)?.children.remove_all(child);
            self.node_mut(child)?.parents.remove_all(id);
            self.release_if_orphan_group(child);
        }
        self.node_mut(id)?.children.clear();
        Ok(())
    }

    /// Detach a node from the graph before it is removed from the model
    ///
    /// The node is unlinked from all of its parents, then its subtree is deleted.
    pub fn prepare_deletion(&mut self, id: NodeId) -> Result<(), GraphError> {
        let parents: Vec<NodeId> = self.node(id)?.parents.distinct().collect();
        for parent in parents {
            self.remove_child_all(parent, id)?;
        }
        self.delete_children(id)
    }

    /// All genes reachable below `id`, a gene returns itself
    pub fn genes(&self, id: NodeId) -> Result<IndexSet<NodeId>, GraphError> {
        let mut found = IndexSet::new();
        self.collect_genes(id, &mut found)?;
        Ok(found)
    }

    fn collect_genes(&self, id: NodeId, found: &mut IndexSet<NodeId>) -> Result<(), GraphError> {
        let node = self.node(id)?;
        if let NodeKind::Gene(_) = node.kind {
            found.insert(id);
            return Ok(());
        }
        for child in node.children.distinct() {
            self.collect_genes(child, found)?;
        }
        Ok(())
    }

    /// All reactions reachable above `id`, a reaction returns itself
    pub fn reactions(&self, id: NodeId) -> Result<IndexSet<NodeId>, GraphError> {
        let mut found = IndexSet::new();
        self.collect_reactions(id, &mut found)?;
        Ok(found)
    }

    fn collect_reactions(
        &self,
        id: NodeId,
        found: &mut IndexSet<NodeId>,
    ) -> Result<(), GraphError> {
        let node = self.node(id)?;
        if let NodeKind::Reaction(_) = node.kind {
            found.insert(id);
            return Ok(());
        }
        for parent in node.parents.distinct() {
            self.collect_reactions(parent, found)?;
        }
        Ok(())
    }

    // endregion Association graph

    // region Functional evaluation

    /// Evaluate whether a node is functional
    ///
    /// - A gene returns its activity.
    /// - A gene group returns `None` if it has no children, otherwise the conjunction (and) or
    ///   disjunction (or) of its children, where an undefined child counts as not functional.
    /// - A reaction is functional if any child is functional, not functional if no child is
    ///   functional but at least one is not, and functional otherwise (no children, or only
    ///   undefined children).
    pub fn functional(&self, id: NodeId) -> Result<Option<bool>, GraphError> {
        let node = self.node(id)?;
        match &node.kind {
            NodeKind::Gene(gene) => Ok(Some(gene.is_functional())),
            NodeKind::GeneGroup(group) => {
                if node.children.is_empty() {
                    return Ok(None);
                }
                let mut results = Vec::with_capacity(node.children.len());
                for child in node.children.iter() {
                    results.push(self.functional(child)?);
                }
                Ok(Some(match group.group_type {
                    GroupType::And => results.iter().all(|r| *r == Some(true)),
                    GroupType::Or => results.iter().any(|r| *r == Some(true)),
                }))
            }
            NodeKind::Reaction(_) => {
                let mut results = IndexSet::new();
                for child in node.children.distinct() {
                    results.insert(self.functional(child)?);
                }
                if results.contains(&Some(true)) {
                    Ok(Some(true))
                } else if results.contains(&Some(false)) {
                    Ok(Some(false))
                } else {
                    Ok(Some(true))
                }
            }
        }
    }

    /// Evaluate whether a reaction is functional given the activity of its genes
    pub fn reaction_functional(&self, id: NodeId) -> Result<bool, GraphError> {
        self.reaction(id)?;
        Ok(self.functional(id)?.unwrap_or(true))
    }

    /// Set the activity of a gene
    pub fn set_gene_activity(
        &mut self,
        id: NodeId,
        activity: GeneActivity,
    ) -> Result<(), GraphError> {
        self.gene_mut(id)?.activity = activity;
        Ok(())
    }

    // endregion Functional evaluation
}
