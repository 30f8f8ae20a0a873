//! Structural simplification of gene trees
use tracing::debug;

use crate::metabolic_model::gene::GroupType;
use crate::metabolic_model::model::{GraphError, Model};
use crate::metabolic_model::node::NodeId;

impl Model {
    /// Simplify the tree below `node` in a single pass
    ///
    /// A gene group with at most one child, or an or-group directly below another or-group, is
    /// spliced out: its children are moved to `parent` (and pruned there) and the group is
    /// detached. Every other node is kept and its children are pruned in turn.
    ///
    /// # Errors
    /// [`GraphError::MissingParent`] if `node` is a gene group that has to be spliced out but
    /// no `parent` was given.
    pub fn prune_gene_tree(
        &mut self,
        node: NodeId,
        parent: Option<NodeId>,
    ) -> Result<(), GraphError> {
        if self.must_collapse(node, parent)? {
            let parent = parent.ok_or(GraphError::MissingParent(node))?;
            debug!("Splicing gene group {} into {}", node, parent);
            for child in self.node(node)?.children.snapshot() {
                self.remove_child(node, child)?;
                self.add_child(parent, child)?;
                self.prune_gene_tree(child, Some(parent))?;
            }
            self.remove_child(parent, node)?;
            self.release_if_orphan_group(node);
        } else {
            for child in self.node(node)?.children.snapshot() {
                if self.contains(child) && self.node(node)?.children.contains(child) {
                    self.prune_gene_tree(child, Some(node))?;
                }
            }
        }
        Ok(())
    }

    fn must_collapse(&self, node: NodeId, parent: Option<NodeId>) -> Result<bool, GraphError> {
        let current = self.node(node)?;
        Ok(match current.as_group() {
            Some(group) => {
                current.children.len() <= 1
                    || (group.group_type == GroupType::Or
                        && parent.and_then(|p| self.group_type(p)) == Some(GroupType::Or))
            }
            None => false,
        })
    }

    /// Prune the gene tree of a reaction until its rule no longer changes
    ///
    /// Returns the final rule.
    ///
    /// # Examples
    /// ```rust
    /// use gemkit_core::metabolic_model::model::Model;
    /// use gemkit_core::metabolic_model::reaction::Reaction;
    /// let mut model = Model::new_empty();
    /// let r = model.add_reaction(Reaction::new("r")).unwrap();
    /// model.add_gene_rule(r, "a or (b or (c and d))").unwrap();
    /// assert_eq!(model.simplify_gene_tree(r).unwrap(), "a or b or (c and d)");
    /// ```
    pub fn simplify_gene_tree(&mut self, reaction: NodeId) -> Result<String, GraphError> {
        let mut rule = self.gene_reaction_rule(reaction)?;
        loop {
            self.prune_gene_tree(reaction, None)?;
            let pruned = self.gene_reaction_rule(reaction)?;
            if pruned == rule {
                return Ok(pruned);
            }
            rule = pruned;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::metabolic_model::gene::{Gene, GeneGroup, GroupType};
    use crate::metabolic_model::model::tests::and_or_model;
    use crate::metabolic_model::model::{GraphError, Model};
    use crate::metabolic_model::reaction::Reaction;

    #[test]
    fn single_child_group_is_spliced() {
        let mut model = Model::new_empty();
        let r = model.add_reaction(Reaction::new("r")).unwrap();
        let group = model.add_gene_group(GeneGroup::new(GroupType::Or));
        let g = model.add_gene(Gene::new("g")).unwrap();
        model.add_child(r, group).unwrap();
        model.add_child(group, g).unwrap();

        model.prune_gene_tree(r, None).unwrap();
        assert!(!model.contains(group));
        assert_eq!(model.node(r).unwrap().children().snapshot(), vec![g]);
        assert_eq!(model.node(g).unwrap().parents().snapshot(), vec![r]);
        assert_eq!(model.gene_reaction_rule(r).unwrap(), "g");
    }

    #[test]
    fn nested_or_groups_flatten() {
        let mut model = Model::new_empty();
        let r = model.add_reaction(Reaction::new("r")).unwrap();
        let outer = model.add_gene_group(GeneGroup::new(GroupType::Or));
        let inner = model.add_gene_group(GeneGroup::new(GroupType::Or));
        let genes: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|id| model.add_gene(Gene::new(id)).unwrap())
            .collect();
        model.add_child(r, outer).unwrap();
        model.add_child(outer, genes[0]).unwrap();
        model.add_child(outer, inner).unwrap();
        model.add_child(inner, genes[1]).unwrap();
        model.add_child(inner, genes[2]).unwrap();
        assert_eq!(model.gene_reaction_rule(r).unwrap(), "a or (b or c)");

        model.prune_gene_tree(r, None).unwrap();
        assert_eq!(model.gene_reaction_rule(r).unwrap(), "a or b or c");
        assert!(!model.contains(inner));
        assert_eq!(model.node(outer).unwrap().children().len(), 3);
    }

    #[test]
    fn and_below_and_is_kept() {
        let mut model = Model::new_empty();
        let r = model.add_reaction(Reaction::new("r")).unwrap();
        model.add_gene_rule(r, "a and (b and c)").unwrap();
        let before = model.gene_reaction_rule(r).unwrap();
        model.prune_gene_tree(r, None).unwrap();
        assert_eq!(model.gene_reaction_rule(r).unwrap(), before);
    }

    #[test]
    fn pruning_is_idempotent() {
        let (mut model, r, _) = and_or_model();
        let extra = model.add_gene_group(GeneGroup::new(GroupType::Or));
        let nested = model.node(r).unwrap().children().snapshot()[0];
        let g4 = model.add_gene(Gene::new("gene4")).unwrap();
        model.add_child(nested, extra).unwrap();
        model.add_child(extra, g4).unwrap();

        let first = model.simplify_gene_tree(r).unwrap();
        assert_eq!(first, "gene1 and (gene2 or gene3) and gene4");
        model.prune_gene_tree(r, None).unwrap();
        assert_eq!(model.gene_reaction_rule(r).unwrap(), first);
    }

    #[test]
    fn childless_reaction_is_untouched() {
        let mut model = Model::new_empty();
        let r = model.add_reaction(Reaction::new("r")).unwrap();
        model.prune_gene_tree(r, None).unwrap();
        assert_eq!(model.gene_reaction_rule(r).unwrap(), "");
    }

    #[test]
    fn orphan_group_needs_parent() {
        let mut model = Model::new_empty();
        let group = model.add_gene_group(GeneGroup::new(GroupType::And));
        let g = model.add_gene(Gene::new("g")).unwrap();
        model.add_child(group, g).unwrap();
        assert_eq!(
            model.prune_gene_tree(group, None),
            Err(GraphError::MissingParent(group))
        );
        // Nothing was moved
        assert_eq!(model.node(group).unwrap().children().snapshot(), vec![g]);
    }
}
