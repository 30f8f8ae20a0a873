//! Rendering of the gene tree of a reaction into a textual gene protein reaction rule
use crate::metabolic_model::model::{GraphError, Model};
use crate::metabolic_model::node::{Node, NodeId, NodeKind};

impl Model {
    /// Generate the GPR string of a reaction from its gene tree
    ///
    /// A reaction without children renders as an empty string. Several top level children are
    /// joined with " or ", matching how [`Model::functional`] evaluates them.
    ///
    /// # Examples
    /// ```rust
    /// use gemkit_core::metabolic_model::model::Model;
    /// use gemkit_core::metabolic_model::reaction::Reaction;
    /// let mut model = Model::new_empty();
    /// let r = model.add_reaction(Reaction::new("PFK")).unwrap();
    /// model.add_gene_rule(r, "b3916 or b1723").unwrap();
    /// assert_eq!(model.gene_reaction_rule(r).unwrap(), "b3916 or b1723");
    /// ```
    pub fn gene_reaction_rule(&self, reaction: NodeId) -> Result<String, GraphError> {
        let node = self.node(reaction)?;
        if node.as_reaction().is_none() {
            return Err(GraphError::WrongKind(reaction, "reaction"));
        }
        let mut rules = self.child_rules(node)?;
        if rules.len() == 1 {
            return Ok(rules.remove(0));
        }
        Ok(rules
            .into_iter()
            .map(parenthesize)
            .collect::<Vec<_>>()
            .join(" or "))
    }

    /// Generate the GPR string of a gene or gene group
    ///
    /// A gene renders as its id. A group joins its children with its operator, wrapping any child
    /// that is itself a compound expression in parentheses. Children rendering to an empty string
    /// are skipped.
    pub fn gem_reaction_rule(&self, id: NodeId) -> Result<String, GraphError> {
        let node = self.node(id)?;
        match &node.kind {
            NodeKind::Gene(gene) => Ok(gene.id.clone()),
            NodeKind::GeneGroup(group) => Ok(self
                .child_rules(node)?
                .into_iter()
                .map(parenthesize)
                .collect::<Vec<_>>()
                .join(group.group_type.separator())),
            NodeKind::Reaction(_) => self.gene_reaction_rule(id),
        }
    }

    fn child_rules(&self, node: &Node) -> Result<Vec<String>, GraphError> {
        let mut rules = Vec::new();
        for child in node.children.iter() {
            let rule = self.gem_reaction_rule(child)?;
            if !rule.is_empty() {
                rules.push(rule);
            }
        }
        Ok(rules)
    }
}

/// Wrap a rule in parentheses if it contains the text `and` or `or` and isn't already wrapped
///
/// The check is on the literal text, so a child gene such as `Cordoba1` is wrapped as well.
fn parenthesize(rule: String) -> String {
    if contains_operator(&rule) && !is_fully_parenthesized(&rule) {
        format!("({})", rule)
    } else {
        rule
    }
}

fn contains_operator(rule: &str) -> bool {
    rule.contains("and") || rule.contains("or")
}

/// Whether the opening parenthesis at the start of `rule` is closed by its last character
fn is_fully_parenthesized(rule: &str) -> bool {
    if !(rule.starts_with('(') && rule.ends_with(')')) {
        return false;
    }
    let mut depth = 0usize;
    let last = rule.len() - 1;
    for (i, c) in rule.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == last;
                }
            }
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::gene::{Gene, GeneGroup, GroupType};
    use crate::metabolic_model::model::tests::and_or_model;
    use crate::metabolic_model::reaction::Reaction;

    #[test]
    fn nested_rule() {
        let (model, r, _) = and_or_model();
        assert_eq!(
            model.gene_reaction_rule(r).unwrap(),
            "gene1 and (gene2 or gene3)"
        );
    }

    #[test]
    fn single_gene_and_empty_reaction() {
        let mut model = Model::new_empty();
        let r = model.add_reaction(Reaction::new("r")).unwrap();
        assert_eq!(model.gene_reaction_rule(r).unwrap(), "");
        let g = model.add_gene(Gene::new("b0001")).unwrap();
        model.add_child(r, g).unwrap();
        assert_eq!(model.gene_reaction_rule(r).unwrap(), "b0001");
        assert_eq!(model.gem_reaction_rule(g).unwrap(), "b0001");
    }

    #[test]
    fn gene_ids_containing_operator_words() {
        let mut model = Model::new_empty();
        let r = model.add_reaction(Reaction::new("r")).unwrap();
        let group = model.add_gene_group(GeneGroup::new(GroupType::And));
        let a = model.add_gene(Gene::new("gene1")).unwrap();
        let b = model.add_gene(Gene::new("Cordoba1")).unwrap();
        model.add_child(r, group).unwrap();
        model.add_child(group, a).unwrap();
        model.add_child(group, b).unwrap();
        assert_eq!(
            model.gene_reaction_rule(r).unwrap(),
            "gene1 and (Cordoba1)"
        );
        // A lone gene isn't wrapped
        assert_eq!(model.gem_reaction_rule(b).unwrap(), "Cordoba1");
    }

    #[test]
    fn empty_groups_are_skipped() {
        let mut model = Model::new_empty();
        let r = model.add_reaction(Reaction::new("r")).unwrap();
        let or = model.add_gene_group(GeneGroup::new(GroupType::Or));
        let empty = model.add_gene_group(GeneGroup::new(GroupType::And));
        let g = model.add_gene(Gene::new("g")).unwrap();
        model.add_child(r, or).unwrap();
        model.add_child(or, empty).unwrap();
        model.add_child(or, g).unwrap();
        assert_eq!(model.gene_reaction_rule(r).unwrap(), "g");
    }

    #[test]
    fn several_top_level_children() {
        let (mut model, r, _) = and_or_model();
        let g4 = model.add_gene(Gene::new("gene4")).unwrap();
        model.add_child(r, g4).unwrap();
        assert_eq!(
            model.gene_reaction_rule(r).unwrap(),
            "(gene1 and (gene2 or gene3)) or gene4"
        );
    }

    #[test]
    fn only_reactions_have_a_gene_reaction_rule() {
        let (model, _, [g1, _, _]) = and_or_model();
        assert_eq!(
            model.gene_reaction_rule(g1),
            Err(GraphError::WrongKind(g1, "reaction"))
        );
    }

    #[test]
    fn parenthesis_detection() {
        assert!(is_fully_parenthesized("(a or b)"));
        assert!(is_fully_parenthesized("((a or b) and c)"));
        assert!(!is_fully_parenthesized("(a or b) and (c or d)"));
        assert!(contains_operator("gene_or1"));
        assert!(contains_operator("sandA"));
        assert!(!contains_operator("a OR b"));
        assert!(!contains_operator("Rv0001"));
        assert_eq!(parenthesize("a and b".to_string()), "(a and b)");
        assert_eq!(parenthesize("(a and b)".to_string()), "(a and b)");
        assert_eq!(
            parenthesize("(a or b) and c".to_string()),
            "((a or b) and c)"
        );
    }
}
