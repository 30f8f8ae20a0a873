//! Module for parsing Gene Protein Reaction strings into gene trees

use thiserror::Error;
use tracing::debug;

use crate::io::gpr_parse::lexer::LexerError;
use crate::io::gpr_parse::parser::{GprExpr, ParseError};
use crate::metabolic_model::gene::{Gene, GeneGroup};
use crate::metabolic_model::model::{GraphError, Model};
use crate::metabolic_model::node::NodeId;

pub mod lexer;
pub mod parser;
pub mod token;

/// Parse a Gene Protein Reaction string into a GPR expression
///
/// # Parameters
/// - `input`: &str representing the gene protein reaction rule
///
/// # Returns
/// Parse result which is
/// - `Ok`: The root of the parsed expression
/// - `Err`: Returns the GprParseError describing the issue with the GPR rule which
///     was being parsed.
///
/// # Examples
/// ```rust
/// use gemkit_core::io::gpr_parse::parse_gpr;
/// let gpr: &str = "Rv0001 and Rv0002";
/// let gpr_tree = parse_gpr(gpr).unwrap();
/// ```
pub fn parse_gpr(input: &str) -> Result<GprExpr, GprParseError> {
    // Convert the GPR string into tokens
    let tokens = lexer::Lexer::new(input).lex()?;
    // Now parse those tokens into a GPR tree
    let gpr = parser::GPRParser::new(tokens).parse()?;
    Ok(gpr)
}

/// Enum representing possible lex and parse errors
#[derive(Debug, Error, PartialEq)]
pub enum GprParseError {
    /// Lexing Error
    #[error("Error occurred during lexing (conversion of GPR string to tokens)")]
    LexingError(#[from] LexerError),
    /// Parsing Error
    #[error("Error occurred during parsing (conversion of tokens to GPR tree)")]
    ParsingError(#[from] ParseError),
    /// The parsed tree could not be attached to the model
    #[error("Unable to attach the parsed rule to the model")]
    GraphError(#[from] GraphError),
}

impl Model {
    /// Parse `rule` and attach it as a new top level child of `reaction`
    ///
    /// Genes missing from the model are created. An empty rule leaves the reaction unchanged.
    /// Returns the root node that was attached, if any.
    pub fn add_gene_rule(
        &mut self,
        reaction: NodeId,
        rule: &str,
    ) -> Result<Option<NodeId>, GprParseError> {
        self.reaction(reaction)?;
        if rule.trim().is_empty() {
            return Ok(None);
        }
        let expr = parse_gpr(rule)?;
        let root = self.materialize(&expr)?;
        self.add_child(reaction, root)?;
        debug!("Attached rule `{}` to reaction {}", rule, reaction);
        Ok(Some(root))
    }

    fn materialize(&mut self, expr: &GprExpr) -> Result<NodeId, GraphError> {
        match expr {
            GprExpr::Gene(id) => match self.gene_id(id) {
                Some(gene) => Ok(gene),
                None => self.add_gene(Gene::new(id)),
            },
            GprExpr::Group(group_type, operands) => {
                let group = self.add_gene_group(GeneGroup::new(*group_type));
                for operand in operands {
                    let child = self.materialize(operand)?;
                    self.add_child(group, child)?;
                }
                Ok(group)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::gene::GroupType;
    use crate::metabolic_model::reaction::Reaction;

    #[test]
    fn test_parse_gpr() {
        let gpr_tree = parse_gpr("Rv0001 and (Rv0002 or Rv0003)").unwrap();
        match gpr_tree {
            GprExpr::Group(GroupType::And, operands) => {
                assert_eq!(operands[0], GprExpr::Gene("Rv0001".to_string()));
                match &operands[1] {
                    GprExpr::Group(GroupType::Or, inner) => assert_eq!(inner.len(), 2),
                    _ => panic!("Incorrect Parse"),
                }
            }
            _ => panic!("Incorrect operation"),
        }
    }

    #[test]
    fn rule_round_trip() {
        let mut model = Model::new_empty();
        let r = model.add_reaction(Reaction::new("r")).unwrap();
        model.add_gene_rule(r, "gene1 and (gene2 or gene3)").unwrap();
        assert_eq!(
            model.gene_reaction_rule(r).unwrap(),
            "gene1 and (gene2 or gene3)"
        );
        assert_eq!(model.gene_ids().count(), 3);
    }

    #[test]
    fn repeated_gene_keeps_its_position() {
        let mut model = Model::new_empty();
        let r = model.add_reaction(Reaction::new("r")).unwrap();
        model.add_gene_rule(r, "a and b and a").unwrap();
        assert_eq!(model.gene_reaction_rule(r).unwrap(), "a and b and a");
        assert_eq!(model.gene_ids().count(), 2);
    }

    #[test]
    fn existing_genes_are_reused() {
        let mut model = Model::new_empty();
        let g = model.add_gene(Gene::new("b0001")).unwrap();
        let r1 = model.add_reaction(Reaction::new("r1")).unwrap();
        let r2 = model.add_reaction(Reaction::new("r2")).unwrap();
        model.add_gene_rule(r1, "b0001").unwrap();
        model.add_gene_rule(r2, "b0001 or b0002").unwrap();
        assert_eq!(model.gene_ids().count(), 2);
        assert_eq!(model.reactions(g).unwrap().len(), 2);
    }

    #[test]
    fn empty_and_invalid_rules() {
        let mut model = Model::new_empty();
        let r = model.add_reaction(Reaction::new("r")).unwrap();
        assert_eq!(model.add_gene_rule(r, "  ").unwrap(), None);
        assert!(matches!(
            model.add_gene_rule(r, "a and"),
            Err(GprParseError::ParsingError(_))
        ));
        assert!(matches!(
            model.add_gene_rule(r, "a ! b"),
            Err(GprParseError::LexingError(_))
        ));
        assert_eq!(model.gene_reaction_rule(r).unwrap(), "");
    }
}
