//! Reversible changes applied to a model before checking a test
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::metabolic_model::gene::GeneActivity;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::node::NodeId;
use crate::model_test::SettingError;

/// Flux bounds and objective coefficient of a reaction
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
struct ReactionState {
    lower_bound: f64,
    upper_bound: f64,
    objective_coefficient: f64,
}

/// Overrides the bounds and objective coefficient of a reaction
///
/// # Examples
/// ```rust
/// use gemkit_core::metabolic_model::model::Model;
/// use gemkit_core::metabolic_model::reaction::Reaction;
/// use gemkit_core::model_test::setting::ReactionSetting;
/// let mut model = Model::new_empty();
/// let r = model.add_reaction(Reaction::new("EX_glc")).unwrap();
/// let mut setting = ReactionSetting::new("EX_glc", 0., 0., 0.);
/// setting.apply(&mut model).unwrap();
/// assert!(model.reaction(r).unwrap().is_blocked());
/// setting.undo(&mut model).unwrap();
/// assert_eq!(model.reaction(r).unwrap().lower_bound, -1000.);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReactionSetting {
    /// Id of the reaction
    pub reaction: String,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub objective_coefficient: f64,
    #[serde(skip)]
    saved: Option<ReactionState>,
}

impl ReactionSetting {
    pub fn new(
        reaction: &str,
        lower_bound: f64,
        upper_bound: f64,
        objective_coefficient: f64,
    ) -> ReactionSetting {
        ReactionSetting {
            reaction: reaction.to_string(),
            lower_bound,
            upper_bound,
            objective_coefficient,
            saved: None,
        }
    }

    /// Whether the setting is currently applied
    pub fn is_applied(&self) -> bool {
        self.saved.is_some()
    }

    fn node(&self, model: &Model) -> Result<NodeId, SettingError> {
        model
            .reaction_id(&self.reaction)
            .ok_or_else(|| SettingError::UnknownReaction(self.reaction.clone()))
    }

    /// Save the current state of the reaction and override it
    pub fn apply(&mut self, model: &mut Model) -> Result<(), SettingError> {
        if self.is_applied() {
            return Err(SettingError::AlreadyApplied(self.reaction.clone()));
        }
        let id = self.node(model)?;
        let reaction = model.reaction_mut(id)?;
        self.saved = Some(ReactionState {
            lower_bound: reaction.lower_bound,
            upper_bound: reaction.upper_bound,
            objective_coefficient: reaction.objective_coefficient,
        });
        reaction.lower_bound = self.lower_bound;
        reaction.upper_bound = self.upper_bound;
        reaction.objective_coefficient = self.objective_coefficient;
        debug!(
            "Reaction {} set to [{}, {}], objective {}",
            self.reaction, self.lower_bound, self.upper_bound, self.objective_coefficient
        );
        Ok(())
    }

    /// Restore the saved state, does nothing if the setting isn't applied
    pub fn undo(&mut self, model: &mut Model) -> Result<(), SettingError> {
        let saved = match self.saved {
            Some(saved) => saved,
            None => return Ok(()),
        };
        let id = self.node(model)?;
        let reaction = model.reaction_mut(id)?;
        reaction.lower_bound = saved.lower_bound;
        reaction.upper_bound = saved.upper_bound;
        reaction.objective_coefficient = saved.objective_coefficient;
        self.saved = None;
        Ok(())
    }
}

/// Changes the activity of a gene and blocks the reactions it disables
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneSetting {
    /// Id of the gene
    pub gene: String,
    pub activity: GeneActivity,
    #[serde(skip)]
    saved_activity: Option<GeneActivity>,
    /// Reactions blocked by [`GeneSetting::apply`] with their original bounds, in order
    #[serde(skip)]
    blocked: Vec<(NodeId, f64, f64)>,
}

impl GeneSetting {
    pub fn new(gene: &str, activity: GeneActivity) -> GeneSetting {
        GeneSetting {
            gene: gene.to_string(),
            activity,
            saved_activity: None,
            blocked: Vec::new(),
        }
    }

    /// Whether the setting is currently applied
    pub fn is_applied(&self) -> bool {
        self.saved_activity.is_some()
    }

    fn node(&self, model: &Model) -> Result<NodeId, SettingError> {
        model
            .gene_id(&self.gene)
            .ok_or_else(|| SettingError::UnknownGene(self.gene.clone()))
    }

    /// Set the gene activity and zero the bounds of every reaction that stops being functional
    ///
    /// Reactions with another functional path through their gene tree keep their bounds.
    pub fn apply(&mut self, model: &mut Model) -> Result<(), SettingError> {
        if self.is_applied() {
            return Err(SettingError::AlreadyApplied(self.gene.clone()));
        }
        let gene = self.node(model)?;
        let reactions = model.reactions(gene)?;
        let mut functional_before = Vec::with_capacity(reactions.len());
        for reaction in &reactions {
            functional_before.push(model.reaction_functional(*reaction)?);
        }

        let previous = model.gene(gene)?.activity;
        model.set_gene_activity(gene, self.activity)?;
        self.saved_activity = Some(previous);

        for (reaction, before) in reactions.into_iter().zip(functional_before) {
            if before && !model.reaction_functional(reaction)? {
                let r = model.reaction_mut(reaction)?;
                self.blocked.push((reaction, r.lower_bound, r.upper_bound));
                r.lower_bound = 0.;
                r.upper_bound = 0.;
                info!("Gene {} blocks reaction {}", self.gene, r.id);
            }
        }
        Ok(())
    }

    /// Restore the bounds of the blocked reactions and the previous gene activity
    ///
    /// Does nothing if the setting isn't applied.
    pub fn undo(&mut self, model: &mut Model) -> Result<(), SettingError> {
        let previous = match self.saved_activity {
            Some(previous) => previous,
            None => return Ok(()),
        };
        while let Some((reaction, lower_bound, upper_bound)) = self.blocked.pop() {
            let r = model.reaction_mut(reaction)?;
            r.lower_bound = lower_bound;
            r.upper_bound = upper_bound;
        }
        let gene = self.node(model)?;
        model.set_gene_activity(gene, previous)?;
        self.saved_activity = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::reaction::Reaction;

    #[test]
    fn reaction_setting_restores_exact_values() {
        let mut model = Model::new_empty();
        let mut reaction = Reaction::new("r");
        reaction.lower_bound = -0.1;
        reaction.upper_bound = 123.456;
        reaction.objective_coefficient = 0.3;
        let r = model.add_reaction(reaction.clone()).unwrap();

        let mut setting = ReactionSetting::new("r", 1., 2., 1.);
        setting.apply(&mut model).unwrap();
        assert_eq!(model.reaction(r).unwrap().lower_bound, 1.);
        assert_eq!(model.reaction(r).unwrap().objective_coefficient, 1.);
        assert_eq!(
            setting.apply(&mut model),
            Err(SettingError::AlreadyApplied("r".to_string()))
        );

        setting.undo(&mut model).unwrap();
        assert_eq!(model.reaction(r).unwrap(), &reaction);

        // A second undo leaves later changes alone
        model.reaction_mut(r).unwrap().upper_bound = 5.;
        setting.undo(&mut model).unwrap();
        assert_eq!(model.reaction(r).unwrap().upper_bound, 5.);
    }

    #[test]
    fn unknown_reaction() {
        let mut model = Model::new_empty();
        let mut setting = ReactionSetting::new("missing", 0., 0., 0.);
        assert_eq!(
            setting.apply(&mut model),
            Err(SettingError::UnknownReaction("missing".to_string()))
        );
        assert!(!setting.is_applied());
    }

    fn gene_model() -> (Model, NodeId, NodeId) {
        let mut model = Model::new_empty();
        let mut redundant = Reaction::new("redundant");
        redundant.lower_bound = -10.;
        let redundant = model.add_reaction(redundant).unwrap();
        let mut essential = Reaction::new("essential");
        essential.lower_bound = 0.;
        essential.upper_bound = 7.5;
        let essential = model.add_reaction(essential).unwrap();
        model.add_gene_rule(redundant, "g1 or g2").unwrap();
        model.add_gene_rule(essential, "g1 and g3").unwrap();
        (model, redundant, essential)
    }

    #[test]
    fn gene_setting_blocks_only_disabled_reactions() {
        let (mut model, redundant, essential) = gene_model();
        let mut setting = GeneSetting::new("g1", GeneActivity::Inactive);
        setting.apply(&mut model).unwrap();

        let g1 = model.gene_id("g1").unwrap();
        assert!(!model.gene(g1).unwrap().is_functional());
        assert_eq!(model.reaction(redundant).unwrap().lower_bound, -10.);
        assert_eq!(model.reaction(redundant).unwrap().upper_bound, 1000.);
        assert!(model.reaction(essential).unwrap().is_blocked());

        setting.undo(&mut model).unwrap();
        assert!(model.gene(g1).unwrap().is_functional());
        assert_eq!(model.reaction(essential).unwrap().lower_bound, 0.);
        assert_eq!(model.reaction(essential).unwrap().upper_bound, 7.5);

        model.reaction_mut(essential).unwrap().upper_bound = 3.;
        setting.undo(&mut model).unwrap();
        assert_eq!(model.reaction(essential).unwrap().upper_bound, 3.);
    }

    #[test]
    fn already_disabled_reactions_are_left_alone() {
        let (mut model, _, essential) = gene_model();
        let g3 = model.gene_id("g3").unwrap();
        model.set_gene_activity(g3, GeneActivity::Inactive).unwrap();

        let mut setting = GeneSetting::new("g1", GeneActivity::Inactive);
        setting.apply(&mut model).unwrap();
        assert_eq!(model.reaction(essential).unwrap().upper_bound, 7.5);
        setting.undo(&mut model).unwrap();
        assert!(model.gene(model.gene_id("g1").unwrap()).unwrap().is_functional());
    }
}
