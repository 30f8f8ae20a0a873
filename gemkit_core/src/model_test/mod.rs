//! What-if tests of a model: reversible settings applied before solving, and the fluxes expected
//! from the solution
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::metabolic_model::model::{GraphError, Model};
use crate::model_test::outcome::{Outcome, Solution};
use crate::model_test::setting::{GeneSetting, ReactionSetting};

pub mod outcome;
pub mod setting;

/// Errors raised while applying settings or checking outcomes
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SettingError {
    #[error("No reaction with id {0} in the model")]
    UnknownReaction(String),
    #[error("No gene with id {0} in the model")]
    UnknownGene(String),
    #[error("The setting for {0} is already applied")]
    AlreadyApplied(String),
    #[error("The solution has no flux for reaction {0}")]
    MissingFlux(String),
    #[error("Unable to change the model")]
    Graph(#[from] GraphError),
}

/// A reversible change to a model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Setting {
    Reaction(ReactionSetting),
    Gene(GeneSetting),
}

impl Setting {
    pub fn apply(&mut self, model: &mut Model) -> Result<(), SettingError> {
        match self {
            Setting::Reaction(setting) => setting.apply(model),
            Setting::Gene(setting) => setting.apply(model),
        }
    }

    pub fn undo(&mut self, model: &mut Model) -> Result<(), SettingError> {
        match self {
            Setting::Reaction(setting) => setting.undo(model),
            Setting::Gene(setting) => setting.undo(model),
        }
    }
}

impl From<ReactionSetting> for Setting {
    fn from(value: ReactionSetting) -> Self {
        Setting::Reaction(value)
    }
}

impl From<GeneSetting> for Setting {
    fn from(value: GeneSetting) -> Self {
        Setting::Gene(value)
    }
}

/// A named set of settings together with the outcomes expected once they are applied
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelTest {
    pub description: String,
    pub settings: Vec<Setting>,
    pub outcomes: Vec<Outcome>,
    /// Ids of the references backing the test
    pub references: Vec<String>,
}

impl ModelTest {
    pub fn new(description: &str) -> ModelTest {
        ModelTest {
            description: description.to_string(),
            ..Default::default()
        }
    }

    /// Apply every setting in order
    ///
    /// If a setting fails, the settings applied before it are undone and the error is returned.
    pub fn setup(&mut self, model: &mut Model) -> Result<(), SettingError> {
        for i in 0..self.settings.len() {
            if let Err(err) = self.settings[i].apply(model) {
                warn!("Setting up test `{}` failed: {}", self.description, err);
                roll_back(&mut self.settings[..i], model);
                return Err(err);
            }
        }
        debug!("Test `{}` set up", self.description);
        Ok(())
    }

    /// Undo every setting, in reverse order
    pub fn teardown(&mut self, model: &mut Model) -> Result<(), SettingError> {
        for setting in self.settings.iter_mut().rev() {
            setting.undo(model)?;
        }
        Ok(())
    }

    /// Whether every outcome holds for `solution`
    pub fn check<S: Solution + ?Sized>(
        &self,
        solution: &S,
        precision: f64,
    ) -> Result<bool, SettingError> {
        for outcome in &self.outcomes {
            if !outcome.check_solution(solution, precision)? {
                debug!("Test `{}` failed on {}", self.description, outcome);
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Undo `settings` in reverse order, logging the ones that can't be undone
fn roll_back(settings: &mut [Setting], model: &mut Model) {
    for setting in settings.iter_mut().rev() {
        if let Err(err) = setting.undo(model) {
            warn!("Unable to roll back a setting: {}", err);
        }
    }
}
