//! Expected fluxes of a model test
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::configuration;
use crate::model_test::SettingError;

/// Flux values of a solved model, by reaction id
pub trait Solution {
    fn flux(&self, reaction: &str) -> Option<f64>;
}

impl Solution for HashMap<String, f64> {
    fn flux(&self, reaction: &str) -> Option<f64> {
        self.get(reaction).copied()
    }
}

impl Solution for IndexMap<String, f64> {
    fn flux(&self, reaction: &str) -> Option<f64> {
        self.get(reaction).copied()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Comparison {
    GreaterThan,
    LessThan,
}

impl Display for Comparison {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Comparison::GreaterThan => write!(f, ">"),
            Comparison::LessThan => write!(f, "<"),
        }
    }
}

/// Expected relation between the flux of a reaction and a value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Id of the reaction
    pub reaction: String,
    pub value: f64,
    pub comparison: Comparison,
}

impl Outcome {
    pub fn new(reaction: &str, comparison: Comparison, value: f64) -> Outcome {
        Outcome {
            reaction: reaction.to_string(),
            value,
            comparison,
        }
    }

    /// Check the outcome against a solution
    ///
    /// `precision` loosens the comparison: a flux within `precision` of the value passes.
    ///
    /// # Examples
    /// ```rust
    /// use std::collections::HashMap;
    /// use gemkit_core::model_test::outcome::{Comparison, Outcome};
    /// let solution = HashMap::from([("BIOMASS".to_string(), 0.0)]);
    /// let outcome = Outcome::new("BIOMASS", Comparison::GreaterThan, 0.0);
    /// assert!(!outcome.check_solution(&solution, 0.0).unwrap());
    /// assert!(outcome.check_solution(&solution, 1e-7).unwrap());
    /// ```
    pub fn check_solution<S: Solution + ?Sized>(
        &self,
        solution: &S,
        precision: f64,
    ) -> Result<bool, SettingError> {
        let flux = solution
            .flux(&self.reaction)
            .ok_or_else(|| SettingError::MissingFlux(self.reaction.clone()))?;
        Ok(match self.comparison {
            Comparison::GreaterThan => flux > self.value - precision,
            Comparison::LessThan => flux < self.value + precision,
        })
    }

    /// Check the outcome with the configured tolerance as precision
    pub fn check<S: Solution + ?Sized>(&self, solution: &S) -> Result<bool, SettingError> {
        self.check_solution(solution, configuration::current().tolerance)
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.reaction, self.comparison, self.value)
    }
}
