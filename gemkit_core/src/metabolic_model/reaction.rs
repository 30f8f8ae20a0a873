//! This module provides a struct for representing reactions
use derive_builder::Builder;
use indexmap::IndexMap;

use crate::configuration;

/// Represents a reaction in the metabolic model
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Reaction {
    /// Used to identify the reaction
    pub id: String,
    /// Metabolite stoichiometry of the reaction
    #[builder(default = "IndexMap::new()")]
    pub metabolites: IndexMap<String, f64>,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Lower flux bound
    #[builder(default = "configuration::current().lower_bound")]
    pub lower_bound: f64,
    /// Upper flux bound
    #[builder(default = "configuration::current().upper_bound")]
    pub upper_bound: f64,
    /// Coefficient of the reaction in the objective function
    #[builder(default = "0.")]
    pub objective_coefficient: f64,
    /// Reaction subsystem
    #[builder(default = "None")]
    pub subsystem: Option<String>,
    /// Whether the reaction is charge balanced, `None` until checked
    #[builder(default = "None")]
    pub charge_balanced: Option<bool>,
    /// Whether the reaction is elementally balanced, `None` until checked
    #[builder(default = "None")]
    pub elements_balanced: Option<bool>,
}

impl Reaction {
    /// Create a reaction with default bounds and no metabolites
    pub fn new(id: &str) -> Reaction {
        let config = configuration::current();
        Reaction {
            id: id.to_string(),
            metabolites: IndexMap::new(),
            name: None,
            lower_bound: config.lower_bound,
            upper_bound: config.upper_bound,
            objective_coefficient: 0.,
            subsystem: None,
            charge_balanced: None,
            elements_balanced: None,
        }
    }

    /// Whether the reaction can carry flux in both directions
    pub fn is_reversible(&self) -> bool {
        self.lower_bound < 0. && 0. < self.upper_bound
    }

    /// Whether the reaction is blocked by its bounds
    pub fn is_blocked(&self) -> bool {
        self.lower_bound == 0. && self.upper_bound == 0.
    }
}
