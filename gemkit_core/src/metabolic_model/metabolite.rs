//! This module provides the metabolite struct representing a metabolite, and the compartment
//! struct representing where it is located
use derive_builder::Builder;
use indexmap::IndexSet;

use crate::evidence::EvidenceId;

/// Represents a metabolite
#[derive(Builder, Debug, Clone)]
pub struct Metabolite {
    /// Used to identify the metabolite (must be unique)
    pub id: String,
    /// Human Readable name of the metabolite
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Which compartment the metabolite is in
    #[builder(default = "None")]
    pub compartment: Option<String>,
    /// Electrical charge of the Metabolite
    #[builder(default = "0")]
    pub charge: i32,
    /// Chemical Formula of the metabolite
    #[builder(default = "None")]
    pub formula: Option<String>,
    /// Evidences referring to this metabolite
    #[builder(setter(skip))]
    pub(crate) evidences: IndexSet<EvidenceId>,
}

impl Metabolite {
    pub fn new(id: &str, compartment: Option<&str>) -> Metabolite {
        Metabolite {
            id: id.to_string(),
            name: None,
            compartment: compartment.map(|c| c.to_string()),
            charge: 0,
            formula: None,
            evidences: IndexSet::new(),
        }
    }

    /// Evidences referring to this metabolite
    pub fn evidences(&self) -> &IndexSet<EvidenceId> {
        &self.evidences
    }
}

/// A compartment of the model, e.g. the cytosol
#[derive(Debug, Clone)]
pub struct Compartment {
    /// Short identifier, e.g. "c"
    pub id: String,
    /// Long name, e.g. "cytosol"
    pub name: Option<String>,
    pub(crate) evidences: IndexSet<EvidenceId>,
}

impl Compartment {
    pub fn new(id: &str, name: Option<&str>) -> Compartment {
        Compartment {
            id: id.to_string(),
            name: name.map(|n| n.to_string()),
            evidences: IndexSet::new(),
        }
    }

    /// Evidences referring to this compartment
    pub fn evidences(&self) -> &IndexSet<EvidenceId> {
        &self.evidences
    }
}
