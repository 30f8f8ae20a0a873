//! Module providing the Model struct and the gene-reaction association graph of a metabolic model.

pub mod gene;
pub mod metabolite;
pub mod model;
pub mod multiset;
pub mod node;
pub mod prune;
pub mod reaction;
pub mod rule;
