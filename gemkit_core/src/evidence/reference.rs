//! This module provides the Reference struct, a literature source backing evidences
use derive_builder::Builder;
use indexmap::IndexSet;

use crate::evidence::EvidenceId;

/// A literature reference
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Reference {
    /// Used to identify the reference
    pub id: String,
    /// Pubmed id
    #[builder(default = "None")]
    pub pmid: Option<String>,
    /// Digital object identifier
    #[builder(default = "None")]
    pub doi: Option<String>,
    #[builder(default = "None")]
    pub url: Option<String>,
    #[builder(default = "None")]
    pub title: Option<String>,
    #[builder(default = "Vec::new()")]
    pub authors: Vec<String>,
    #[builder(default = "None")]
    pub journal: Option<String>,
    #[builder(default = "None")]
    pub year: Option<String>,
    /// Evidences citing this reference
    #[builder(setter(skip))]
    pub(crate) evidences: IndexSet<EvidenceId>,
}

impl Reference {
    pub fn new(id: &str) -> Reference {
        Reference {
            id: id.to_string(),
            pmid: None,
            doi: None,
            url: None,
            title: None,
            authors: Vec::new(),
            journal: None,
            year: None,
            evidences: IndexSet::new(),
        }
    }

    /// Evidences citing this reference
    pub fn evidences(&self) -> &IndexSet<EvidenceId> {
        &self.evidences
    }
}
