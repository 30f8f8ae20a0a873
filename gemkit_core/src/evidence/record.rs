//! Flat, serializable form of an evidence
//!
//! Node handles are only meaningful inside one [`Model`], so records refer to items by their
//! kind and string id instead.
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::evidence::{Evidence, EvidenceError, EvidenceId, ItemRef};
use crate::metabolic_model::model::Model;
use crate::metabolic_model::node::NodeKind;

/// An item referred to by an evidence record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id")]
pub enum ItemRecord {
    Reaction(String),
    Gene(String),
    GeneGroup(String),
    Metabolite(String),
    Compartment(String),
}

impl Display for ItemRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemRecord::Reaction(id) => write!(f, "reaction {}", id),
            ItemRecord::Gene(id) => write!(f, "gene {}", id),
            ItemRecord::GeneGroup(id) => write!(f, "gene group {}", id),
            ItemRecord::Metabolite(id) => write!(f, "metabolite {}", id),
            ItemRecord::Compartment(id) => write!(f, "compartment {}", id),
        }
    }
}

/// Every field of an evidence, as exchanged with persistence
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub internal_id: EvidenceId,
    pub entity: Option<ItemRecord>,
    pub link: Option<ItemRecord>,
    pub target: Option<ItemRecord>,
    /// Display name of the assertion
    pub assertion: Option<String>,
    pub eco: Option<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub references: Vec<String>,
}

impl Model {
    /// Describe `evidence` by the ids of the items it refers to
    pub fn evidence_record(&self, evidence: &Evidence) -> Result<EvidenceRecord, EvidenceError> {
        Ok(EvidenceRecord {
            internal_id: evidence.internal_id,
            entity: self.item_record(evidence.entity())?,
            link: self.item_record(evidence.link())?,
            target: self.item_record(evidence.target())?,
            assertion: evidence.assertion_name().map(|name| name.to_string()),
            eco: evidence.eco.clone(),
            comment: evidence.comment.clone(),
            term: evidence.term.clone(),
            references: evidence.references().iter().cloned().collect(),
        })
    }

    /// Rebuild a detached evidence from a record
    ///
    /// Items are resolved against this model. An assertion name that isn't known yields an
    /// evidence without assertion which still carries the name. The result still has to be
    /// committed with [`Model::commit_evidence`].
    pub fn evidence_from_record(&self, record: &EvidenceRecord) -> Result<Evidence, EvidenceError> {
        let mut evidence = Evidence::new(None);
        if let Some(name) = &record.assertion {
            evidence.set_assertion_name(name);
            if evidence.assertion.is_none() {
                warn!(
                    "Evidence {} has unknown assertion `{}`",
                    record.internal_id, name
                );
            }
        }
        evidence.internal_id = record.internal_id;
        evidence.stage_entity(self.resolve_item(record.entity.as_ref())?);
        evidence.stage_link(self.resolve_item(record.link.as_ref())?);
        evidence.stage_target(self.resolve_item(record.target.as_ref())?);
        evidence.eco = record.eco.clone();
        evidence.comment = record.comment.clone();
        evidence.term = record.term.clone();
        for reference in &record.references {
            evidence.stage_reference(reference);
        }
        Ok(evidence)
    }

    fn item_record(&self, item: Option<&ItemRef>) -> Result<Option<ItemRecord>, EvidenceError> {
        let item = match item {
            Some(item) => item,
            None => return Ok(None),
        };
        let record = match item {
            ItemRef::Node(id) => {
                let node = self
                    .node(*id)
                    .map_err(|_| EvidenceError::UnknownItem(item.clone()))?;
                match &node.kind {
                    NodeKind::Reaction(r) => ItemRecord::Reaction(r.id.clone()),
                    NodeKind::Gene(g) => ItemRecord::Gene(g.id.clone()),
                    NodeKind::GeneGroup(g) => ItemRecord::GeneGroup(g.id.clone()),
                }
            }
            ItemRef::Metabolite(id) => ItemRecord::Metabolite(id.clone()),
            ItemRef::Compartment(id) => ItemRecord::Compartment(id.clone()),
        };
        Ok(Some(record))
    }

    fn resolve_item(&self, record: Option<&ItemRecord>) -> Result<Option<ItemRef>, EvidenceError> {
        let record = match record {
            Some(record) => record,
            None => return Ok(None),
        };
        let item = match record {
            ItemRecord::Reaction(id) => self.reaction_id(id).map(ItemRef::Node),
            ItemRecord::Gene(id) => self.gene_id(id).map(ItemRef::Node),
            ItemRecord::GeneGroup(id) => self
                .node_ids()
                .find(|n| {
                    self.gene_group(*n)
                        .map(|g| &g.id == id)
                        .unwrap_or(false)
                })
                .map(ItemRef::Node),
            ItemRecord::Metabolite(id) => self
                .metabolite(id)
                .map(|m| ItemRef::Metabolite(m.id.clone())),
            ItemRecord::Compartment(id) => self
                .compartment(id)
                .map(|c| ItemRef::Compartment(c.id.clone())),
        };
        item.map(Some)
            .ok_or_else(|| EvidenceError::UnresolvedItem(record.to_string()))
    }
}
