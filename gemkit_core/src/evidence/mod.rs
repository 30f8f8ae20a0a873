//! Evidences: literature backed assertions about the entities of a model
//!
//! An [`Evidence`] refers to an `entity` (e.g. a gene), optionally a `link` (a secondary
//! entity) and a `target` (e.g. a reaction or a compartment), and to a set of references. The
//! back-pointers of these relations are stored on the referenced entities, so an `Evidence` value
//! on its own is always detached. Evidences become reciprocally linked when committed to a
//! [`Model`], and every later change to a committed evidence goes through the model.
//!
//! ```rust
//! use gemkit_core::evidence::{Evidence, ItemRef};
//! use gemkit_core::evidence::assertion::{AssertionKind, Validity};
//! use gemkit_core::metabolic_model::model::Model;
//! use gemkit_core::metabolic_model::reaction::Reaction;
//!
//! let mut model = Model::new_empty();
//! let r = model.add_reaction(Reaction::new("r")).unwrap();
//! model.add_gene_rule(r, "g1 or g2").unwrap();
//! let g1 = model.gene_id("g1").unwrap();
//!
//! let mut evidence = Evidence::new(Some(AssertionKind::NotCatalyzing));
//! evidence.stage_entity(Some(ItemRef::Node(g1)));
//! evidence.stage_target(Some(ItemRef::Node(r)));
//! let id = model.commit_evidence(evidence).unwrap();
//!
//! let evidence = model.copy_evidence(id).unwrap();
//! assert_eq!(evidence.is_valid(&model), Validity::Invalid);
//! evidence.fix(&mut model);
//! assert_eq!(evidence.is_valid(&model), Validity::Valid);
//! assert_eq!(model.gene_reaction_rule(r).unwrap(), "g2");
//! ```
use std::fmt::{Display, Formatter};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::evidence::assertion::AssertionKind;
use crate::evidence::reference::Reference;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::node::NodeId;

pub mod assertion;
pub mod conflicts;
pub mod record;
pub mod reference;

/// Stable identifier of an evidence
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct EvidenceId(Uuid);

impl EvidenceId {
    pub fn new() -> Self {
        EvidenceId(Uuid::new_v4())
    }
}

impl Default for EvidenceId {
    fn default() -> Self {
        EvidenceId::new()
    }
}

impl Display for EvidenceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An entity of the model an evidence can refer to
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum ItemRef {
    /// A reaction, gene or gene group
    Node(NodeId),
    /// A metabolite, by id
    Metabolite(String),
    /// A compartment, by id
    Compartment(String),
}

impl Display for ItemRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemRef::Node(id) => write!(f, "node {}", id),
            ItemRef::Metabolite(id) => write!(f, "metabolite {}", id),
            ItemRef::Compartment(id) => write!(f, "compartment {}", id),
        }
    }
}

/// The three item relations of an evidence
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Slot {
    Entity,
    Link,
    Target,
}

/// A literature backed assertion about an entity of the model
#[derive(Clone, Debug, PartialEq)]
pub struct Evidence {
    /// Identifier, kept by copies
    pub internal_id: EvidenceId,
    entity: Option<ItemRef>,
    link: Option<ItemRef>,
    target: Option<ItemRef>,
    /// What the evidence claims, `None` if the claim isn't a known assertion
    pub assertion: Option<AssertionKind>,
    /// Name of a claim that isn't a known assertion, kept so it can be written back
    unknown_assertion: Option<String>,
    /// Evidence and conclusion ontology code
    pub eco: Option<String>,
    pub comment: String,
    pub term: String,
    references: IndexSet<String>,
}

impl Evidence {
    /// Create a new detached evidence with a fresh id
    pub fn new(assertion: Option<AssertionKind>) -> Evidence {
        Evidence {
            internal_id: EvidenceId::new(),
            entity: None,
            link: None,
            target: None,
            assertion,
            unknown_assertion: None,
            eco: None,
            comment: String::new(),
            term: String::new(),
            references: IndexSet::new(),
        }
    }

    pub fn entity(&self) -> Option<&ItemRef> {
        self.entity.as_ref()
    }

    pub fn link(&self) -> Option<&ItemRef> {
        self.link.as_ref()
    }

    pub fn target(&self) -> Option<&ItemRef> {
        self.target.as_ref()
    }

    /// Display name of the claim, known or not
    pub fn assertion_name(&self) -> Option<&str> {
        match self.assertion {
            Some(kind) => Some(kind.name()),
            None => self.unknown_assertion.as_deref(),
        }
    }

    /// Record a claim by name, resolving it against the known assertions
    ///
    /// A name that isn't known leaves [`Evidence::assertion`] empty and is kept as is.
    pub fn set_assertion_name(&mut self, name: &str) {
        self.assertion = AssertionKind::from_name(name);
        self.unknown_assertion = match self.assertion {
            Some(_) => None,
            None => Some(name.to_string()),
        };
    }

    /// Ids of the cited references
    pub fn references(&self) -> &IndexSet<String> {
        &self.references
    }

    fn slot(&self, slot: Slot) -> Option<&ItemRef> {
        match slot {
            Slot::Entity => self.entity.as_ref(),
            Slot::Link => self.link.as_ref(),
            Slot::Target => self.target.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<ItemRef> {
        match slot {
            Slot::Entity => &mut self.entity,
            Slot::Link => &mut self.link,
            Slot::Target => &mut self.target,
        }
    }

    /// Whether any of entity, link or target is `item`
    pub fn refers_to(&self, item: &ItemRef) -> bool {
        [Slot::Entity, Slot::Link, Slot::Target]
            .iter()
            .any(|s| self.slot(*s) == Some(item))
    }

    // region One-way staging, used on working copies

    /// Set the entity without touching the entity's back-pointers
    pub fn stage_entity(&mut self, item: Option<ItemRef>) {
        self.entity = item;
    }

    /// Set the linked item without touching its back-pointers
    pub fn stage_link(&mut self, item: Option<ItemRef>) {
        self.link = item;
    }

    /// Set the target without touching the target's back-pointers
    pub fn stage_target(&mut self, item: Option<ItemRef>) {
        self.target = item;
    }

    pub fn stage_reference(&mut self, reference: &str) {
        self.references.insert(reference.to_string());
    }

    pub fn unstage_reference(&mut self, reference: &str) {
        self.references.shift_remove(reference);
    }

    /// Replace every occurrence of `old` among entity, link and target by `new`
    pub fn stage_substitute(&mut self, old: &ItemRef, new: ItemRef) -> Result<(), EvidenceError> {
        let slots = self.slots_holding(old);
        if slots.is_empty() {
            return Err(EvidenceError::NotPartOfEvidence(old.clone()));
        }
        for slot in slots {
            *self.slot_mut(slot) = Some(new.clone());
        }
        Ok(())
    }

    fn slots_holding(&self, item: &ItemRef) -> Vec<Slot> {
        [Slot::Entity, Slot::Link, Slot::Target]
            .into_iter()
            .filter(|s| self.slot(*s) == Some(item))
            .collect()
    }

    // endregion One-way staging
}

/// Errors raised when linking evidences to the entities of a model
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EvidenceError {
    #[error("No evidence with id {0} in the model")]
    UnknownEvidence(EvidenceId),
    #[error("The {0} is not part of the model")]
    UnknownItem(ItemRef),
    #[error("No reference with id {0} in the model")]
    UnknownReference(String),
    #[error("A reference with id {0} is already part of the model")]
    DuplicateReference(String),
    #[error("The {0} is not part of this evidence")]
    NotPartOfEvidence(ItemRef),
    #[error("No item of the model matches {0}")]
    UnresolvedItem(String),
}

impl Model {
    // region Store

    pub fn evidence(&self, id: EvidenceId) -> Option<&Evidence> {
        self.evidences.get(&id)
    }

    /// All evidences committed to the model
    pub fn evidences(&self) -> impl Iterator<Item = &Evidence> {
        self.evidences.values()
    }

    pub fn add_reference(&mut self, reference: Reference) -> Result<(), EvidenceError> {
        if self.references.contains_key(&reference.id) {
            return Err(EvidenceError::DuplicateReference(reference.id));
        }
        self.references.insert(reference.id.clone(), reference);
        Ok(())
    }

    pub fn reference(&self, id: &str) -> Option<&Reference> {
        self.references.get(id)
    }

    /// Remove a reference, detaching it from every evidence citing it
    pub fn delete_reference(&mut self, id: &str) -> Result<(), EvidenceError> {
        let citing: Vec<EvidenceId> = match self.references.get(id) {
            Some(reference) => reference.evidences.iter().copied().collect(),
            None => return Err(EvidenceError::UnknownReference(id.to_string())),
        };
        for evidence in citing {
            self.detach_reference(evidence, id)?;
        }
        self.references.shift_remove(id);
        Ok(())
    }

    /// Evidences referring to `item`
    pub fn item_evidences(&self, item: &ItemRef) -> Result<&IndexSet<EvidenceId>, EvidenceError> {
        match item {
            ItemRef::Node(id) => self
                .node(*id)
                .map(|n| &n.evidences)
                .map_err(|_| EvidenceError::UnknownItem(item.clone())),
            ItemRef::Metabolite(id) => self
                .metabolites
                .get(id)
                .map(|m| &m.evidences)
                .ok_or_else(|| EvidenceError::UnknownItem(item.clone())),
            ItemRef::Compartment(id) => self
                .compartments
                .get(id)
                .map(|c| &c.evidences)
                .ok_or_else(|| EvidenceError::UnknownItem(item.clone())),
        }
    }

    fn item_evidences_mut(
        &mut self,
        item: &ItemRef,
    ) -> Result<&mut IndexSet<EvidenceId>, EvidenceError> {
        match item {
            ItemRef::Node(id) => self
                .node_mut(*id)
                .map(|n| &mut n.evidences)
                .map_err(|_| EvidenceError::UnknownItem(item.clone())),
            ItemRef::Metabolite(id) => self
                .metabolites
                .get_mut(id)
                .map(|m| &mut m.evidences)
                .ok_or_else(|| EvidenceError::UnknownItem(item.clone())),
            ItemRef::Compartment(id) => self
                .compartments
                .get_mut(id)
                .map(|c| &mut c.evidences)
                .ok_or_else(|| EvidenceError::UnknownItem(item.clone())),
        }
    }

    fn stored(&self, id: EvidenceId) -> Result<&Evidence, EvidenceError> {
        self.evidences
            .get(&id)
            .ok_or(EvidenceError::UnknownEvidence(id))
    }

    fn stored_mut(&mut self, id: EvidenceId) -> Result<&mut Evidence, EvidenceError> {
        self.evidences
            .get_mut(&id)
            .ok_or(EvidenceError::UnknownEvidence(id))
    }

    // endregion Store

    // region Working copies

    /// Copy of a committed evidence, detached from the model
    ///
    /// Changes to the copy don't affect the model until it is passed to
    /// [`Model::commit_evidence`].
    pub fn copy_evidence(&self, id: EvidenceId) -> Result<Evidence, EvidenceError> {
        self.stored(id).cloned()
    }

    /// Commit an evidence, linking it reciprocally to all of its items and references
    ///
    /// A committed evidence with the same id is replaced.
    pub fn commit_evidence(&mut self, evidence: Evidence) -> Result<EvidenceId, EvidenceError> {
        for item in [evidence.entity(), evidence.link(), evidence.target()]
            .into_iter()
            .flatten()
        {
            self.item_evidences(item)?;
        }
        if let Some(missing) = evidence
            .references
            .iter()
            .find(|r| !self.references.contains_key(*r))
        {
            return Err(EvidenceError::UnknownReference(missing.clone()));
        }

        let id = evidence.internal_id;
        if self.evidences.contains_key(&id) {
            debug!("Replacing evidence {} with its edited copy", id);
            self.remove_evidence(id)?;
        }
        for item in [evidence.entity(), evidence.link(), evidence.target()]
            .into_iter()
            .flatten()
        {
            self.item_evidences_mut(item)?.insert(id);
        }
        for reference in &evidence.references {
            if let Some(r) = self.references.get_mut(reference) {
                r.evidences.insert(id);
            }
        }
        self.evidences.insert(id, evidence);
        Ok(id)
    }

    // endregion Working copies

    // region Reciprocal links

    fn attach_slot(
        &mut self,
        id: EvidenceId,
        slot: Slot,
        item: Option<ItemRef>,
    ) -> Result<(), EvidenceError> {
        if let Some(new) = &item {
            self.item_evidences(new)?;
        }
        let evidence = self.stored_mut(id)?;
        let old = std::mem::replace(evidence.slot_mut(slot), item.clone());
        let still_referenced = old.as_ref().map(|o| evidence.refers_to(o)).unwrap_or(true);
        if let Some(old) = old {
            // The same item may also fill one of the other slots
            if !still_referenced {
                if let Ok(set) = self.item_evidences_mut(&old) {
                    set.shift_remove(&id);
                }
            }
        }
        if let Some(new) = item {
            self.item_evidences_mut(&new)?.insert(id);
        }
        Ok(())
    }

    /// Point the entity of a committed evidence to `item`, updating both sides
    pub fn attach_entity(
        &mut self,
        id: EvidenceId,
        item: Option<ItemRef>,
    ) -> Result<(), EvidenceError> {
        self.attach_slot(id, Slot::Entity, item)
    }

    /// Point the linked item of a committed evidence to `item`, updating both sides
    pub fn attach_link(&mut self, id: EvidenceId, item: Option<ItemRef>) -> Result<(), EvidenceError> {
        self.attach_slot(id, Slot::Link, item)
    }

    /// Point the target of a committed evidence to `item`, updating both sides
    pub fn attach_target(
        &mut self,
        id: EvidenceId,
        item: Option<ItemRef>,
    ) -> Result<(), EvidenceError> {
        self.attach_slot(id, Slot::Target, item)
    }

    /// Cite a reference from a committed evidence
    pub fn attach_reference(&mut self, id: EvidenceId, reference: &str) -> Result<(), EvidenceError> {
        if !self.references.contains_key(reference) {
            return Err(EvidenceError::UnknownReference(reference.to_string()));
        }
        self.stored_mut(id)?.references.insert(reference.to_string());
        if let Some(r) = self.references.get_mut(reference) {
            r.evidences.insert(id);
        }
        Ok(())
    }

    /// Stop citing a reference from a committed evidence
    pub fn detach_reference(&mut self, id: EvidenceId, reference: &str) -> Result<(), EvidenceError> {
        self.stored_mut(id)?.references.shift_remove(reference);
        if let Some(r) = self.references.get_mut(reference) {
            r.evidences.shift_remove(&id);
        }
        Ok(())
    }

    /// Replace `old` by `new` wherever it is the entity, link or target of a committed evidence
    ///
    /// # Errors
    /// [`EvidenceError::NotPartOfEvidence`] if the evidence doesn't refer to `old`
    pub fn substitute_item(
        &mut self,
        id: EvidenceId,
        old: &ItemRef,
        new: ItemRef,
    ) -> Result<(), EvidenceError> {
        let slots = self.stored(id)?.slots_holding(old);
        if slots.is_empty() {
            return Err(EvidenceError::NotPartOfEvidence(old.clone()));
        }
        for slot in slots {
            self.attach_slot(id, slot, Some(new.clone()))?;
        }
        Ok(())
    }

    /// Detach a committed evidence from its references and items, leaving it empty in the store
    pub fn delete_links(&mut self, id: EvidenceId) -> Result<(), EvidenceError> {
        let references: Vec<String> = self.stored(id)?.references.iter().cloned().collect();
        for reference in references {
            self.detach_reference(id, &reference)?;
        }
        for slot in [Slot::Entity, Slot::Link, Slot::Target] {
            self.attach_slot(id, slot, None)?;
        }
        Ok(())
    }

    /// Unlink and remove a committed evidence, returning it as it was before unlinking
    pub fn remove_evidence(&mut self, id: EvidenceId) -> Result<Evidence, EvidenceError> {
        let evidence = self.copy_evidence(id)?;
        self.delete_links(id)?;
        self.evidences.shift_remove(&id);
        Ok(evidence)
    }

    /// Remove every evidence referring to `item`
    pub fn remove_all_evidences(&mut self, item: &ItemRef) {
        let attached: Vec<EvidenceId> = match self.item_evidences(item) {
            Ok(set) => set.iter().copied().collect(),
            Err(_) => return,
        };
        for id in attached {
            if let Err(err) = self.remove_evidence(id) {
                debug!("Evidence {} was already removed: {}", id, err);
            }
        }
    }

    /// Check that every committed evidence and every back-pointer agree with each other
    pub fn check_evidence_links(&self) -> bool {
        let forward = self.evidences.values().all(|evidence| {
            let items_ok = [evidence.entity(), evidence.link(), evidence.target()]
                .into_iter()
                .flatten()
                .all(|item| {
                    self.item_evidences(item)
                        .map(|set| set.contains(&evidence.internal_id))
                        .unwrap_or(false)
                });
            let references_ok = evidence.references.iter().all(|r| {
                self.references
                    .get(r)
                    .map(|r| r.evidences.contains(&evidence.internal_id))
                    .unwrap_or(false)
            });
            items_ok && references_ok
        });

        let mut items: Vec<ItemRef> = self.node_ids().map(ItemRef::Node).collect();
        items.extend(self.metabolites.keys().cloned().map(ItemRef::Metabolite));
        items.extend(self.compartments.keys().cloned().map(ItemRef::Compartment));
        let backward_items = items.iter().all(|item| {
            self.item_evidences(item)
                .map(|set| {
                    set.iter().all(|id| {
                        self.evidences
                            .get(id)
                            .map(|e| e.refers_to(item))
                            .unwrap_or(false)
                    })
                })
                .unwrap_or(false)
        });
        let backward_references = self.references.values().all(|reference| {
            reference.evidences.iter().all(|id| {
                self.evidences
                    .get(id)
                    .map(|e| e.references.contains(&reference.id))
                    .unwrap_or(false)
            })
        });
        forward && backward_items && backward_references
    }

    // endregion Reciprocal links
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::metabolic_model::gene::Gene;
    use crate::metabolic_model::metabolite::Compartment;
    use crate::metabolic_model::reaction::Reaction;

    pub(crate) fn linked_model() -> (Model, NodeId, NodeId, EvidenceId) {
        let mut model = Model::new_empty();
        let r = model.add_reaction(Reaction::new("r")).unwrap();
        let g = model.add_gene(Gene::new("g")).unwrap();
        model.add_reference(Reference::new("ref1")).unwrap();
        let mut evidence = Evidence::new(Some(AssertionKind::Catalyzing));
        evidence.stage_entity(Some(ItemRef::Node(g)));
        evidence.stage_target(Some(ItemRef::Node(r)));
        evidence.stage_reference("ref1");
        let id = model.commit_evidence(evidence).unwrap();
        (model, r, g, id)
    }

    #[test]
    fn commit_links_both_sides() {
        let (model, r, g, id) = linked_model();
        assert!(model.node(g).unwrap().evidences().contains(&id));
        assert!(model.node(r).unwrap().evidences().contains(&id));
        assert!(model.reference("ref1").unwrap().evidences().contains(&id));
        assert!(model.check_evidence_links());
    }

    #[test]
    fn staging_is_one_way() {
        let (model, r, g, id) = linked_model();
        let mut copy = model.copy_evidence(id).unwrap();
        copy.stage_entity(None);
        copy.unstage_reference("ref1");
        // The live evidence and the back-pointers are untouched
        assert_eq!(model.evidence(id).unwrap().entity(), Some(&ItemRef::Node(g)));
        assert!(model.node(g).unwrap().evidences().contains(&id));
        assert!(model.reference("ref1").unwrap().evidences().contains(&id));
        assert_eq!(copy.target(), Some(&ItemRef::Node(r)));
        assert!(model.check_evidence_links());
    }

    #[test]
    fn committing_a_copy_replaces_the_original() {
        let (mut model, r, g, id) = linked_model();
        let other = model.add_gene(Gene::new("other")).unwrap();
        let mut copy = model.copy_evidence(id).unwrap();
        copy.stage_entity(Some(ItemRef::Node(other)));
        copy.comment = "edited".to_string();
        assert_eq!(model.commit_evidence(copy).unwrap(), id);

        assert_eq!(model.evidences().count(), 1);
        assert_eq!(model.evidence(id).unwrap().comment, "edited");
        assert!(!model.node(g).unwrap().evidences().contains(&id));
        assert!(model.node(other).unwrap().evidences().contains(&id));
        assert!(model.node(r).unwrap().evidences().contains(&id));
        assert!(model.check_evidence_links());
    }

    #[test]
    fn commit_rejects_unknown_items() {
        let (mut model, _, _, _) = linked_model();
        let mut evidence = Evidence::new(None);
        evidence.stage_target(Some(ItemRef::Compartment("c".to_string())));
        assert_eq!(
            model.commit_evidence(evidence.clone()),
            Err(EvidenceError::UnknownItem(ItemRef::Compartment("c".to_string())))
        );
        evidence.stage_target(None);
        evidence.stage_reference("missing");
        assert_eq!(
            model.commit_evidence(evidence),
            Err(EvidenceError::UnknownReference("missing".to_string()))
        );
        assert_eq!(model.evidences().count(), 1);
    }

    #[test]
    fn attach_moves_back_pointer() {
        let (mut model, r, g, id) = linked_model();
        model
            .add_compartment(Compartment::new("c", Some("cytosol")))
            .unwrap();
        let c = ItemRef::Compartment("c".to_string());
        model.attach_target(id, Some(c.clone())).unwrap();
        assert!(!model.node(r).unwrap().evidences().contains(&id));
        assert!(model.compartment("c").unwrap().evidences().contains(&id));
        model.attach_entity(id, None).unwrap();
        assert!(!model.node(g).unwrap().evidences().contains(&id));
        assert_eq!(model.evidence(id).unwrap().entity(), None);
        assert!(model.check_evidence_links());
    }

    #[test]
    fn shared_item_keeps_back_pointer() {
        let (mut model, r, _, id) = linked_model();
        model.attach_link(id, Some(ItemRef::Node(r))).unwrap();
        model.attach_target(id, None).unwrap();
        // Still the linked item
        assert!(model.node(r).unwrap().evidences().contains(&id));
        assert!(model.check_evidence_links());
    }

    #[test]
    fn references_are_reciprocal() {
        let (mut model, _, _, id) = linked_model();
        model.add_reference(Reference::new("ref2")).unwrap();
        model.attach_reference(id, "ref2").unwrap();
        assert!(model.reference("ref2").unwrap().evidences().contains(&id));
        model.detach_reference(id, "ref1").unwrap();
        assert!(!model.reference("ref1").unwrap().evidences().contains(&id));
        assert!(!model.evidence(id).unwrap().references().contains("ref1"));
        assert_eq!(
            model.attach_reference(id, "nope"),
            Err(EvidenceError::UnknownReference("nope".to_string()))
        );
        model.delete_reference("ref2").unwrap();
        assert!(model.evidence(id).unwrap().references().is_empty());
        assert!(model.check_evidence_links());
    }

    #[test]
    fn substitute_item() {
        let (mut model, r, g, id) = linked_model();
        let g2 = model.add_gene(Gene::new("g2")).unwrap();
        model
            .substitute_item(id, &ItemRef::Node(g), ItemRef::Node(g2))
            .unwrap();
        assert_eq!(model.evidence(id).unwrap().entity(), Some(&ItemRef::Node(g2)));
        assert!(model.node(g2).unwrap().evidences().contains(&id));
        assert!(!model.node(g).unwrap().evidences().contains(&id));
        assert_eq!(model.evidence(id).unwrap().target(), Some(&ItemRef::Node(r)));

        assert_eq!(
            model.substitute_item(id, &ItemRef::Node(g), ItemRef::Node(g2)),
            Err(EvidenceError::NotPartOfEvidence(ItemRef::Node(g)))
        );
        assert!(model.check_evidence_links());
    }

    #[test]
    fn stage_substitute_on_copy() {
        let (model, _, g, id) = linked_model();
        let mut copy = model.copy_evidence(id).unwrap();
        let placeholder = ItemRef::Metabolite("atp_c".to_string());
        copy.stage_substitute(&ItemRef::Node(g), placeholder.clone())
            .unwrap();
        assert_eq!(copy.entity(), Some(&placeholder));
        assert!(copy.stage_substitute(&ItemRef::Node(g), placeholder).is_err());
    }

    #[test]
    fn delete_links_empties_evidence() {
        let (mut model, r, g, id) = linked_model();
        model.delete_links(id).unwrap();
        let evidence = model.evidence(id).unwrap();
        assert_eq!(evidence.entity(), None);
        assert_eq!(evidence.target(), None);
        assert!(evidence.references().is_empty());
        assert!(model.node(g).unwrap().evidences().is_empty());
        assert!(model.node(r).unwrap().evidences().is_empty());
        assert!(model.reference("ref1").unwrap().evidences().is_empty());
    }

    #[test]
    fn removing_an_entity_removes_its_evidences() {
        let (mut model, r, _, id) = linked_model();
        let mut second = Evidence::new(Some(AssertionKind::Reversible));
        second.stage_entity(Some(ItemRef::Node(r)));
        let second = model.commit_evidence(second).unwrap();

        model.remove_gene("g").unwrap();
        assert!(model.evidence(id).is_none());
        assert!(model.evidence(second).is_some());
        assert!(!model.node(r).unwrap().evidences().contains(&id));
        assert!(model.reference("ref1").unwrap().evidences().is_empty());
        assert!(model.check_evidence_links());

        model.remove_reaction("r").unwrap();
        assert_eq!(model.evidences().count(), 0);
    }
}
