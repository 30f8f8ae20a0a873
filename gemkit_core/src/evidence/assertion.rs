//! Registry of the assertions an evidence can make
//!
//! Each [`AssertionKind`] maps to an entry of the static [`ASSERTIONS`] table holding its display
//! name, its conflict group, a validity predicate and a repair function. Validity and repair
//! outcomes are advisory: they are reported as [`Validity`] and [`FixOutcome`] values and never as
//! errors.
use std::fmt::{Display, Formatter};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::configuration;
use crate::evidence::{Evidence, ItemRef};
use crate::metabolic_model::gene::GroupType;
use crate::metabolic_model::model::{GraphError, Model};
use crate::metabolic_model::node::NodeId;

/// The known assertions
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum AssertionKind {
    /// The entity gene catalyzes the target reaction
    Catalyzing,
    /// The entity gene doesn't catalyze the target reaction
    NotCatalyzing,
    /// The entity reaction is reversible
    Reversible,
    /// The entity reaction is irreversible
    Irreversible,
    /// The entity reaction can carry flux
    Present,
    /// The entity reaction can't carry flux
    Absent,
    /// The entity gene acts in the target compartment
    Localization,
}

/// Assertions of the same group are mutually exclusive claims about the same entity and target
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum ConflictGroup {
    Catalysis,
    Reversibility,
    Presence,
    Localization,
}

/// Three valued result of checking an evidence against the model
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Validity {
    /// The model agrees with the evidence
    Valid,
    /// The model contradicts the evidence
    Invalid,
    /// The evidence can't be checked, e.g. unknown assertion or unexpected entity types
    Unknown,
}

impl From<bool> for Validity {
    fn from(value: bool) -> Self {
        if value {
            Validity::Valid
        } else {
            Validity::Invalid
        }
    }
}

/// Result of trying to make the model agree with an evidence
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum FixOutcome {
    Fixed,
    Unfixable,
}

/// Reasons a repair could not be applied
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FixError {
    #[error("Automatic repair is not supported for `{0}`")]
    NotSupported(&'static str),
    #[error("The evidence doesn't have the entities required by `{0}`")]
    NotApplicable(AssertionKind),
    #[error("Unable to modify the gene tree")]
    Graph(#[from] GraphError),
}

/// An entry of the assertion registry
pub struct Assertion {
    pub kind: AssertionKind,
    /// Display name, also used when exchanging evidences
    pub name: &'static str,
    pub group: ConflictGroup,
    pub validate: fn(&Model, &Evidence) -> Validity,
    pub repair: fn(&mut Model, &Evidence) -> Result<(), FixError>,
}

pub static ASSERTIONS: [Assertion; 7] = [
    Assertion {
        kind: AssertionKind::Catalyzing,
        name: "Catalyzing reaction",
        group: ConflictGroup::Catalysis,
        validate: validate_catalyzing,
        repair: add_catalyzing_gene,
    },
    Assertion {
        kind: AssertionKind::NotCatalyzing,
        name: "Not catalyzing reaction",
        group: ConflictGroup::Catalysis,
        validate: validate_not_catalyzing,
        repair: remove_catalyzing_gene,
    },
    Assertion {
        kind: AssertionKind::Reversible,
        name: "Reversible",
        group: ConflictGroup::Reversibility,
        validate: validate_reversible,
        repair: make_reversible,
    },
    Assertion {
        kind: AssertionKind::Irreversible,
        name: "Irreversible",
        group: ConflictGroup::Reversibility,
        validate: validate_irreversible,
        repair: make_irreversible,
    },
    Assertion {
        kind: AssertionKind::Present,
        name: "Present",
        group: ConflictGroup::Presence,
        validate: validate_present,
        repair: unsupported_repair,
    },
    Assertion {
        kind: AssertionKind::Absent,
        name: "Absent",
        group: ConflictGroup::Presence,
        validate: validate_absent,
        repair: unsupported_repair,
    },
    Assertion {
        kind: AssertionKind::Localization,
        name: "Localization",
        group: ConflictGroup::Localization,
        validate: validate_localization,
        repair: unsupported_repair,
    },
];

impl AssertionKind {
    /// Every known assertion, in registry order
    pub const ALL: [AssertionKind; 7] = [
        AssertionKind::Catalyzing,
        AssertionKind::NotCatalyzing,
        AssertionKind::Reversible,
        AssertionKind::Irreversible,
        AssertionKind::Present,
        AssertionKind::Absent,
        AssertionKind::Localization,
    ];

    /// Registry entry of this assertion
    pub fn assertion(self) -> &'static Assertion {
        match self {
            AssertionKind::Catalyzing => &ASSERTIONS[0],
            AssertionKind::NotCatalyzing => &ASSERTIONS[1],
            AssertionKind::Reversible => &ASSERTIONS[2],
            AssertionKind::Irreversible => &ASSERTIONS[3],
            AssertionKind::Present => &ASSERTIONS[4],
            AssertionKind::Absent => &ASSERTIONS[5],
            AssertionKind::Localization => &ASSERTIONS[6],
        }
    }

    pub fn name(self) -> &'static str {
        self.assertion().name
    }

    pub fn group(self) -> ConflictGroup {
        self.assertion().group
    }

    /// Look an assertion up by its display name
    pub fn from_name(name: &str) -> Option<AssertionKind> {
        ASSERTIONS.iter().find(|a| a.name == name).map(|a| a.kind)
    }
}

impl Display for AssertionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// region Evaluation

impl Evidence {
    /// Check the evidence against the current state of `model`
    ///
    /// Never fails: an evidence without a known assertion, or whose items don't have the types
    /// the assertion expects, is [`Validity::Unknown`].
    pub fn is_valid(&self, model: &Model) -> Validity {
        match self.assertion {
            Some(kind) => (kind.assertion().validate)(model, self),
            None => {
                debug!("Evidence {} has no known assertion", self.internal_id);
                Validity::Unknown
            }
        }
    }

    /// Modify `model` so that it agrees with the evidence
    ///
    /// Returns [`FixOutcome::Fixed`] without changes if the evidence is already valid, and
    /// [`FixOutcome::Unfixable`] if validity is unknown or the repair isn't possible.
    pub fn fix(&self, model: &mut Model) -> FixOutcome {
        let kind = match (self.is_valid(model), self.assertion) {
            (Validity::Valid, _) => return FixOutcome::Fixed,
            (Validity::Unknown, _) | (_, None) => return FixOutcome::Unfixable,
            (Validity::Invalid, Some(kind)) => kind,
        };
        match (kind.assertion().repair)(model, self) {
            Ok(()) => {
                info!("Fixed evidence {} ({})", self.internal_id, kind);
                FixOutcome::Fixed
            }
            Err(err) => {
                warn!("Unable to fix evidence {}: {}", self.internal_id, err);
                FixOutcome::Unfixable
            }
        }
    }
}

fn node_of_kind(model: &Model, item: Option<&ItemRef>, kind: &'static str) -> Option<NodeId> {
    match item {
        Some(ItemRef::Node(id)) => {
            let node = model.node(*id).ok()?;
            (node.kind.kind_name() == kind).then_some(*id)
        }
        _ => None,
    }
}

/// Gene entity and reaction target of a catalysis evidence
fn gene_and_reaction(model: &Model, evidence: &Evidence) -> Option<(NodeId, NodeId)> {
    let gene = node_of_kind(model, evidence.entity(), "gene")?;
    let reaction = node_of_kind(model, evidence.target(), "reaction")?;
    Some((gene, reaction))
}

fn catalyzes(model: &Model, evidence: &Evidence) -> Option<bool> {
    let (gene, reaction) = gene_and_reaction(model, evidence)?;
    model.genes(reaction).ok().map(|genes| genes.contains(&gene))
}

fn validate_catalyzing(model: &Model, evidence: &Evidence) -> Validity {
    catalyzes(model, evidence).map_or(Validity::Unknown, Validity::from)
}

fn validate_not_catalyzing(model: &Model, evidence: &Evidence) -> Validity {
    catalyzes(model, evidence).map_or(Validity::Unknown, |c| Validity::from(!c))
}

fn entity_reaction_check(
    model: &Model,
    evidence: &Evidence,
    check: fn(f64, f64) -> bool,
) -> Validity {
    node_of_kind(model, evidence.entity(), "reaction")
        .and_then(|id| model.reaction(id).ok())
        .map_or(Validity::Unknown, |r| {
            Validity::from(check(r.lower_bound, r.upper_bound))
        })
}

fn validate_reversible(model: &Model, evidence: &Evidence) -> Validity {
    entity_reaction_check(model, evidence, |lb, ub| lb < 0. && 0. < ub)
}

fn validate_irreversible(model: &Model, evidence: &Evidence) -> Validity {
    entity_reaction_check(model, evidence, |lb, ub| !(lb < 0. && 0. < ub))
}

fn validate_present(model: &Model, evidence: &Evidence) -> Validity {
    entity_reaction_check(model, evidence, |lb, ub| !(lb == 0. && ub == 0.))
}

fn validate_absent(model: &Model, evidence: &Evidence) -> Validity {
    entity_reaction_check(model, evidence, |lb, ub| lb == 0. && ub == 0.)
}

fn validate_localization(model: &Model, evidence: &Evidence) -> Validity {
    let gene = match node_of_kind(model, evidence.entity(), "gene") {
        Some(gene) => gene,
        None => return Validity::Unknown,
    };
    let compartment = match evidence.target() {
        Some(ItemRef::Compartment(id)) if model.compartment(id).is_some() => id,
        _ => return Validity::Unknown,
    };
    let reactions = match model.reactions(gene) {
        Ok(reactions) => reactions,
        Err(_) => return Validity::Unknown,
    };
    Validity::from(reactions.iter().all(|r| {
        model.reaction(*r).map_or(false, |reaction| {
            reaction.metabolites.keys().any(|m| {
                model
                    .metabolite(m)
                    .and_then(|m| m.compartment.as_deref())
                    == Some(compartment.as_str())
            })
        })
    }))
}

// endregion Evaluation

// region Repairs

/// Add the gene to the reaction, joining its only child if that is an or-group
fn add_catalyzing_gene(model: &mut Model, evidence: &Evidence) -> Result<(), FixError> {
    let (gene, reaction) = gene_and_reaction(model, evidence)
        .ok_or(FixError::NotApplicable(AssertionKind::Catalyzing))?;
    if model.genes(reaction)?.contains(&gene) {
        return Ok(());
    }
    let children = model.node(reaction)?.children().snapshot();
    match children.as_slice() {
        [only] if model.group_type(*only) == Some(GroupType::Or) => {
            model.add_child(*only, gene)?
        }
        _ => model.add_child(reaction, gene)?,
    }
    Ok(())
}

/// Remove the gene from every node of the reaction's tree
fn remove_catalyzing_gene(model: &mut Model, evidence: &Evidence) -> Result<(), FixError> {
    let (gene, reaction) = gene_and_reaction(model, evidence)
        .ok_or(FixError::NotApplicable(AssertionKind::NotCatalyzing))?;
    let mut holders = IndexSet::new();
    let mut pending = vec![reaction];
    while let Some(current) = pending.pop() {
        if !holders.insert(current) {
            continue;
        }
        for child in model.node(current)?.children().distinct() {
            if model.group_type(child).is_some() {
                pending.push(child);
            }
        }
    }
    for holder in holders {
        if model.node(holder)?.children().contains(gene) {
            model.remove_child_all(holder, gene)?;
        }
    }
    Ok(())
}

fn make_reversible(model: &mut Model, evidence: &Evidence) -> Result<(), FixError> {
    let id = node_of_kind(model, evidence.entity(), "reaction")
        .ok_or(FixError::NotApplicable(AssertionKind::Reversible))?;
    let config = configuration::current();
    let reaction = model.reaction_mut(id)?;
    if reaction.lower_bound >= 0. {
        reaction.lower_bound = config.lower_bound;
    }
    if reaction.upper_bound <= 0. {
        reaction.upper_bound = config.upper_bound;
    }
    Ok(())
}

fn make_irreversible(model: &mut Model, evidence: &Evidence) -> Result<(), FixError> {
    let id = node_of_kind(model, evidence.entity(), "reaction")
        .ok_or(FixError::NotApplicable(AssertionKind::Irreversible))?;
    let reaction = model.reaction_mut(id)?;
    if reaction.lower_bound < 0. && 0. < reaction.upper_bound {
        reaction.lower_bound = 0.;
    }
    Ok(())
}

fn unsupported_repair(_model: &mut Model, evidence: &Evidence) -> Result<(), FixError> {
    let name = evidence.assertion.map_or("unknown assertion", AssertionKind::name);
    Err(FixError::NotSupported(name))
}

// endregion Repairs
