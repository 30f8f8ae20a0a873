//! Grouping of evidences into conflicting, failing and erroneous sets
use indexmap::IndexMap;
use tracing::debug;

use crate::evidence::assertion::{ConflictGroup, Validity};
use crate::evidence::{Evidence, ItemRef};
use crate::metabolic_model::model::Model;

/// Evidences sorted by how they relate to the current state of a model
#[derive(Clone, Debug, Default)]
pub struct SortedEvidences<'a> {
    /// Groups of evidences about the same entity and target, some valid and some invalid
    pub conflicts: Vec<Vec<&'a Evidence>>,
    /// Groups of evidences about the same entity and target which are all invalid
    pub failing: Vec<Vec<&'a Evidence>>,
    /// Evidences whose validity can't be determined
    pub errors: Vec<&'a Evidence>,
}

type BucketKey = (Option<ItemRef>, Option<ItemRef>, ConflictGroup);

/// Sort `evidences` into conflicts, failing groups and errors
///
/// Evidences are bucketed by entity, target and the conflict group of their assertion. A bucket
/// holding both valid and invalid evidences is a conflict, a bucket of only invalid evidences is
/// failing and a bucket of only valid evidences isn't reported. Evidences of unknown validity are
/// reported individually as errors.
pub fn sort_evidences<'a, I>(model: &Model, evidences: I) -> SortedEvidences<'a>
where
    I: IntoIterator<Item = &'a Evidence>,
{
    let mut sorted = SortedEvidences::default();
    let mut buckets: IndexMap<BucketKey, Vec<(&'a Evidence, Validity)>> = IndexMap::new();

    for evidence in evidences {
        let validity = evidence.is_valid(model);
        match (validity, evidence.assertion) {
            (Validity::Unknown, _) | (_, None) => sorted.errors.push(evidence),
            (_, Some(kind)) => {
                let key = (
                    evidence.entity().cloned(),
                    evidence.target().cloned(),
                    kind.group(),
                );
                buckets.entry(key).or_default().push((evidence, validity));
            }
        }
    }

    for (_, bucket) in buckets {
        let any_valid = bucket.iter().any(|(_, v)| *v == Validity::Valid);
        let any_invalid = bucket.iter().any(|(_, v)| *v == Validity::Invalid);
        let group: Vec<&Evidence> = bucket.into_iter().map(|(e, _)| e).collect();
        match (any_valid, any_invalid) {
            (true, true) => sorted.conflicts.push(group),
            (false, true) => sorted.failing.push(group),
            _ => {}
        }
    }

    debug!(
        "Sorted evidences: {} conflicts, {} failing, {} errors",
        sorted.conflicts.len(),
        sorted.failing.len(),
        sorted.errors.len()
    );
    sorted
}

impl Model {
    /// Sort every evidence of the model, see [`sort_evidences`]
    pub fn sort_evidences(&self) -> SortedEvidences<'_> {
        sort_evidences(self, self.evidences())
    }
}
