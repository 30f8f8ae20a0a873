//! This module provides the Gene struct, representing a gene, and the GeneGroup struct,
//! representing an internal and/or node of a gene protein reaction rule
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metabolic_model::model::GraphError;

/// Structure Representing a Gene
#[derive(Builder, Clone, Debug, PartialEq, Eq)]
pub struct Gene {
    /// Used to identify the gene
    pub id: String,
    /// Human Readable Gene Name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Genome the gene belongs to
    #[builder(default = "None")]
    pub genome: Option<String>,
    /// Whether this gene is currently active (see [`GeneActivity`])
    #[builder(default = "GeneActivity::Active")]
    pub activity: GeneActivity,
}

impl Gene {
    /// Create a new active gene with only an id
    pub fn new(id: &str) -> Gene {
        Gene {
            id: id.to_string(),
            name: None,
            genome: None,
            activity: GeneActivity::Active,
        }
    }

    /// Whether the gene is currently functional
    pub fn is_functional(&self) -> bool {
        self.activity == GeneActivity::Active
    }
}

impl Display for Gene {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Whether a gene is active or not
#[derive(Clone, Debug, Hash, Eq, PartialEq, Copy, Serialize, Deserialize)]
pub enum GeneActivity {
    /// Gene is considered active
    Active,
    /// Gene is considered inactive
    Inactive,
}

impl From<bool> for GeneActivity {
    fn from(value: bool) -> Self {
        if value {
            GeneActivity::Active
        } else {
            GeneActivity::Inactive
        }
    }
}

/// Boolean operation joining the children of a [`GeneGroup`]
#[derive(Clone, Debug, Hash, Eq, PartialEq, Copy, Serialize, Deserialize)]
pub enum GroupType {
    /// Active only if every child is active
    And,
    /// Active if any child is active
    Or,
}

impl GroupType {
    /// Separator placed between the rendered children of a group
    pub fn separator(&self) -> &'static str {
        match self {
            GroupType::And => " and ",
            GroupType::Or => " or ",
        }
    }
}

impl FromStr for GroupType {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "and" => Ok(GroupType::And),
            "or" => Ok(GroupType::Or),
            other => Err(GraphError::InvalidGroupType(other.to_string())),
        }
    }
}

impl Display for GroupType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupType::And => write!(f, "and"),
            GroupType::Or => write!(f, "or"),
        }
    }
}

/// Internal node of a gene tree, combining its children with an and/or operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneGroup {
    /// Identifier of the group, generated if not supplied
    pub id: String,
    /// How the children are combined
    pub group_type: GroupType,
}

impl GeneGroup {
    /// Create a new group with a generated id
    pub fn new(group_type: GroupType) -> GeneGroup {
        GeneGroup {
            id: Uuid::new_v4().to_string(),
            group_type,
        }
    }

    /// Create a new group with a known id
    pub fn with_id(id: &str, group_type: GroupType) -> GeneGroup {
        GeneGroup {
            id: id.to_string(),
            group_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gene_builder_defaults() {
        let gene = GeneBuilder::default()
            .id("Rv0001".to_string())
            .build()
            .unwrap();
        assert_eq!(gene.activity, GeneActivity::Active);
        assert!(gene.is_functional());
        assert_eq!(format!("{}", gene), "Rv0001");
    }

    #[test]
    fn group_type_parse() {
        assert_eq!("AND".parse::<GroupType>().unwrap(), GroupType::And);
        assert_eq!(" or ".parse::<GroupType>().unwrap(), GroupType::Or);
        match "xor".parse::<GroupType>() {
            Err(GraphError::InvalidGroupType(t)) => assert_eq!(t, "xor"),
            _ => panic!("xor should not be a valid group type"),
        }
    }

    #[test]
    fn generated_group_ids_differ() {
        let a = GeneGroup::new(GroupType::And);
        let b = GeneGroup::new(GroupType::And);
        assert_ne!(a.id, b.id);
        assert_eq!(GeneGroup::with_id("g1", GroupType::Or).id, "g1");
    }
}
