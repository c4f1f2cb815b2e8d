//! Normalized dataset handed to the presentation layer

use crate::models::dimension::{Dimension, DimensionId};
use crate::models::phase::Phase;
use crate::models::policy::{Policy, PolicyId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub policies: Vec<Policy>,
    /// Sorted, deduplicated keyword vocabulary
    pub keywords: Vec<String>,
    pub dimensions: Vec<Dimension>,
    /// Global phase registry, first-appearance order
    pub phases: Vec<Phase>,
}

impl Dataset {
    /// Structurally valid dataset with no policies
    pub fn empty() -> Self {
        Self {
            policies: Vec::new(),
            keywords: Vec::new(),
            dimensions: Dimension::catalog(),
            phases: Vec::new(),
        }
    }

    pub fn policy(&self, id: PolicyId) -> Option<&Policy> {
        self.policies.iter().find(|p| p.id == id)
    }

    pub fn phase(&self, id: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }

    pub fn dimension(&self, id: DimensionId) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::empty()
    }
}
