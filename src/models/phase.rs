//! Implementation phases

use crate::models::policy::PolicyId;
use serde::{Deserialize, Serialize};

/// An implementation stage, identified by the slug of its display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: String,
    pub name: String,
    /// Policies assigned to this phase, in ingestion order
    pub policy_ids: Vec<PolicyId>,
}

impl Phase {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            policy_ids: Vec::new(),
        }
    }
}
