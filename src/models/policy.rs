//! Policy options and their derived relationships

use crate::models::dimension::DimensionId;
use serde::{Deserialize, Serialize};

/// Sequential policy id, assigned per ingestion run starting at 1
pub type PolicyId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    /// Weight used by the layout radius formula
    pub fn weight(&self) -> f64 {
        match self {
            Complexity::High => 1.0,
            Complexity::Medium => 0.8,
            Complexity::Low => 0.6,
        }
    }
}

/// Keyword overlap with another policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: PolicyId,
    pub shared_keywords: Vec<String>,
    pub strength: usize,
}

/// Seed reference to an advisory expert profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpertReference {
    pub name: String,
    pub profile_id: String,
    pub expertise: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub id: PolicyId,
    pub title: String,
    pub description: String,
    pub dimension: DimensionId,
    pub phase_id: String,
    /// At most five keywords, first-seen order
    pub keywords: Vec<String>,
    pub complexity: Complexity,
    /// Layout weight in [0, 1]
    pub radius: f64,
    /// Layout angle in degrees
    pub angle: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<String>,
    #[serde(default)]
    pub expert_references: Vec<ExpertReference>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Policy {
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    pub fn connection_to(&self, other: PolicyId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == other)
    }
}
