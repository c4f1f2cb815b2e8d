//! Read-side queries over a dataset snapshot

use crate::ingest::graph::ranked_connections;
use crate::models::{Dataset, DimensionId, Policy, PolicyId};
use serde::Serialize;

/// Conjunction of optional filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyFilter {
    pub dimension: Option<DimensionId>,
    pub phase: Option<String>,
    pub keyword: Option<String>,
    /// Case-insensitive substring over title, description and keywords
    pub text: Option<String>,
}

impl PolicyFilter {
    pub fn matches(&self, policy: &Policy) -> bool {
        if self.dimension.is_some_and(|d| d != policy.dimension) {
            return false;
        }
        if self.phase.as_deref().is_some_and(|p| p != policy.phase_id) {
            return false;
        }
        if self
            .keyword
            .as_deref()
            .is_some_and(|k| !policy.has_keyword(&k.to_lowercase()))
        {
            return false;
        }
        match self.text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => {
                let needle = text.to_lowercase();
                policy.title.to_lowercase().contains(&needle)
                    || policy.description.to_lowercase().contains(&needle)
                    || policy.keywords.iter().any(|k| k.contains(&needle))
            }
            _ => true,
        }
    }
}

pub fn filter_policies<'a>(dataset: &'a Dataset, filter: &PolicyFilter) -> Vec<&'a Policy> {
    dataset
        .policies
        .iter()
        .filter(|policy| filter.matches(policy))
        .collect()
}

/// A connected policy, ranked
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedPolicy {
    pub id: PolicyId,
    pub title: String,
    pub dimension: DimensionId,
    pub shared_keywords: Vec<String>,
    pub strength: usize,
}

/// Connections of `id`, strongest first; `None` if the policy does not exist
pub fn related_policies(
    dataset: &Dataset,
    id: PolicyId,
    min_strength: usize,
) -> Option<Vec<RelatedPolicy>> {
    let policy = dataset.policy(id)?;
    let related = ranked_connections(policy, min_strength)
        .into_iter()
        .filter_map(|connection| {
            let other = dataset.policy(connection.id)?;
            Some(RelatedPolicy {
                id: other.id,
                title: other.title.clone(),
                dimension: other.dimension,
                shared_keywords: connection.shared_keywords,
                strength: connection.strength,
            })
        })
        .collect();
    Some(related)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionCount {
    pub dimension: DimensionId,
    pub name: String,
    pub policy_count: usize,
    pub phase_count: usize,
}

/// Policy and phase counts per dimension, in dimension order
pub fn dimension_counts(dataset: &Dataset) -> Vec<DimensionCount> {
    dataset
        .dimensions
        .iter()
        .map(|dimension| DimensionCount {
            dimension: dimension.id,
            name: dimension.name.clone(),
            policy_count: dataset
                .policies
                .iter()
                .filter(|p| p.dimension == dimension.id)
                .count(),
            phase_count: dimension.phases.len(),
        })
        .collect()
}
