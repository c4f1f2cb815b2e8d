//! Connection Graph Builder
//!
//! Links every pair of policies that share at least one keyword. Each policy
//! stores its own copy of the edge so lookups from either end are direct.

use crate::models::policy::{Connection, Policy, PolicyId};

/// Keywords of `a` that also appear in `b`, in `a`'s order
pub fn shared_keywords(a: &Policy, b: &Policy) -> Vec<String> {
    a.keywords
        .iter()
        .filter(|k| b.keywords.contains(k))
        .cloned()
        .collect()
}

/// Populate `connections` on every policy. O(n² · k), fine at dashboard scale.
pub fn build_connections(policies: &mut [Policy]) {
    let computed: Vec<Vec<Connection>> = policies
        .iter()
        .map(|policy| {
            policies
                .iter()
                .filter(|other| other.id != policy.id)
                .filter_map(|other| {
                    let shared = shared_keywords(policy, other);
                    (!shared.is_empty()).then(|| Connection {
                        id: other.id,
                        strength: shared.len(),
                        shared_keywords: shared,
                    })
                })
                .collect()
        })
        .collect();

    for (policy, connections) in policies.iter_mut().zip(computed) {
        policy.connections = connections;
    }
}

/// Connections of a policy ranked by strength (desc), then id (asc)
pub fn ranked_connections(policy: &Policy, min_strength: usize) -> Vec<Connection> {
    let mut ranked: Vec<Connection> = policy
        .connections
        .iter()
        .filter(|c| c.strength >= min_strength)
        .cloned()
        .collect();
    ranked.sort_by(|a, b| b.strength.cmp(&a.strength).then(a.id.cmp(&b.id)));
    ranked
}

/// Total number of materialized edges (each direction counted)
pub fn edge_count(policies: &[Policy]) -> usize {
    policies.iter().map(|p| p.connections.len()).sum()
}

/// Ids of policies with no keyword overlap to any other
pub fn isolated(policies: &[Policy]) -> Vec<PolicyId> {
    policies
        .iter()
        .filter(|p| p.connections.is_empty())
        .map(|p| p.id)
        .collect()
}
