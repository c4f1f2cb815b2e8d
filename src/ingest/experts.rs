//! Expert Mapper
//!
//! Static seed table of advisory experts: one per dimension, plus extra
//! specialists for policies tagged `ethics` or `governance`. This is not the
//! live expert directory; the two are never reconciled.

use crate::models::dimension::DimensionId;
use crate::models::policy::{ExpertReference, Policy};

pub const MAX_EXPERTS: usize = 3;

fn expert(name: &str, profile_id: &str, expertise: &[&str]) -> ExpertReference {
    ExpertReference {
        name: name.to_string(),
        profile_id: profile_id.to_string(),
        expertise: expertise.iter().map(|e| e.to_string()).collect(),
    }
}

#[derive(Debug, Clone)]
pub struct ExpertMapper {
    by_dimension: Vec<(DimensionId, ExpertReference)>,
    by_keyword: Vec<(String, ExpertReference)>,
    limit: usize,
}

impl ExpertMapper {
    pub fn new() -> Self {
        Self {
            by_dimension: vec![
                (
                    DimensionId::Infrastructure,
                    expert(
                        "Infrastructure Expert",
                        "infra-001",
                        &["AI Infrastructure", "Digital Policy", "Cloud Computing"],
                    ),
                ),
                (
                    DimensionId::Legislation,
                    expert(
                        "Policy Governance Expert",
                        "legal-001",
                        &["AI Regulation", "Policy Frameworks", "Compliance"],
                    ),
                ),
                (
                    DimensionId::Sustainability,
                    expert(
                        "Sustainability Specialist",
                        "sustain-001",
                        &["AI for SDGs", "Environmental Impact", "Ethical AI"],
                    ),
                ),
                (
                    DimensionId::Economic,
                    expert(
                        "Economic Policy Advisor",
                        "econ-001",
                        &["AI Economics", "Innovation Policy", "Digital Markets"],
                    ),
                ),
                (
                    DimensionId::Education,
                    expert(
                        "Education Technology Expert",
                        "edu-001",
                        &["AI Education", "Capacity Building", "Digital Literacy"],
                    ),
                ),
            ],
            by_keyword: vec![
                (
                    "ethics".to_string(),
                    expert(
                        "AI Ethics Specialist",
                        "ethics-001",
                        &["Ethical AI", "Human Rights", "Algorithmic Bias"],
                    ),
                ),
                (
                    "governance".to_string(),
                    expert(
                        "Governance Expert",
                        "gov-001",
                        &["Policy Implementation", "Regulatory Frameworks"],
                    ),
                ),
            ],
            limit: MAX_EXPERTS,
        }
    }

    /// Experts for a policy: dimension expert first, then keyword specialists
    pub fn experts_for(&self, policy: &Policy) -> Vec<ExpertReference> {
        let dimension_experts = self
            .by_dimension
            .iter()
            .filter(|(dimension, _)| *dimension == policy.dimension)
            .map(|(_, e)| e);
        let keyword_experts = self
            .by_keyword
            .iter()
            .filter(|(keyword, _)| policy.has_keyword(keyword))
            .map(|(_, e)| e);

        dimension_experts
            .chain(keyword_experts)
            .take(self.limit)
            .cloned()
            .collect()
    }
}

impl Default for ExpertMapper {
    fn default() -> Self {
        Self::new()
    }
}
