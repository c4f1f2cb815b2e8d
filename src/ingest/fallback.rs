//! Synthetic dataset served when no workbook has ever been ingested

use crate::ingest::experts::ExpertMapper;
use crate::ingest::graph::build_connections;
use crate::ingest::normalize::{layout_radius, slugify, spread_angle};
use crate::ingest::patterns::KeywordTable;
use crate::models::{Complexity, Dataset, Dimension, DimensionId, Phase, Policy, PolicyId};

struct SamplePolicy {
    title: &'static str,
    description: &'static str,
    dimension: DimensionId,
    phase: &'static str,
    keywords: [&'static str; 3],
    complexity: Complexity,
}

const SAMPLES: [SamplePolicy; 3] = [
    SamplePolicy {
        title: "AI Readiness Assessment",
        description: "Comprehensive evaluation of AI infrastructure capabilities",
        dimension: DimensionId::Infrastructure,
        phase: "Assessment",
        keywords: ["assessment", "standards", "monitoring"],
        complexity: Complexity::Medium,
    },
    SamplePolicy {
        title: "AI Ethics Framework",
        description: "Establishment of ethical guidelines for AI development",
        dimension: DimensionId::Legislation,
        phase: "Development",
        keywords: ["ethics", "transparency", "accountability"],
        complexity: Complexity::High,
    },
    SamplePolicy {
        title: "Sustainable AI Infrastructure",
        description: "Developing eco-friendly AI computing infrastructure",
        dimension: DimensionId::Sustainability,
        phase: "Implementation",
        keywords: ["sustainability", "energy-efficiency", "infrastructure"],
        complexity: Complexity::Medium,
    },
];

/// Small, fully formed dataset: three policies, three phases, the keyword
/// library's canonical tags as vocabulary.
pub fn fallback_dataset(keywords: &KeywordTable, experts: &ExpertMapper) -> Dataset {
    let mut dimensions = Dimension::catalog();
    let mut phases: Vec<Phase> = Vec::new();
    let mut policies: Vec<Policy> = Vec::with_capacity(SAMPLES.len());

    for (index, sample) in SAMPLES.iter().enumerate() {
        let id = index as PolicyId + 1;
        let phase_id = slugify(sample.phase);
        let dimension = Dimension::from_spec(sample.dimension.spec());

        let mut policy = Policy {
            id,
            title: sample.title.to_string(),
            description: sample.description.to_string(),
            dimension: sample.dimension,
            phase_id: phase_id.clone(),
            keywords: sample.keywords.iter().map(|k| k.to_string()).collect(),
            complexity: sample.complexity,
            radius: layout_radius(sample.complexity, sample.keywords.len()),
            angle: spread_angle(&dimension, 0, 1),
            details: None,
            examples: None,
            expert_references: Vec::new(),
            connections: Vec::new(),
        };
        policy.expert_references = experts.experts_for(&policy);

        let mut phase = Phase::new(phase_id, sample.phase);
        phase.policy_ids.push(id);
        if let Some(owner) = dimensions.iter_mut().find(|d| d.id == sample.dimension) {
            owner.phases.push(phase.clone());
        }
        phases.push(phase);
        policies.push(policy);
    }

    build_connections(&mut policies);

    let mut vocabulary = keywords.tags();
    vocabulary.sort();

    Dataset {
        policies,
        keywords: vocabulary,
        dimensions,
        phases,
    }
}
