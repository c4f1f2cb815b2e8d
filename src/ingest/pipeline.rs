//! Ingestion pipeline
//!
//! workbook bytes -> sheets -> classified rows -> policies -> phases ->
//! connections. Runs to completion synchronously and produces a fresh
//! [`Dataset`]; nothing is carried over between runs.

use crate::error::IngestError;
use crate::ingest::experts::ExpertMapper;
use crate::ingest::graph::{build_connections, edge_count, isolated};
use crate::ingest::normalize::{NormalizerConfig, PolicyNormalizer};
use crate::ingest::patterns::HeaderPatterns;
use crate::ingest::rows::{PolicyRow, RowClassifier};
use crate::ingest::workbook::{decode_workbook, Workbook};
use crate::models::{Dataset, Dimension, DimensionId, Phase, Policy};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct IngestPipeline {
    headers: HeaderPatterns,
    normalizer: NormalizerConfig,
    experts: ExpertMapper,
}

impl IngestPipeline {
    pub fn new(headers: HeaderPatterns, normalizer: NormalizerConfig, experts: ExpertMapper) -> Self {
        Self {
            headers,
            normalizer,
            experts,
        }
    }

    pub fn normalizer_config(&self) -> &NormalizerConfig {
        &self.normalizer
    }

    pub fn experts(&self) -> &ExpertMapper {
        &self.experts
    }

    /// Decode workbook bytes and build the dataset
    pub fn ingest(&self, bytes: &[u8]) -> Result<Dataset, IngestError> {
        let workbook = decode_workbook(bytes)?;
        self.build(&workbook)
    }

    /// Build the dataset from an already decoded workbook
    pub fn build(&self, workbook: &Workbook) -> Result<Dataset, IngestError> {
        let pending = self.collect_rows(workbook)?;

        let mut per_dimension: HashMap<DimensionId, usize> = HashMap::new();
        for (dimension, _) in &pending {
            *per_dimension.entry(*dimension).or_insert(0) += 1;
        }

        let mut normalizer = PolicyNormalizer::new(&self.normalizer);
        let mut registry = PhaseRegistry::new();
        let mut positions: HashMap<DimensionId, usize> = HashMap::new();
        let mut policies: Vec<Policy> = Vec::with_capacity(pending.len());

        for (dimension, row) in &pending {
            let position = positions.entry(*dimension).or_insert(0);
            let count = per_dimension.get(dimension).copied().unwrap_or(1);

            let mut policy = normalizer.normalize(row, *dimension, *position, count);
            *position += 1;
            policy.expert_references = self.experts.experts_for(&policy);

            registry.record(&policy, row);
            policies.push(policy);
        }

        build_connections(&mut policies);
        debug!("Policies without connections: {:?}", isolated(&policies));

        let (phases, dimensions) = registry.finish();
        let keywords = normalizer.into_vocabulary();

        info!(
            "Ingested {} policies, {} phases, {} keywords, {} connections",
            policies.len(),
            phases.len(),
            keywords.len(),
            edge_count(&policies)
        );

        Ok(Dataset {
            policies,
            keywords,
            dimensions,
            phases,
        })
    }

    /// Classify every mapped sheet, keeping sheet order
    fn collect_rows(&self, workbook: &Workbook) -> Result<Vec<(DimensionId, PolicyRow)>, IngestError> {
        let classifier = RowClassifier::new(&self.headers);
        let mut pending = Vec::new();
        let mut mapped_sheets = 0;

        for sheet in &workbook.sheets {
            let Some(dimension) = DimensionId::from_sheet_name(&sheet.name) else {
                debug!("Ignoring sheet '{}': no matching dimension", sheet.name);
                continue;
            };
            mapped_sheets += 1;

            let state = classifier.classify(&sheet.rows());
            debug!(
                "Sheet '{}' -> {}: {} policy rows, {} skipped, phases {:?}",
                sheet.name,
                dimension,
                state.rows.len(),
                state.skipped,
                state.phases
            );
            pending.extend(state.rows.into_iter().map(|row| (dimension, row)));
        }

        if mapped_sheets == 0 {
            return Err(IngestError::parse(
                "workbook has no sheet matching a governance dimension",
            ));
        }
        if pending.is_empty() {
            return Err(IngestError::parse("workbook contains no policy rows"));
        }
        Ok(pending)
    }
}

impl Default for IngestPipeline {
    fn default() -> Self {
        Self::new(
            HeaderPatterns::default(),
            NormalizerConfig::default(),
            ExpertMapper::default(),
        )
    }
}

/// Global phase registry keyed by slug, plus each dimension's own view
struct PhaseRegistry {
    global: Vec<Phase>,
    index: HashMap<String, usize>,
    dimensions: Vec<Dimension>,
    collisions: HashSet<(String, String)>,
}

impl PhaseRegistry {
    fn new() -> Self {
        Self {
            global: Vec::new(),
            index: HashMap::new(),
            dimensions: Dimension::catalog(),
            collisions: HashSet::new(),
        }
    }

    fn record(&mut self, policy: &Policy, row: &PolicyRow) {
        let slot = match self.index.get(&policy.phase_id) {
            Some(&slot) => {
                let existing = &self.global[slot].name;
                if existing != &row.phase_name
                    && self
                        .collisions
                        .insert((existing.clone(), row.phase_name.clone()))
                {
                    warn!(
                        "Phase labels '{}' and '{}' share slug '{}' and are merged",
                        existing, row.phase_name, policy.phase_id
                    );
                }
                slot
            }
            None => {
                self.global
                    .push(Phase::new(policy.phase_id.clone(), row.phase_name.clone()));
                self.index
                    .insert(policy.phase_id.clone(), self.global.len() - 1);
                self.global.len() - 1
            }
        };
        self.global[slot].policy_ids.push(policy.id);

        if let Some(dimension) = self.dimensions.iter_mut().find(|d| d.id == policy.dimension) {
            match dimension.phases.iter_mut().find(|p| p.id == policy.phase_id) {
                Some(phase) => phase.policy_ids.push(policy.id),
                None => {
                    let mut phase = Phase::new(policy.phase_id.clone(), row.phase_name.clone());
                    phase.policy_ids.push(policy.id);
                    dimension.phases.push(phase);
                }
            }
        }
    }

    fn finish(self) -> (Vec<Phase>, Vec<Dimension>) {
        (self.global, self.dimensions)
    }
}
