//! Policy Normalizer
//!
//! Turns a classified data row into a [`Policy`]: id, phase slug, keywords,
//! complexity, layout radius and angle.

use crate::ingest::patterns::KeywordTable;
use crate::ingest::rows::PolicyRow;
use crate::models::dimension::{Dimension, DimensionId};
use crate::models::policy::{Complexity, Policy, PolicyId};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Hard cap on keywords kept per policy
pub const MAX_KEYWORDS: usize = 5;

/// Combined details+examples length above which a policy is `high`
const HIGH_COMPLEXITY_CHARS: usize = 800;
/// Combined details+examples length above which a policy is `medium`
const MEDIUM_COMPLEXITY_CHARS: usize = 400;

static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").expect("valid regex"));
static SLUG_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_-]+").expect("valid regex"));
static NON_KEYWORD_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]").expect("valid regex"));

/// Stable id for a phase name: `"Design of Policies & Process"` -> `"design-of-policies-process"`
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lowered, "");
    let hyphenated = SLUG_SEPARATORS.replace_all(&stripped, "-");
    hyphenated.trim_matches('-').to_string()
}

/// Normalization of a single pattern match
fn normalize_match(matched: &str) -> String {
    NON_KEYWORD_CHARS
        .replace_all(&matched.to_lowercase(), "")
        .into_owned()
}

/// Normalization of the explicit keyword column; inner spaces survive
fn normalize_keyword_cell(raw: &str) -> String {
    NON_SLUG_CHARS
        .replace_all(raw.trim().to_lowercase().as_str(), "")
        .trim()
        .to_string()
}

/// Tunables for the normalizer
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    pub keywords: KeywordTable,
    /// Words in the details text that force `high` complexity (case-sensitive)
    pub complexity_terms: Regex,
    pub max_keywords: usize,
}

impl NormalizerConfig {
    pub fn with_keywords(keywords: KeywordTable) -> Self {
        Self {
            keywords,
            ..Self::default()
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            keywords: KeywordTable::default(),
            complexity_terms: Regex::new(
                "assessment|framework|implementation|governance|comprehensive|systematic",
            )
            .expect("valid regex"),
            max_keywords: MAX_KEYWORDS,
        }
    }
}

/// Builds policies for one ingestion run.
///
/// Owns the run-wide id counter and keyword vocabulary; a new run starts
/// from a fresh normalizer.
pub struct PolicyNormalizer<'a> {
    config: &'a NormalizerConfig,
    next_id: PolicyId,
    vocabulary: BTreeSet<String>,
}

impl<'a> PolicyNormalizer<'a> {
    pub fn new(config: &'a NormalizerConfig) -> Self {
        Self {
            config,
            next_id: 1,
            vocabulary: BTreeSet::new(),
        }
    }

    /// Every keyword extracted in this run, sorted
    pub fn into_vocabulary(self) -> Vec<String> {
        self.vocabulary.into_iter().collect()
    }

    /// Full deduplicated keyword list, explicit keyword first
    pub fn extract_keywords(&self, text: &str, explicit: &str) -> Vec<String> {
        let mut keywords: Vec<String> = Vec::new();

        let explicit = normalize_keyword_cell(explicit);
        if !explicit.is_empty() {
            keywords.push(explicit);
        }

        for matched in self.config.keywords.find_all(text) {
            let normalized = normalize_match(matched);
            if normalized.chars().count() > 3 && !keywords.contains(&normalized) {
                keywords.push(normalized);
            }
        }
        keywords
    }

    pub fn complexity(&self, details: &str, examples: &str) -> Complexity {
        let total = details.chars().count() + examples.chars().count();
        if total > HIGH_COMPLEXITY_CHARS || self.config.complexity_terms.is_match(details) {
            Complexity::High
        } else if total > MEDIUM_COMPLEXITY_CHARS {
            Complexity::Medium
        } else {
            Complexity::Low
        }
    }

    /// Build the policy for `row`, the `index`-th of `count` policies in `dimension`
    pub fn normalize(
        &mut self,
        row: &PolicyRow,
        dimension: DimensionId,
        index: usize,
        count: usize,
    ) -> Policy {
        let text = format!("{} {} {}", row.details, row.examples, row.title);
        let extracted = self.extract_keywords(&text, &row.keyword);
        self.vocabulary.extend(extracted.iter().cloned());

        let complexity = self.complexity(&row.details, &row.examples);
        let radius = layout_radius(complexity, extracted.len());

        let mut keywords = extracted;
        keywords.truncate(self.config.max_keywords);

        let dim = Dimension::from_spec(dimension.spec());
        let description = if row.details.is_empty() {
            format!("Policy for {} governance", dim.short_name.to_lowercase())
        } else {
            row.details.clone()
        };

        let id = self.next_id;
        self.next_id += 1;

        Policy {
            id,
            title: row.title.clone(),
            description,
            dimension,
            phase_id: slugify(&row.phase_name),
            keywords,
            complexity,
            radius,
            angle: spread_angle(&dim, index, count),
            details: non_empty(&row.details),
            examples: non_empty(&row.examples),
            expert_references: Vec::new(),
            connections: Vec::new(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Layout radius, always within [0, 1]
pub fn layout_radius(complexity: Complexity, keyword_count: usize) -> f64 {
    let connection_weight = (keyword_count as f64 / MAX_KEYWORDS as f64).min(1.0);
    (0.5 + complexity.weight() * 0.3 + connection_weight * 0.2).min(1.0)
}

/// Angle of the `index`-th of `count` policies spread across the dimension's arc
pub fn spread_angle(dimension: &Dimension, index: usize, count: usize) -> f64 {
    if count <= 1 {
        return dimension.angle;
    }
    let (start, end) = dimension.arc();
    start + (end - start) * (index as f64 / (count - 1).max(1) as f64)
}
