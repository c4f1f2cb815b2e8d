//! Pattern tables driving the text heuristics
//!
//! Keyword extraction, header-row detection and column labels are all plain
//! regex tables so they can be swapped without touching the pipeline.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Serializable form of a keyword pattern, as read from a patterns file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordPatternSpec {
    /// Canonical tag naming the concept the pattern detects
    pub tag: String,
    /// Regex matched case-insensitively against policy text
    pub pattern: String,
}

impl KeywordPatternSpec {
    pub fn new(tag: &str, pattern: &str) -> Self {
        Self {
            tag: tag.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeywordPattern {
    pub tag: String,
    regex: Regex,
}

/// Ordered `(pattern, canonical tag)` table used for keyword extraction
#[derive(Debug, Clone)]
pub struct KeywordTable {
    patterns: Vec<KeywordPattern>,
}

impl KeywordTable {
    pub fn from_specs(specs: &[KeywordPatternSpec]) -> Result<Self, regex::Error> {
        let patterns = specs
            .iter()
            .map(|spec| {
                Ok(KeywordPattern {
                    tag: spec.tag.clone(),
                    regex: Regex::new(&format!("(?i){}", spec.pattern))?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { patterns })
    }

    /// Parse a JSON array of `{ "tag": ..., "pattern": ... }` entries
    pub fn from_json(json: &str) -> Result<Self, String> {
        let specs: Vec<KeywordPatternSpec> =
            serde_json::from_str(json).map_err(|e| format!("invalid keyword pattern file: {}", e))?;
        if specs.is_empty() {
            return Err("keyword pattern file contains no patterns".to_string());
        }
        Self::from_specs(&specs).map_err(|e| format!("invalid keyword pattern: {}", e))
    }

    /// The fourteen governance concepts the dashboard tags policies with
    pub fn default_specs() -> Vec<KeywordPatternSpec> {
        vec![
            KeywordPatternSpec::new("ethics", r"\b(ethics?|ethical)\b"),
            KeywordPatternSpec::new("transparency", r"\b(transparency|transparent)\b"),
            KeywordPatternSpec::new("standards", r"\b(standards?|standardization)\b"),
            KeywordPatternSpec::new("collaboration", r"\b(collaboration|collaborative|cooperat\w+)\b"),
            KeywordPatternSpec::new("innovation", r"\b(innovation|innovative)\b"),
            KeywordPatternSpec::new("assessment", r"\b(assessment|evaluate?|evaluation)\b"),
            KeywordPatternSpec::new("monitoring", r"\b(monitoring|oversight|supervision)\b"),
            KeywordPatternSpec::new("governance", r"\b(governance|governing)\b"),
            KeywordPatternSpec::new("security", r"\b(security|secure)\b"),
            KeywordPatternSpec::new("fairness", r"\b(fairness|fair|equity|equitable)\b"),
            KeywordPatternSpec::new("accountability", r"\b(accountability|accountable|responsible)\b"),
            KeywordPatternSpec::new("risk-management", r"\b(risk[- ]?management|risk)\b"),
            KeywordPatternSpec::new("stakeholder-engagement", r"\b(stakeholder[- ]?engagement|participation)\b"),
            KeywordPatternSpec::new("data-protection", r"\b(data[- ]?protection|privacy)\b"),
        ]
    }

    /// Canonical tags in table order
    pub fn tags(&self) -> Vec<String> {
        self.patterns.iter().map(|p| p.tag.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Every match of every pattern: table order first, then text position
    pub fn find_all<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.patterns
            .iter()
            .flat_map(|p| p.regex.find_iter(text).map(|m| m.as_str()))
            .collect()
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::from_specs(&Self::default_specs()).expect("built-in keyword patterns compile")
    }
}

/// Role of a workbook column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Phase,
    Title,
    Details,
    Examples,
    Keyword,
}

/// Header-text heuristics
#[derive(Debug, Clone)]
pub struct HeaderPatterns {
    /// Phrases that mark a phase cell as header noise
    noise: Vec<Regex>,
    /// Anchored column labels used to detect a header row
    labels: Vec<(ColumnRole, Regex)>,
}

impl HeaderPatterns {
    pub fn new(noise: &[&str], labels: &[(ColumnRole, &str)]) -> Result<Self, regex::Error> {
        let noise = noise
            .iter()
            .map(|p| Regex::new(&format!("(?i){}", p)))
            .collect::<Result<Vec<_>, _>>()?;
        let labels = labels
            .iter()
            .map(|(role, p)| Ok((*role, Regex::new(&format!("(?i){}", p))?)))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { noise, labels })
    }

    /// True if the text looks like column-header wording rather than a phase label
    pub fn is_header(&self, text: &str) -> bool {
        let text = text.trim();
        self.noise.iter().any(|re| re.is_match(text))
    }

    /// Column role whose header label this text carries, if any
    pub fn column_role(&self, text: &str) -> Option<ColumnRole> {
        let text = text.trim();
        self.labels
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(role, _)| *role)
    }
}

impl Default for HeaderPatterns {
    fn default() -> Self {
        Self::new(
            &[
                r"phases?\s+of\s+the\s+policy\s+option",
                r"relevance\s*/\s*goal",
                r"policy\s+option",
                r"details\s*/\s*actions",
                r"examples?",
                r"keywords?",
            ],
            &[
                // phase label must be tried before the title label it contains
                (ColumnRole::Phase, r"^phases?\s+of\s+the\s+policy\s+option"),
                (ColumnRole::Title, r"^policy\s+options?(\s*\(.*\))?$"),
                (ColumnRole::Details, r"^details\s*/\s*actions"),
                (ColumnRole::Examples, r"^examples?$"),
                (ColumnRole::Keyword, r"^keywords?$"),
            ],
        )
        .expect("built-in header patterns compile")
    }
}
