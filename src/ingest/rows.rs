//! Row Classifier & Phase Tracker
//!
//! Phase names appear only on the first row of each phase block; every later
//! row inherits the last recognised label. The tracker is an explicit fold
//! over the rows of one sheet threading a [`PhaseState`] accumulator.

use crate::ingest::patterns::{ColumnRole, HeaderPatterns};
use crate::ingest::workbook::RowRecord;
use tracing::trace;

/// Phase assigned to rows that precede any phase label
pub const DEFAULT_PHASE: &str = "Analyse needs and plan for fundamentals";

/// Which column letter holds each field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub phase: String,
    pub title: String,
    pub details: String,
    pub examples: String,
    pub keyword: String,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            phase: "A".to_string(),
            title: "B".to_string(),
            details: "C".to_string(),
            examples: "D".to_string(),
            keyword: "E".to_string(),
        }
    }
}

impl ColumnLayout {
    fn slot(&mut self, role: ColumnRole) -> &mut String {
        match role {
            ColumnRole::Phase => &mut self.phase,
            ColumnRole::Title => &mut self.title,
            ColumnRole::Details => &mut self.details,
            ColumnRole::Examples => &mut self.examples,
            ColumnRole::Keyword => &mut self.keyword,
        }
    }

    /// Layout described by a header row.
    ///
    /// A row counts as a header row when at least two of its cells carry
    /// distinct column labels. Roles without a labelled cell keep their
    /// default letter.
    pub fn from_header_row(row: &RowRecord, headers: &HeaderPatterns) -> Option<Self> {
        let mut layout = ColumnLayout::default();
        let mut seen: Vec<ColumnRole> = Vec::new();

        for (column, value) in row.cells() {
            if let Some(role) = headers.column_role(value) {
                if !seen.contains(&role) {
                    *layout.slot(role) = column.to_string();
                    seen.push(role);
                }
            }
        }

        (seen.len() >= 2).then_some(layout)
    }
}

/// A data row with its resolved phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRow {
    pub source_row: u32,
    pub phase_name: String,
    pub title: String,
    pub details: String,
    pub examples: String,
    pub keyword: String,
}

/// Accumulator threaded through the fold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseState {
    pub current_phase: String,
    pub layout: ColumnLayout,
    /// Phase names in first-appearance order
    pub phases: Vec<String>,
    pub rows: Vec<PolicyRow>,
    pub skipped: usize,
}

impl PhaseState {
    pub fn new() -> Self {
        Self {
            current_phase: DEFAULT_PHASE.to_string(),
            layout: ColumnLayout::default(),
            phases: Vec::new(),
            rows: Vec::new(),
            skipped: 0,
        }
    }
}

impl Default for PhaseState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct RowClassifier<'a> {
    headers: &'a HeaderPatterns,
}

impl<'a> RowClassifier<'a> {
    pub fn new(headers: &'a HeaderPatterns) -> Self {
        Self { headers }
    }

    /// One state transition
    pub fn step(&self, mut state: PhaseState, row: &RowRecord) -> PhaseState {
        if let Some(layout) = ColumnLayout::from_header_row(row, self.headers) {
            trace!("Row {} is a header row: {:?}", row.number, layout);
            state.layout = layout;
            return state;
        }

        let title = row.get(&state.layout.title).trim();
        if title.is_empty() {
            trace!("Row {} skipped: no policy title", row.number);
            state.skipped += 1;
            return state;
        }

        let phase_cell = row.get(&state.layout.phase).trim();
        if !phase_cell.is_empty() && !self.headers.is_header(phase_cell) {
            state.current_phase = phase_cell.to_string();
        }

        if !state.phases.contains(&state.current_phase) {
            state.phases.push(state.current_phase.clone());
        }

        let record = PolicyRow {
            source_row: row.number,
            phase_name: state.current_phase.clone(),
            title: title.to_string(),
            details: row.get(&state.layout.details).trim().to_string(),
            examples: row.get(&state.layout.examples).trim().to_string(),
            keyword: row.get(&state.layout.keyword).to_string(),
        };
        state.rows.push(record);
        state
    }

    /// Fold all rows of one sheet
    pub fn classify(&self, rows: &[RowRecord]) -> PhaseState {
        rows.iter()
            .fold(PhaseState::new(), |state, row| self.step(state, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(number: u32, phase: &str, title: &str) -> RowRecord {
        RowRecord::new(number).with_cell("A", phase).with_cell("B", title)
    }

    fn phases_of(state: &PhaseState) -> Vec<(&str, &str)> {
        state
            .rows
            .iter()
            .map(|r| (r.title.as_str(), r.phase_name.as_str()))
            .collect()
    }

    #[test]
    fn test_phase_carries_forward() {
        let headers = HeaderPatterns::default();
        let state = RowClassifier::new(&headers).classify(&[
            row(1, "A", "x"),
            row(2, "", "y"),
            row(3, "", "z"),
        ]);
        assert_eq!(phases_of(&state), vec![("x", "A"), ("y", "A"), ("z", "A")]);
        assert_eq!(state.phases, vec!["A"]);
    }

    #[test]
    fn test_rows_before_any_label_use_default_phase() {
        let headers = HeaderPatterns::default();
        let state = RowClassifier::new(&headers).classify(&[row(1, "", "x"), row(2, "Design", "y")]);
        assert_eq!(phases_of(&state), vec![("x", DEFAULT_PHASE), ("y", "Design")]);
        assert_eq!(state.phases, vec![DEFAULT_PHASE, "Design"]);
    }

    #[test]
    fn test_header_text_in_phase_cell_is_ignored() {
        let headers = HeaderPatterns::default();
        let state = RowClassifier::new(&headers).classify(&[
            row(1, "Design", "x"),
            row(2, "Policy Option", "y"),
        ]);
        assert_eq!(phases_of(&state), vec![("x", "Design"), ("y", "Design")]);
    }

    #[test]
    fn test_rows_without_title_do_not_touch_phase() {
        let headers = HeaderPatterns::default();
        let step = RowClassifier::new(&headers);
        let before = step.step(PhaseState::new(), &row(1, "Design", "x"));
        let after = step.step(before.clone(), &row(2, "Monitoring", "   "));

        assert_eq!(after.current_phase, "Design");
        assert_eq!(after.rows, before.rows);
        assert_eq!(after.skipped, 1);
    }

    #[test]
    fn test_values_are_trimmed() {
        let headers = HeaderPatterns::default();
        let record = RowRecord::new(7)
            .with_cell("A", "  Design  ")
            .with_cell("B", " Title ")
            .with_cell("C", " details ")
            .with_cell("D", " examples ");
        let state = RowClassifier::new(&headers).classify(&[record]);
        let only = &state.rows[0];
        assert_eq!(only.source_row, 7);
        assert_eq!(only.phase_name, "Design");
        assert_eq!(only.title, "Title");
        assert_eq!(only.details, "details");
        assert_eq!(only.examples, "examples");
    }

    #[test]
    fn test_header_row_is_consumed_and_defines_layout() {
        let headers = HeaderPatterns::default();
        let header = RowRecord::new(1)
            .with_cell("A", "Policy Option")
            .with_cell("B", "Phases of the Policy Option (relevance/goal)")
            .with_cell("C", "Keyword")
            .with_cell("D", "Examples")
            .with_cell("E", "Details/Actions to be taken by govts");
        let data = RowRecord::new(2)
            .with_cell("A", "Open data portal")
            .with_cell("B", "Design")
            .with_cell("C", "privacy")
            .with_cell("D", "Estonia")
            .with_cell("E", "Publish datasets");

        let state = RowClassifier::new(&headers).classify(&[header, data]);
        assert_eq!(state.rows.len(), 1);
        let only = &state.rows[0];
        assert_eq!(only.title, "Open data portal");
        assert_eq!(only.phase_name, "Design");
        assert_eq!(only.keyword, "privacy");
        assert_eq!(only.examples, "Estonia");
        assert_eq!(only.details, "Publish datasets");
    }

    #[test]
    fn test_single_label_is_not_a_header_row() {
        let headers = HeaderPatterns::default();
        let record = row(1, "Design", "Policy Option");
        assert_eq!(ColumnLayout::from_header_row(&record, &headers), None);
    }
}
