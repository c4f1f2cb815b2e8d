//! Governance dimensions
//!
//! The five dimensions are static configuration. Only their phase membership
//! is filled in during ingestion.

use crate::models::phase::Phase;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Half of the angular slice each dimension owns on the radial chart.
pub const ARC_HALF_WIDTH: f64 = 36.0;

/// Closed set of governance dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionId {
    Infrastructure,
    Legislation,
    Sustainability,
    Economic,
    Education,
}

impl DimensionId {
    pub const ALL: [DimensionId; 5] = [
        DimensionId::Infrastructure,
        DimensionId::Legislation,
        DimensionId::Sustainability,
        DimensionId::Economic,
        DimensionId::Education,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DimensionId::Infrastructure => "infrastructure",
            DimensionId::Legislation => "legislation",
            DimensionId::Sustainability => "sustainability",
            DimensionId::Economic => "economic",
            DimensionId::Education => "education",
        }
    }

    /// Static display configuration for this dimension
    pub fn spec(&self) -> &'static DimensionSpec {
        // DIMENSIONS is declared in the same order as the enum
        &DIMENSIONS[*self as usize]
    }

    /// Resolve a workbook sheet name to its dimension.
    ///
    /// Both the plain sheet names and the numbered, truncated names produced
    /// by the spreadsheet export are accepted.
    pub fn from_sheet_name(sheet_name: &str) -> Option<Self> {
        let name = sheet_name.trim();
        SHEET_NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, id)| *id)
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DimensionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DimensionId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown dimension '{}'", s))
    }
}

/// Display configuration of a dimension
#[derive(Debug)]
pub struct DimensionSpec {
    pub id: DimensionId,
    pub name: &'static str,
    pub short_name: &'static str,
    pub color: &'static str,
    pub angle: f64,
}

pub const DIMENSIONS: [DimensionSpec; 5] = [
    DimensionSpec {
        id: DimensionId::Infrastructure,
        name: "Enabling Infrastructure",
        short_name: "Infrastructure",
        color: "#005193",
        angle: 0.0,
    },
    DimensionSpec {
        id: DimensionId::Legislation,
        name: "Legislation & Policy",
        short_name: "Legislation",
        color: "#FBAD17",
        angle: 72.0,
    },
    DimensionSpec {
        id: DimensionId::Sustainability,
        name: "Sustainability & Society",
        short_name: "Sustainability",
        color: "#9C27B0",
        angle: 144.0,
    },
    DimensionSpec {
        id: DimensionId::Economic,
        name: "Economic Measures & Innovation",
        short_name: "Economic",
        color: "#E11A2C",
        angle: 216.0,
    },
    DimensionSpec {
        id: DimensionId::Education,
        name: "Research, Education & Capacity",
        short_name: "Education",
        color: "#4CAF50",
        angle: 288.0,
    },
];

/// Sheet name -> dimension table
const SHEET_NAMES: &[(&str, DimensionId)] = &[
    ("Enabling Infrastructure", DimensionId::Infrastructure),
    ("Legislation and Policy", DimensionId::Legislation),
    ("Sustainability and Society", DimensionId::Sustainability),
    ("Economic Measures", DimensionId::Economic),
    ("Research, Education", DimensionId::Education),
    ("1. Enabling Infrastructure", DimensionId::Infrastructure),
    ("2. Legislation & Policy", DimensionId::Legislation),
    ("3. Sustainability & Society", DimensionId::Sustainability),
    ("4. Economic Measures & Innovati", DimensionId::Economic),
    ("5. Research, Education & Capaci", DimensionId::Education),
];

/// A dimension together with the phases that hold at least one of its policies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    pub id: DimensionId,
    pub name: String,
    pub short_name: String,
    pub color: String,
    pub angle: f64,
    pub phases: Vec<Phase>,
}

impl Dimension {
    pub fn from_spec(spec: &DimensionSpec) -> Self {
        Self {
            id: spec.id,
            name: spec.name.to_string(),
            short_name: spec.short_name.to_string(),
            color: spec.color.to_string(),
            angle: spec.angle,
            phases: Vec::new(),
        }
    }

    /// All five dimensions with empty phase lists
    pub fn catalog() -> Vec<Dimension> {
        DIMENSIONS.iter().map(Dimension::from_spec).collect()
    }

    /// Start and end angle of the arc owned by this dimension
    pub fn arc(&self) -> (f64, f64) {
        (self.angle - ARC_HALF_WIDTH, self.angle + ARC_HALF_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_table_matches_enum_order() {
        for id in DimensionId::ALL {
            assert_eq!(id.spec().id, id);
        }
    }

    #[test]
    fn test_angles_are_72_degrees_apart() {
        let catalog = Dimension::catalog();
        for pair in catalog.windows(2) {
            assert_eq!(pair[1].angle - pair[0].angle, 72.0);
        }
    }

    #[test]
    fn test_sheet_names_resolve_both_naming_schemes() {
        assert_eq!(
            DimensionId::from_sheet_name("Legislation and Policy"),
            Some(DimensionId::Legislation)
        );
        assert_eq!(
            DimensionId::from_sheet_name(" 4. Economic Measures & Innovati "),
            Some(DimensionId::Economic)
        );
        assert_eq!(DimensionId::from_sheet_name("Notes"), None);
    }

    #[test]
    fn test_dimension_id_parses_case_insensitively() {
        assert_eq!("Education".parse::<DimensionId>(), Ok(DimensionId::Education));
        assert!("finance".parse::<DimensionId>().is_err());
    }

    #[test]
    fn test_arc_is_centered_on_dimension_angle() {
        let legislation = Dimension::from_spec(DimensionId::Legislation.spec());
        assert_eq!(legislation.arc(), (36.0, 108.0));
    }
}
