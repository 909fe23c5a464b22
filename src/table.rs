//! Parameter cells and column projection for summary tables.

use serde::{Deserialize, Serialize};

/// One row of a parameter-description table.
///
/// Fields are addressed by position through [`CellField`]; the canonical
/// order never changes, projections only choose which positions to emit.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterCell {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// Required flag or validation constraints, as written in source.
    pub required: String,
    #[serde(rename = "default")]
    pub default_value: String,
    pub description: String,
}

/// Canonical field positions of a [`ParameterCell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellField {
    Name = 0,
    Type = 1,
    Required = 2,
    Default = 3,
    Description = 4,
}

/// Columns of the per-endpoint parameter summary.
pub const SUMMARY_COLUMNS: &[CellField] =
    &[CellField::Name, CellField::Type, CellField::Description];

/// Every field, in canonical order. Used for appendix rows.
pub const ALL_COLUMNS: &[CellField] = &[
    CellField::Name,
    CellField::Type,
    CellField::Required,
    CellField::Default,
    CellField::Description,
];

impl CellField {
    /// Column heading used when a table is rendered with a header row.
    pub fn label(self) -> &'static str {
        match self {
            CellField::Name => "Name",
            CellField::Type => "Type",
            CellField::Required => "Validation",
            CellField::Default => "Default",
            CellField::Description => "Description",
        }
    }
}

impl TryFrom<usize> for CellField {
    type Error = usize;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(CellField::Name),
            1 => Ok(CellField::Type),
            2 => Ok(CellField::Required),
            3 => Ok(CellField::Default),
            4 => Ok(CellField::Description),
            other => Err(other),
        }
    }
}

impl ParameterCell {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        required: impl Into<String>,
        default_value: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            required: required.into(),
            default_value: default_value.into(),
            description: description.into(),
        }
    }

    pub fn get(&self, field: CellField) -> &str {
        match field {
            CellField::Name => &self.name,
            CellField::Type => &self.type_name,
            CellField::Required => &self.required,
            CellField::Default => &self.default_value,
            CellField::Description => &self.description,
        }
    }

    /// Select the given positions, in the order requested.
    pub fn select(&self, positions: &[CellField]) -> Vec<String> {
        positions.iter().map(|f| self.get(*f).to_string()).collect()
    }
}

/// Project cells onto the given columns.
///
/// One output row per cell, in input order, each with exactly
/// `positions.len()` columns.
pub fn project(cells: &[ParameterCell], positions: &[CellField]) -> Vec<Vec<String>> {
    cells.iter().map(|cell| cell.select(positions)).collect()
}

/// Header row matching a projection.
pub fn header_row(positions: &[CellField]) -> Vec<String> {
    positions.iter().map(|f| f.label().to_string()).collect()
}
