//! Well domain model.
//!
//! # Responsibility
//! - Define the well record and its create/patch inputs.
//! - Provide the explicit field validation run before every well write.
//!
//! # Invariants
//! - `name`, `area` and `structure` are non-blank and at most
//!   [`MAX_TEXT_CHARS`] characters.
//! - `design_depth` lies in `0..=MAX_DESIGN_DEPTH`.

use crate::model::depth::Depth;
use crate::model::layer::Layer;
use crate::model::validation::ValidationError;
use serde::Serialize;
use uuid::Uuid;

/// Stable identifier of a well.
pub type WellId = Uuid;

/// Character limit for well text fields.
pub const MAX_TEXT_CHARS: usize = 255;

/// Deepest design depth a well may be planned for (30 m).
pub const MAX_DESIGN_DEPTH: Depth = Depth::from_whole_meters(30);

/// Persisted well record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Well {
    pub id: WellId,
    pub name: String,
    pub area: String,
    pub structure: String,
    pub design_depth: Depth,
    /// Epoch ms, set once on insert.
    pub created_at: i64,
    /// Epoch ms, bumped on every update.
    pub updated_at: i64,
}

impl Well {
    /// Validates all well fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_well_fields(&self.name, &self.area, &self.structure, self.design_depth)
    }

    /// Overwrites fields present in `patch`. Does not validate.
    pub fn apply(&mut self, patch: &WellPatch) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(area) = &patch.area {
            self.area.clone_from(area);
        }
        if let Some(structure) = &patch.structure {
            self.structure.clone_from(structure);
        }
        if let Some(design_depth) = patch.design_depth {
            self.design_depth = design_depth;
        }
    }
}

/// Input for creating a well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWell {
    pub name: String,
    pub area: String,
    pub structure: String,
    pub design_depth: Depth,
}

impl NewWell {
    pub fn new(
        name: impl Into<String>,
        area: impl Into<String>,
        structure: impl Into<String>,
        design_depth: Depth,
    ) -> Self {
        Self {
            name: name.into(),
            area: area.into(),
            structure: structure.into(),
            design_depth,
        }
    }

    /// Validates all well fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_well_fields(&self.name, &self.area, &self.structure, self.design_depth)
    }
}

/// Partial update for a well. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WellPatch {
    pub name: Option<String>,
    pub area: Option<String>,
    pub structure: Option<String>,
    pub design_depth: Option<Depth>,
}

/// Well read model with its layers ordered by `start_depth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WellWithLayers {
    #[serde(flatten)]
    pub well: Well,
    pub layers: Vec<Layer>,
}

/// Validates a complete set of well fields, reporting the first failure.
pub fn validate_well_fields(
    name: &str,
    area: &str,
    structure: &str,
    design_depth: Depth,
) -> Result<(), ValidationError> {
    validate_text("name", name)?;
    validate_text("area", area)?;
    validate_text("structure", structure)?;
    validate_design_depth(design_depth)
}

/// Checks `design_depth` against `0..=MAX_DESIGN_DEPTH`.
pub fn validate_design_depth(design_depth: Depth) -> Result<(), ValidationError> {
    if design_depth.is_negative() {
        return Err(ValidationError::NegativeDepth {
            field: "design_depth",
        });
    }
    if design_depth > MAX_DESIGN_DEPTH {
        return Err(ValidationError::DepthAboveMaximum {
            field: "design_depth",
            maximum: MAX_DESIGN_DEPTH,
        });
    }
    Ok(())
}

fn validate_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankText { field });
    }
    if value.chars().count() > MAX_TEXT_CHARS {
        return Err(ValidationError::TextTooLong {
            field,
            max_chars: MAX_TEXT_CHARS,
        });
    }
    Ok(())
}
