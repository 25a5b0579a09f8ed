//! Layer domain model and interval rules.
//!
//! # Responsibility
//! - Define the layer record, its lithology classification and write inputs.
//! - Own the interval validity and non-overlap checks run before every
//!   layer write.
//!
//! # Invariants
//! - `end_depth > start_depth`, both non-negative.
//! - Intervals are half-open: `[0, 2)` and `[2, 5)` touch but do not overlap.
//! - `thickness` is derived on read and never stored.
//! - A layer never changes its owning well.

use crate::model::depth::Depth;
use crate::model::validation::ValidationError;
use crate::model::well::WellId;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a layer.
pub type LayerId = Uuid;

/// Soil/rock classification of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Lithology {
    /// Topsoil (fertile surface layer).
    Prs,
    Peat,
    Loam,
    SandyLoam,
    Sand,
}

impl Lithology {
    /// Every lithology in presentation order.
    pub const ALL: [Lithology; 5] = [
        Lithology::Prs,
        Lithology::Peat,
        Lithology::Loam,
        Lithology::SandyLoam,
        Lithology::Sand,
    ];

    /// Stable storage and wire code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Prs => "PRS",
            Self::Peat => "PEAT",
            Self::Loam => "LOAM",
            Self::SandyLoam => "SANDY_LOAM",
            Self::Sand => "SAND",
        }
    }

    pub fn parse_code(value: &str) -> Option<Self> {
        match value {
            "PRS" => Some(Self::Prs),
            "PEAT" => Some(Self::Peat),
            "LOAM" => Some(Self::Loam),
            "SANDY_LOAM" => Some(Self::SandyLoam),
            "SAND" => Some(Self::Sand),
            _ => None,
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Prs => "topsoil",
            Self::Peat => "peat",
            Self::Loam => "loam",
            Self::SandyLoam => "sandy loam",
            Self::Sand => "sand",
        }
    }
}

impl Display for Lithology {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Half-open depth interval `[start_depth, end_depth)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerInterval {
    pub start_depth: Depth,
    pub end_depth: Depth,
}

impl LayerInterval {
    pub fn new(start_depth: Depth, end_depth: Depth) -> Self {
        Self {
            start_depth,
            end_depth,
        }
    }

    /// Checks bound signs and `end_depth > start_depth`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.start_depth.is_negative() {
            return Err(ValidationError::NegativeDepth {
                field: "start_depth",
            });
        }
        if self.end_depth.is_negative() {
            return Err(ValidationError::NegativeDepth { field: "end_depth" });
        }
        if self.end_depth <= self.start_depth {
            return Err(ValidationError::EndNotAfterStart {
                start_depth: self.start_depth,
                end_depth: self.end_depth,
            });
        }
        Ok(())
    }

    /// Returns whether the two intervals share more than a boundary point.
    pub fn overlaps(&self, other: &LayerInterval) -> bool {
        self.start_depth < other.end_depth && self.end_depth > other.start_depth
    }

    pub fn thickness(&self) -> Depth {
        self.end_depth - self.start_depth
    }
}

/// Persisted layer record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub id: LayerId,
    pub well_id: WellId,
    pub start_depth: Depth,
    pub end_depth: Depth,
    pub lithology: Lithology,
    /// Free text; empty when not provided.
    pub description: String,
    /// Epoch ms.
    pub created_at: i64,
    /// Epoch ms.
    pub updated_at: i64,
}

impl Layer {
    pub fn interval(&self) -> LayerInterval {
        LayerInterval::new(self.start_depth, self.end_depth)
    }

    /// Derived span `end_depth - start_depth`.
    pub fn thickness(&self) -> Depth {
        self.interval().thickness()
    }

    /// Overwrites fields present in `patch`.
    ///
    /// # Errors
    /// - `WellReassignment` when the patch names a different well.
    ///
    /// Interval rules are not checked here; callers run
    /// [`validate_layer_placement`] on the result.
    pub fn apply(&mut self, patch: &LayerPatch) -> Result<(), ValidationError> {
        if let Some(requested) = patch.well_id {
            if requested != self.well_id {
                return Err(ValidationError::WellReassignment {
                    current: self.well_id,
                    requested,
                });
            }
        }
        if let Some(start_depth) = patch.start_depth {
            self.start_depth = start_depth;
        }
        if let Some(end_depth) = patch.end_depth {
            self.end_depth = end_depth;
        }
        if let Some(lithology) = patch.lithology {
            self.lithology = lithology;
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        Ok(())
    }
}

/// Serialized as `id, well, start_depth, end_depth, lithology, description,
/// thickness` to match the external API schema.
impl Serialize for Layer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct LayerWire<'a> {
            id: LayerId,
            well: WellId,
            start_depth: Depth,
            end_depth: Depth,
            lithology: Lithology,
            description: &'a str,
            thickness: Depth,
        }

        LayerWire {
            id: self.id,
            well: self.well_id,
            start_depth: self.start_depth,
            end_depth: self.end_depth,
            lithology: self.lithology,
            description: &self.description,
            thickness: self.thickness(),
        }
        .serialize(serializer)
    }
}

/// Input for creating a layer under an existing well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLayer {
    pub well_id: WellId,
    pub start_depth: Depth,
    pub end_depth: Depth,
    pub lithology: Lithology,
    pub description: String,
}

impl NewLayer {
    pub fn new(
        well_id: WellId,
        start_depth: Depth,
        end_depth: Depth,
        lithology: Lithology,
    ) -> Self {
        Self {
            well_id,
            start_depth,
            end_depth,
            lithology,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn interval(&self) -> LayerInterval {
        LayerInterval::new(self.start_depth, self.end_depth)
    }
}

/// Partial update for a layer. `None` leaves the field unchanged.
///
/// `well_id` may only repeat the current owner; it exists so full-replace
/// requests that echo the well reference are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerPatch {
    pub well_id: Option<WellId>,
    pub start_depth: Option<Depth>,
    pub end_depth: Option<Depth>,
    pub lithology: Option<Lithology>,
    pub description: Option<String>,
}

/// Fails with `Overlap` if `candidate` intersects any sibling other than
/// `exclude`.
pub fn check_no_overlap<'a>(
    candidate: &LayerInterval,
    siblings: impl IntoIterator<Item = &'a Layer>,
    exclude: Option<LayerId>,
) -> Result<(), ValidationError> {
    let conflict = siblings
        .into_iter()
        .filter(|sibling| Some(sibling.id) != exclude)
        .find(|sibling| candidate.overlaps(&sibling.interval()));

    match conflict {
        Some(sibling) => Err(ValidationError::Overlap {
            conflicting_layer: sibling.id,
        }),
        None => Ok(()),
    }
}

/// Full precondition for a layer write: interval validity, then overlap
/// against the other layers of the same well.
pub fn validate_layer_placement<'a>(
    candidate: &LayerInterval,
    siblings: impl IntoIterator<Item = &'a Layer>,
    exclude: Option<LayerId>,
) -> Result<(), ValidationError> {
    candidate.validate()?;
    check_no_overlap(candidate, siblings, exclude)
}

#[cfg(test)]
mod tests {
    use super::{check_no_overlap, validate_layer_placement, Layer, LayerInterval, Lithology};
    use crate::model::depth::Depth;
    use crate::model::validation::ValidationError;
    use uuid::Uuid;

    fn m(value: i64) -> Depth {
        Depth::from_whole_meters(value)
    }

    fn layer(start: i64, end: i64) -> Layer {
        Layer {
            id: Uuid::new_v4(),
            well_id: Uuid::nil(),
            start_depth: m(start),
            end_depth: m(end),
            lithology: Lithology::Loam,
            description: String::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let upper = LayerInterval::new(m(0), m(2));
        let lower = LayerInterval::new(m(2), m(5));
        assert!(!upper.overlaps(&lower));
        assert!(!lower.overlaps(&upper));
    }

    #[test]
    fn nested_and_partial_intervals_overlap() {
        let outer = LayerInterval::new(m(0), m(10));
        assert!(outer.overlaps(&LayerInterval::new(m(2), m(3))));
        assert!(LayerInterval::new(m(0), m(3)).overlaps(&LayerInterval::new(m(2), m(5))));
    }

    #[test]
    fn validate_rejects_empty_and_reversed_intervals() {
        let empty = LayerInterval::new(m(2), m(2));
        assert!(matches!(
            empty.validate(),
            Err(ValidationError::EndNotAfterStart { .. })
        ));
        let reversed = LayerInterval::new(m(3), m(1));
        assert_eq!(
            reversed.validate().unwrap_err().to_string(),
            "end depth must exceed start depth"
        );
        let negative = LayerInterval::new(Depth::from_centimeters(-1), m(1));
        assert_eq!(negative.validate().unwrap_err().field(), Some("start_depth"));
    }

    #[test]
    fn overlap_check_skips_excluded_layer() {
        let existing = layer(0, 3);
        let siblings = vec![existing.clone(), layer(5, 8)];

        let moved = LayerInterval::new(m(1), m(4));
        let err = check_no_overlap(&moved, &siblings, None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Overlap {
                conflicting_layer: existing.id
            }
        );
        assert!(check_no_overlap(&moved, &siblings, Some(existing.id)).is_ok());
    }

    #[test]
    fn placement_checks_interval_before_overlap() {
        let siblings = vec![layer(0, 3)];
        let reversed = LayerInterval::new(m(2), m(1));
        assert!(matches!(
            validate_layer_placement(&reversed, &siblings, None),
            Err(ValidationError::EndNotAfterStart { .. })
        ));
    }

    #[test]
    fn serialization_includes_derived_thickness() {
        let mut record = layer(1, 4);
        record.start_depth = Depth::from_centimeters(125);
        record.lithology = Lithology::SandyLoam;

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["start_depth"], "1.25");
        assert_eq!(json["end_depth"], "4.00");
        assert_eq!(json["thickness"], "2.75");
        assert_eq!(json["lithology"], "SANDY_LOAM");
        assert_eq!(json["well"], Uuid::nil().to_string());
    }

    #[test]
    fn lithology_codes_roundtrip() {
        for lithology in Lithology::ALL {
            assert_eq!(Lithology::parse_code(lithology.code()), Some(lithology));
        }
        assert_eq!(Lithology::parse_code("GRAVEL"), None);
    }
}
