//! Validation failures shared by well and layer write paths.

use crate::model::depth::Depth;
use crate::model::layer::LayerId;
use crate::model::well::WellId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A rejected write: the record violates a field or cross-record rule.
///
/// Each variant maps to one client-facing field (see [`ValidationError::field`])
/// or, for cross-record rules, to no field at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Text field is empty after trimming.
    BlankText { field: &'static str },
    /// Text field exceeds its character limit.
    TextTooLong {
        field: &'static str,
        max_chars: usize,
    },
    /// Depth field is below zero.
    NegativeDepth { field: &'static str },
    /// Depth field exceeds its upper bound.
    DepthAboveMaximum {
        field: &'static str,
        maximum: Depth,
    },
    /// Layer interval is empty or reversed.
    EndNotAfterStart { start_depth: Depth, end_depth: Depth },
    /// Layer interval intersects a sibling layer of the same well.
    Overlap { conflicting_layer: LayerId },
    /// Update tried to move a layer to another well.
    WellReassignment { current: WellId, requested: WellId },
}

impl ValidationError {
    /// Client-facing field name this failure is attached to.
    ///
    /// Returns `None` for rules that span several records.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::BlankText { field }
            | Self::TextTooLong { field, .. }
            | Self::NegativeDepth { field }
            | Self::DepthAboveMaximum { field, .. } => Some(*field),
            Self::EndNotAfterStart { .. } => Some("end_depth"),
            Self::Overlap { .. } => None,
            Self::WellReassignment { .. } => Some("well"),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankText { field } => write!(f, "{field} must not be blank"),
            Self::TextTooLong { field, max_chars } => {
                write!(f, "{field} must be at most {max_chars} characters")
            }
            Self::NegativeDepth { field } => write!(f, "{field} must not be negative"),
            Self::DepthAboveMaximum { field, maximum } => {
                write!(f, "{field} must be less than or equal to {maximum}")
            }
            Self::EndNotAfterStart { .. } => write!(f, "end depth must exceed start depth"),
            Self::Overlap { .. } => write!(f, "layers must not overlap"),
            Self::WellReassignment { .. } => write!(f, "layer cannot be moved to another well"),
        }
    }
}

impl Error for ValidationError {}
