//! Well use-case service.
//!
//! # Responsibility
//! - Provide create/get/list/update/delete entry points for wells.
//! - Normalize text input before it reaches repository validation.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Read APIs return wells with their layers ordered by `start_depth`.

use crate::model::well::{NewWell, WellId, WellPatch, WellWithLayers};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::well_repo::WellRepository;

/// Use-case service wrapper for well operations.
pub struct WellService<R: WellRepository> {
    repo: R,
}

impl<R: WellRepository> WellService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a well from trimmed input.
    ///
    /// # Contract
    /// - Fails with `Validation` when a text field is blank/too long or
    ///   `design_depth` is outside `0..=30`.
    /// - Returns the stored well with an empty layer list.
    pub fn create_well(&self, well: NewWell) -> RepoResult<WellWithLayers> {
        let normalized = NewWell {
            name: normalize_text(well.name),
            area: normalize_text(well.area),
            structure: normalize_text(well.structure),
            design_depth: well.design_depth,
        };
        let well = self.repo.create_well(&normalized)?;
        Ok(WellWithLayers {
            well,
            layers: Vec::new(),
        })
    }

    /// Gets one well with its ordered layers, or `WellNotFound`.
    pub fn get_well(&self, id: WellId) -> RepoResult<WellWithLayers> {
        self.repo
            .get_well_with_layers(id)?
            .ok_or(RepoError::WellNotFound(id))
    }

    /// Lists all wells, each with its ordered layers.
    pub fn list_wells(&self) -> RepoResult<Vec<WellWithLayers>> {
        self.repo.list_wells()
    }

    /// Applies a partial update and returns the refreshed well.
    pub fn update_well(&self, id: WellId, patch: WellPatch) -> RepoResult<WellWithLayers> {
        let normalized = WellPatch {
            name: patch.name.map(normalize_text),
            area: patch.area.map(normalize_text),
            structure: patch.structure.map(normalize_text),
            design_depth: patch.design_depth,
        };
        self.repo.update_well(id, &normalized)?;
        self.get_well(id)
    }

    /// Deletes a well and all of its layers.
    pub fn delete_well(&self, id: WellId) -> RepoResult<()> {
        self.repo.delete_well(id)
    }
}

pub(crate) fn normalize_text(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        return value;
    }
    trimmed.to_string()
}
