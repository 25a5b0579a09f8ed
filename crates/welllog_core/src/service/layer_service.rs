//! Layer use-case service.
//!
//! # Responsibility
//! - Provide add/get/list/update/delete entry points for layers.
//! - Scope every list to a well unless the caller explicitly asks for all.

use crate::model::layer::{Layer, LayerId, LayerPatch, NewLayer};
use crate::model::well::WellId;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::layer_repo::{LayerListQuery, LayerRepository};
use crate::service::well_service::normalize_text;

/// Use-case service wrapper for layer operations.
pub struct LayerService<R: LayerRepository> {
    repo: R,
}

impl<R: LayerRepository> LayerService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a layer to an existing well.
    ///
    /// # Contract
    /// - `WellNotFound` when `layer.well_id` does not exist.
    /// - `Validation` when the interval is empty/reversed/negative or
    ///   overlaps another layer of the same well.
    pub fn add_layer(&self, layer: NewLayer) -> RepoResult<Layer> {
        let normalized = NewLayer {
            description: normalize_text(layer.description),
            ..layer
        };
        self.repo.add_layer(&normalized)
    }

    /// Gets one layer, or `LayerNotFound`.
    pub fn get_layer(&self, id: LayerId) -> RepoResult<Layer> {
        self.repo.get_layer(id)?.ok_or(RepoError::LayerNotFound(id))
    }

    /// Lists the layers of one well ordered by `start_depth`.
    pub fn list_layers(&self, well_id: WellId) -> RepoResult<Vec<Layer>> {
        self.repo.list_layers(&LayerListQuery::for_well(well_id))
    }

    /// Lists layers across all wells ordered by `start_depth`.
    pub fn list_all_layers(&self) -> RepoResult<Vec<Layer>> {
        self.repo.list_layers(&LayerListQuery::default())
    }

    /// Applies a partial update, re-validating against sibling layers.
    pub fn update_layer(&self, id: LayerId, patch: LayerPatch) -> RepoResult<Layer> {
        let normalized = LayerPatch {
            description: patch.description.map(normalize_text),
            ..patch
        };
        self.repo.update_layer(id, &normalized)
    }

    pub fn delete_layer(&self, id: LayerId) -> RepoResult<()> {
        self.repo.delete_layer(id)
    }
}
