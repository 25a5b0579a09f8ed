//! Core domain logic for the well log store.
//! This crate is the single source of truth for well and layer invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::depth::{Depth, DepthParseError};
pub use model::layer::{
    check_no_overlap, validate_layer_placement, Layer, LayerId, LayerInterval, LayerPatch,
    Lithology, NewLayer,
};
pub use model::validation::ValidationError;
pub use model::well::{
    validate_design_depth, NewWell, Well, WellId, WellPatch, WellWithLayers, MAX_DESIGN_DEPTH,
};
pub use repo::error::{RepoError, RepoResult};
pub use repo::layer_repo::{LayerListQuery, LayerRepository, SqliteLayerRepository};
pub use repo::well_repo::{SqliteWellRepository, WellRepository};
pub use service::layer_service::LayerService;
pub use service::well_service::WellService;

/// Minimal health-check API for adapters.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
