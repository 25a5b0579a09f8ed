//! Route registration for the `/api` scope.

use crate::error::{ApiError, NON_FIELD_ERRORS};
use actix_web::web;

pub mod layers;
pub mod meta;
pub mod wells;

/// Registers every REST endpoint under `/api`.
///
/// Unparseable JSON and query strings are answered with the standard
/// [`ApiError`] envelope under `non_field_errors`. Field-level decode errors
/// come from the request DTOs.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        ApiError::invalid_request(message.clone())
            .with_field_error(NON_FIELD_ERRORS, message)
            .into()
    });
    let query_config = web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        ApiError::invalid_request(message.clone())
            .with_field_error(NON_FIELD_ERRORS, message)
            .into()
    });

    cfg.service(
        web::scope("/api")
            .app_data(json_config)
            .app_data(query_config)
            .service(meta::ping)
            .service(meta::list_lithologies)
            .service(wells::list_wells)
            .service(wells::create_well)
            .service(wells::get_well)
            .service(wells::replace_well)
            .service(wells::patch_well)
            .service(wells::delete_well)
            .service(wells::add_layer)
            .service(wells::list_well_layers)
            .service(layers::list_layers)
            .service(layers::create_layer)
            .service(layers::get_layer)
            .service(layers::replace_layer)
            .service(layers::patch_layer)
            .service(layers::delete_layer),
    );
}
