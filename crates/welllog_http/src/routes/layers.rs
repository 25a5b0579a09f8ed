//! Layer endpoints.

use crate::dto::{LayerBody, LayerFilter, LayerPatchBody};
use crate::error::ApiResult;
use crate::state::{layer_service, AppState};
use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use serde_json::Value;
use welllog_core::{LayerId, LayerPatch};

/// Lists layers ordered by start depth, optionally for one well (`?well=`).
#[get("/layers")]
pub async fn list_layers(
    state: web::Data<AppState>,
    filter: web::Query<LayerFilter>,
) -> ApiResult<HttpResponse> {
    let well = filter.well_id()?;
    let layers = state
        .run(move |conn| {
            let service = layer_service(conn)?;
            let layers = match well {
                Some(well_id) => service.list_layers(well_id)?,
                None => service.list_all_layers()?,
            };
            Ok(layers)
        })
        .await?;
    Ok(HttpResponse::Ok().json(layers))
}

#[post("/layers")]
pub async fn create_layer(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let new_layer = LayerBody::try_from(body.into_inner())?.into_new_layer()?;
    let created = state
        .run(move |conn| Ok(layer_service(conn)?.add_layer(new_layer)?))
        .await?;
    Ok(HttpResponse::Created().json(created))
}

#[get("/layers/{id}")]
pub async fn get_layer(
    state: web::Data<AppState>,
    path: web::Path<LayerId>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let layer = state
        .run(move |conn| Ok(layer_service(conn)?.get_layer(id)?))
        .await?;
    Ok(HttpResponse::Ok().json(layer))
}

#[put("/layers/{id}")]
pub async fn replace_layer(
    state: web::Data<AppState>,
    path: web::Path<LayerId>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let patch = LayerBody::try_from(body.into_inner())?.into_patch();
    update(state, path.into_inner(), patch).await
}

#[patch("/layers/{id}")]
pub async fn patch_layer(
    state: web::Data<AppState>,
    path: web::Path<LayerId>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let patch: LayerPatch = LayerPatchBody::try_from(body.into_inner())?.into();
    update(state, path.into_inner(), patch).await
}

async fn update(
    state: web::Data<AppState>,
    id: LayerId,
    patch: LayerPatch,
) -> ApiResult<HttpResponse> {
    let layer = state
        .run(move |conn| Ok(layer_service(conn)?.update_layer(id, patch)?))
        .await?;
    Ok(HttpResponse::Ok().json(layer))
}

#[delete("/layers/{id}")]
pub async fn delete_layer(
    state: web::Data<AppState>,
    path: web::Path<LayerId>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    state
        .run(move |conn| Ok(layer_service(conn)?.delete_layer(id)?))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
