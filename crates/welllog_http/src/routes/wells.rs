//! Well endpoints, including the well-scoped layer routes.

use crate::dto::{LayerBody, WellBody, WellPatchBody};
use crate::error::ApiResult;
use crate::state::{layer_service, well_service, AppState};
use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use serde_json::Value;
use welllog_core::{WellId, WellPatch};

#[get("/wells")]
pub async fn list_wells(state: web::Data<AppState>) -> ApiResult<HttpResponse> {
    let wells = state
        .run(|conn| Ok(well_service(conn)?.list_wells()?))
        .await?;
    Ok(HttpResponse::Ok().json(wells))
}

#[post("/wells")]
pub async fn create_well(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let new_well = WellBody::try_from(body.into_inner())?.into_new_well();
    let created = state
        .run(move |conn| Ok(well_service(conn)?.create_well(new_well)?))
        .await?;
    Ok(HttpResponse::Created().json(created))
}

#[get("/wells/{id}")]
pub async fn get_well(
    state: web::Data<AppState>,
    path: web::Path<WellId>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let well = state
        .run(move |conn| Ok(well_service(conn)?.get_well(id)?))
        .await?;
    Ok(HttpResponse::Ok().json(well))
}

#[put("/wells/{id}")]
pub async fn replace_well(
    state: web::Data<AppState>,
    path: web::Path<WellId>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let patch = WellBody::try_from(body.into_inner())?.into_patch();
    update(state, path.into_inner(), patch).await
}

#[patch("/wells/{id}")]
pub async fn patch_well(
    state: web::Data<AppState>,
    path: web::Path<WellId>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let patch: WellPatch = WellPatchBody::try_from(body.into_inner())?.into();
    update(state, path.into_inner(), patch).await
}

async fn update(
    state: web::Data<AppState>,
    id: WellId,
    patch: WellPatch,
) -> ApiResult<HttpResponse> {
    let well = state
        .run(move |conn| Ok(well_service(conn)?.update_well(id, patch)?))
        .await?;
    Ok(HttpResponse::Ok().json(well))
}

/// Deletes the well and every layer it owns.
#[delete("/wells/{id}")]
pub async fn delete_well(
    state: web::Data<AppState>,
    path: web::Path<WellId>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    state
        .run(move |conn| Ok(well_service(conn)?.delete_well(id)?))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Adds a layer to the well named in the path.
#[post("/wells/{id}/add_layer")]
pub async fn add_layer(
    state: web::Data<AppState>,
    path: web::Path<WellId>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let new_layer =
        LayerBody::try_from(body.into_inner())?.into_new_layer_for(path.into_inner());
    let created = state
        .run(move |conn| Ok(layer_service(conn)?.add_layer(new_layer)?))
        .await?;
    Ok(HttpResponse::Created().json(created))
}

#[get("/wells/{id}/layers")]
pub async fn list_well_layers(
    state: web::Data<AppState>,
    path: web::Path<WellId>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    let layers = state
        .run(move |conn| Ok(layer_service(conn)?.list_layers(id)?))
        .await?;
    Ok(HttpResponse::Ok().json(layers))
}
