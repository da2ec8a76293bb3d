use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::id::ResourceId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::resource::{
        CreateResourceRequest, ResourceListQuery, ResourceTypesResponse,
        ResourceWithSlotsResponse, ResourcesResponse, UpdateResourceActiveRequest,
        UpdateResourceActiveRequestWithId,
    },
};

pub async fn show_resource_type_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ResourceTypesResponse>> {
    registry
        .resource_repository()
        .find_types()
        .await
        .map(ResourceTypesResponse::from)
        .map(Json)
}

pub async fn show_resource_list(
    Query(query): Query<ResourceListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ResourcesResponse>> {
    query.validate(&())?;

    registry
        .resource_repository()
        .find_all(query.into())
        .await
        .map(ResourcesResponse::from)
        .map(Json)
}

pub async fn show_resource(
    Path(resource_id): Path<ResourceId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ResourceWithSlotsResponse>> {
    registry
        .resource_repository()
        .find_with_slots(resource_id)
        .await
        .and_then(|resource| match resource {
            Some(resource) => Ok(Json(resource.into())),
            None => Err(AppError::EntityNotFound("resource not found".into())),
        })
}

// 資源の登録は管理者のみ
pub async fn register_resource(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateResourceRequest>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    registry
        .resource_repository()
        .create(req.into())
        .await
        .map(|_| StatusCode::CREATED)
}

pub async fn update_resource_active(
    user: AuthorizedUser,
    Path(resource_id): Path<ResourceId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateResourceActiveRequest>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }

    let update = UpdateResourceActiveRequestWithId::new(resource_id, req);
    registry
        .resource_repository()
        .update_is_active(update.into())
        .await
        .map(|_| StatusCode::OK)
}
