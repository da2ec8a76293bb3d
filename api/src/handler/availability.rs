use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use garde::Validate;
use kernel::model::id::ResourceId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::availability::{
        CreateSlotRequest, CreateSlotRequestWithResourceId, SlotListingsResponse,
    },
};

// 全資源横断の「今後の予約可能枠」一覧
pub async fn show_availability_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<SlotListingsResponse>> {
    registry
        .availability_repository()
        .find_future_all()
        .await
        .map(SlotListingsResponse::from)
        .map(Json)
}

// 枠の登録は管理者のみ
pub async fn register_slot(
    user: AuthorizedUser,
    Path(resource_id): Path<ResourceId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateSlotRequest>,
) -> AppResult<StatusCode> {
    if !user.is_admin() {
        return Err(AppError::ForbiddenOperation);
    }
    req.validate(&())?;

    let create_slot = CreateSlotRequestWithResourceId::new(resource_id, req);
    registry
        .availability_repository()
        .create(create_slot.into())
        .await
        .map(|_| StatusCode::CREATED)
}
