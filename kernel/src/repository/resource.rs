use crate::model::{
    id::ResourceId,
    resource::{
        event::{CreateResource, UpdateResourceActive},
        ResourceListOptions, ResourceSummary, ResourceType, ResourceWithSlots,
    },
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn find_types(&self) -> AppResult<Vec<ResourceType>>;
    // 有効な資源の一覧を、絞り込み条件つきで取得する
    async fn find_all(&self, options: ResourceListOptions) -> AppResult<Vec<ResourceSummary>>;
    // 資源とその今後の予約可能枠を取得する
    async fn find_with_slots(&self, resource_id: ResourceId)
        -> AppResult<Option<ResourceWithSlots>>;
    async fn create(&self, event: CreateResource) -> AppResult<ResourceId>;
    async fn update_is_active(&self, event: UpdateResourceActive) -> AppResult<()>;
}
