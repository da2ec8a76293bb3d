use crate::model::{
    availability::{event::CreateSlot, AvailabilitySlot, SlotListing},
    id::SlotId,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    // 全資源横断で、今後の予約可能枠（有効・残席あり）を取得する
    async fn find_future_all(&self) -> AppResult<Vec<SlotListing>>;
    async fn find_by_id(&self, slot_id: SlotId) -> AppResult<Option<AvailabilitySlot>>;
    // 枠を新規登録する。座席数は資源の最大収容人数を超えられない
    async fn create(&self, event: CreateSlot) -> AppResult<SlotId>;
}
