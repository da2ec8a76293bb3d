use crate::model::id::{ResourceId, SlotId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub mod event;

// 予約可能枠。plazas（残席数）はこの型の外からは減算しない
#[derive(Debug)]
pub struct AvailabilitySlot {
    pub slot_id: SlotId,
    pub resource_id: ResourceId,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub seats_remaining: i32,
    pub special_price: Option<Decimal>,
    pub is_active: bool,
}

// 全資源横断の「今後の予約可能枠」一覧に使う型。
// 単価は special_price があればそれ、なければ資源の base_price
#[derive(Debug)]
pub struct SlotListing {
    pub slot_id: SlotId,
    pub resource_id: ResourceId,
    pub resource_name: String,
    pub type_name: String,
    pub location: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub seats_remaining: i32,
    pub unit_price: Decimal,
}
