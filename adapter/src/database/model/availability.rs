use chrono::{DateTime, Utc};
use kernel::model::{
    availability::{AvailabilitySlot, SlotListing},
    id::{ResourceId, SlotId},
};
use rust_decimal::Decimal;

#[derive(sqlx::FromRow)]
pub struct AvailabilitySlotRow {
    pub slot_id: SlotId,
    pub resource_id: ResourceId,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub seats_remaining: i32,
    pub special_price: Option<Decimal>,
    pub is_active: bool,
}

impl From<AvailabilitySlotRow> for AvailabilitySlot {
    fn from(value: AvailabilitySlotRow) -> Self {
        let AvailabilitySlotRow {
            slot_id,
            resource_id,
            start_at,
            end_at,
            seats_remaining,
            special_price,
            is_active,
        } = value;
        AvailabilitySlot {
            slot_id,
            resource_id,
            start_at,
            end_at,
            seats_remaining,
            special_price,
            is_active,
        }
    }
}

// 今後の予約可能枠の横断一覧に使う型。
// unit_price は SQL 側で COALESCE(special_price, base_price) を解決済み
#[derive(sqlx::FromRow)]
pub struct SlotListingRow {
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

impl From<SlotListingRow> for SlotListing {
    fn from(value: SlotListingRow) -> Self {
        let SlotListingRow {
            slot_id,
            resource_id,
            resource_name,
            type_name,
            location,
            start_at,
            end_at,
            seats_remaining,
            unit_price,
        } = value;
        SlotListing {
            slot_id,
            resource_id,
            resource_name,
            type_name,
            location,
            start_at,
            end_at,
            seats_remaining,
            unit_price,
        }
    }
}
