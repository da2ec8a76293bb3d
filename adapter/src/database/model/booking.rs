use chrono::{DateTime, Utc};
use kernel::model::{
    booking::{Booking, BookingNumber, BookingSlot, BookingStatus},
    id::{BookingId, ResourceId, SlotId, UserId},
};
use rust_decimal::Decimal;

// 予約一覧・詳細の取得に使う型。枠と資源を JOIN した形で受ける
#[derive(sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub booking_number: BookingNumber,
    pub user_id: UserId,
    pub party_size: i32,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub slot_id: SlotId,
    pub resource_id: ResourceId,
    pub resource_name: String,
    pub type_name: String,
    pub location: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(value: BookingRow) -> Self {
        let BookingRow {
            booking_id,
            booking_number,
            user_id,
            party_size,
            total_price,
            status,
            notes,
            created_at,
            confirmed_at,
            cancelled_at,
            cancellation_reason,
            slot_id,
            resource_id,
            resource_name,
            type_name,
            location,
            start_at,
            end_at,
        } = value;
        Booking {
            booking_id,
            booking_number,
            user_id,
            party_size,
            total_price,
            status,
            notes,
            created_at,
            confirmed_at,
            cancelled_at,
            cancellation_reason,
            slot: BookingSlot {
                slot_id,
                resource_id,
                resource_name,
                type_name,
                location,
                start_at,
                end_at,
            },
        }
    }
}

// キャンセル可否の判定に使う最小限の行
#[derive(sqlx::FromRow)]
pub struct BookingStateRow {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub slot_id: SlotId,
    pub party_size: i32,
    pub status: BookingStatus,
}

// 予約作成時の事前チェックに使う行。
// unit_price は COALESCE(special_price, base_price) を解決済み
#[derive(sqlx::FromRow)]
pub struct SlotPricingRow {
    pub slot_is_active: bool,
    pub resource_is_active: bool,
    pub unit_price: Decimal,
}
