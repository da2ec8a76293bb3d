use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    booking::{Booking, BookingNumber, BookingSlot, BookingStatus},
    id::{BookingId, ResourceId, SlotId},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[garde(skip)]
    pub slot_id: SlotId,
    // 0 名以下の予約は受け付けない
    #[garde(range(min = 1))]
    pub party_size: i32,
    #[garde(skip)]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
    #[garde(skip)]
    pub reason: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsResponse {
    pub items: Vec<BookingResponse>,
}

impl From<Vec<Booking>> for BookingsResponse {
    fn from(value: Vec<Booking>) -> Self {
        Self {
            items: value.into_iter().map(BookingResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub booking_id: BookingId,
    pub booking_number: BookingNumber,
    pub party_size: i32,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub slot: BookingSlotResponse,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let Booking {
            booking_id,
            booking_number,
            user_id: _,
            party_size,
            total_price,
            status,
            notes,
            created_at,
            confirmed_at,
            cancelled_at,
            cancellation_reason,
            slot,
        } = value;
        Self {
            booking_id,
            booking_number,
            party_size,
            total_price,
            status,
            notes,
            created_at,
            confirmed_at,
            cancelled_at,
            cancellation_reason,
            slot: slot.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSlotResponse {
    pub slot_id: SlotId,
    pub resource_id: ResourceId,
    pub resource_name: String,
    pub type_name: String,
    pub location: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

impl From<BookingSlot> for BookingSlotResponse {
    fn from(value: BookingSlot) -> Self {
        let BookingSlot {
            slot_id,
            resource_id,
            resource_name,
            type_name,
            location,
            start_at,
            end_at,
        } = value;
        Self {
            slot_id,
            resource_id,
            resource_name,
            type_name,
            location,
            start_at,
            end_at,
        }
    }
}
