use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::{
    availability::{event::CreateSlot, AvailabilitySlot, SlotListing},
    id::{ResourceId, SlotId},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::resource::non_negative_price;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlotResponse {
    pub slot_id: SlotId,
    pub resource_id: ResourceId,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub seats_remaining: i32,
    pub special_price: Option<Decimal>,
    pub is_active: bool,
}

impl From<AvailabilitySlot> for AvailabilitySlotResponse {
    fn from(value: AvailabilitySlot) -> Self {
        let AvailabilitySlot {
            slot_id,
            resource_id,
            start_at,
            end_at,
            seats_remaining,
            special_price,
            is_active,
        } = value;
        Self {
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

// 全資源横断の空き枠一覧。単価は特別価格を解決済み
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotListingsResponse {
    pub items: Vec<SlotListingResponse>,
}

impl From<Vec<SlotListing>> for SlotListingsResponse {
    fn from(value: Vec<SlotListing>) -> Self {
        Self {
            items: value.into_iter().map(SlotListingResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotListingResponse {
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

impl From<SlotListing> for SlotListingResponse {
    fn from(value: SlotListing) -> Self {
        let SlotListing {
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
        Self {
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

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlotRequest {
    #[garde(skip)]
    pub start_at: DateTime<Utc>,
    #[garde(skip)]
    pub end_at: DateTime<Utc>,
    #[garde(range(min = 1))]
    pub seats: i32,
    #[garde(inner(custom(non_negative_price)))]
    pub special_price: Option<Decimal>,
}

#[derive(new)]
pub struct CreateSlotRequestWithResourceId(ResourceId, CreateSlotRequest);

impl From<CreateSlotRequestWithResourceId> for CreateSlot {
    fn from(value: CreateSlotRequestWithResourceId) -> Self {
        let CreateSlotRequestWithResourceId(
            resource_id,
            CreateSlotRequest {
                start_at,
                end_at,
                seats,
                special_price,
            },
        ) = value;
        Self {
            resource_id,
            start_at,
            end_at,
            seats,
            special_price,
        }
    }
}
