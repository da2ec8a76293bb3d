use chrono::NaiveDate;
use derive_new::new;
use garde::Validate;
use kernel::model::{
    id::{ResourceId, ResourceTypeId},
    resource::{
        event::{CreateResource, UpdateResourceActive},
        Resource, ResourceListOptions, ResourceSummary, ResourceType, ResourceWithSlots,
    },
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::availability::AvailabilitySlotResponse;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypesResponse {
    pub items: Vec<ResourceTypeResponse>,
}

impl From<Vec<ResourceType>> for ResourceTypesResponse {
    fn from(value: Vec<ResourceType>) -> Self {
        Self {
            items: value.into_iter().map(ResourceTypeResponse::from).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypeResponse {
    pub type_id: ResourceTypeId,
    pub type_name: String,
    pub description: String,
    pub icon: String,
}

impl From<ResourceType> for ResourceTypeResponse {
    fn from(value: ResourceType) -> Self {
        let ResourceType {
            type_id,
            type_name,
            description,
            icon,
        } = value;
        Self {
            type_id,
            type_name,
            description,
            icon,
        }
    }
}

// 一覧の絞り込み条件。すべて任意
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResourceListQuery {
    #[garde(skip)]
    pub search: Option<String>,
    #[garde(skip)]
    pub type_id: Option<ResourceTypeId>,
    #[garde(skip)]
    pub date: Option<NaiveDate>,
    #[garde(skip)]
    pub price_min: Option<Decimal>,
    #[garde(skip)]
    pub price_max: Option<Decimal>,
}

impl From<ResourceListQuery> for ResourceListOptions {
    fn from(value: ResourceListQuery) -> Self {
        let ResourceListQuery {
            search,
            type_id,
            date,
            price_min,
            price_max,
        } = value;
        Self {
            search,
            type_id,
            date,
            price_min,
            price_max,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesResponse {
    pub items: Vec<ResourceSummaryResponse>,
}

impl From<Vec<ResourceSummary>> for ResourcesResponse {
    fn from(value: Vec<ResourceSummary>) -> Self {
        Self {
            items: value
                .into_iter()
                .map(ResourceSummaryResponse::from)
                .collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSummaryResponse {
    pub resource_id: ResourceId,
    pub type_id: ResourceTypeId,
    pub type_name: String,
    pub resource_name: String,
    pub description: String,
    pub location: String,
    pub max_capacity: i32,
    pub base_price: Decimal,
    pub duration_minutes: i32,
    pub future_slots: i64,
}

impl From<ResourceSummary> for ResourceSummaryResponse {
    fn from(value: ResourceSummary) -> Self {
        let ResourceSummary {
            resource_id,
            type_id,
            type_name,
            resource_name,
            description,
            location,
            max_capacity,
            base_price,
            duration_minutes,
            future_slots,
        } = value;
        Self {
            resource_id,
            type_id,
            type_name,
            resource_name,
            description,
            location,
            max_capacity,
            base_price,
            duration_minutes,
            future_slots,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    pub resource_id: ResourceId,
    pub type_id: ResourceTypeId,
    pub type_name: String,
    pub resource_name: String,
    pub description: String,
    pub location: String,
    pub max_capacity: i32,
    pub base_price: Decimal,
    pub duration_minutes: i32,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub is_active: bool,
}

impl From<Resource> for ResourceResponse {
    fn from(value: Resource) -> Self {
        let Resource {
            resource_id,
            type_id,
            type_name,
            resource_name,
            description,
            location,
            max_capacity,
            base_price,
            duration_minutes,
            contact_phone,
            contact_email,
            is_active,
        } = value;
        Self {
            resource_id,
            type_id,
            type_name,
            resource_name,
            description,
            location,
            max_capacity,
            base_price,
            duration_minutes,
            contact_phone,
            contact_email,
            is_active,
        }
    }
}

// 資源詳細。予約可能な今後の枠を添える
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceWithSlotsResponse {
    pub resource: ResourceResponse,
    pub slots: Vec<AvailabilitySlotResponse>,
}

impl From<ResourceWithSlots> for ResourceWithSlotsResponse {
    fn from(value: ResourceWithSlots) -> Self {
        let ResourceWithSlots { resource, slots } = value;
        Self {
            resource: resource.into(),
            slots: slots.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateResourceRequest {
    #[garde(skip)]
    pub type_id: ResourceTypeId,
    #[garde(length(min = 1))]
    pub resource_name: String,
    #[garde(skip)]
    pub description: String,
    #[garde(length(min = 1))]
    pub location: String,
    #[garde(range(min = 1))]
    pub max_capacity: i32,
    #[garde(custom(non_negative_price))]
    pub base_price: Decimal,
    #[garde(range(min = 1))]
    pub duration_minutes: i32,
    #[garde(skip)]
    pub contact_phone: Option<String>,
    #[garde(skip)]
    pub contact_email: Option<String>,
    #[garde(skip)]
    pub is_active: bool,
}

impl From<CreateResourceRequest> for CreateResource {
    fn from(value: CreateResourceRequest) -> Self {
        let CreateResourceRequest {
            type_id,
            resource_name,
            description,
            location,
            max_capacity,
            base_price,
            duration_minutes,
            contact_phone,
            contact_email,
            is_active,
        } = value;
        Self {
            type_id,
            resource_name,
            description,
            location,
            max_capacity,
            base_price,
            duration_minutes,
            contact_phone,
            contact_email,
            is_active,
        }
    }
}

pub(crate) fn non_negative_price(value: &Decimal, _context: &()) -> garde::Result {
    if value.is_sign_negative() {
        return Err(garde::Error::new("price must not be negative"));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResourceActiveRequest {
    pub is_active: bool,
}

#[derive(new)]
pub struct UpdateResourceActiveRequestWithId(ResourceId, UpdateResourceActiveRequest);

impl From<UpdateResourceActiveRequestWithId> for UpdateResourceActive {
    fn from(value: UpdateResourceActiveRequestWithId) -> Self {
        let UpdateResourceActiveRequestWithId(
            resource_id,
            UpdateResourceActiveRequest { is_active },
        ) = value;
        Self {
            resource_id,
            is_active,
        }
    }
}
