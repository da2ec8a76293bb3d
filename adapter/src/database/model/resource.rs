use kernel::model::{
    id::{ResourceId, ResourceTypeId},
    resource::{Resource, ResourceSummary, ResourceType},
};
use rust_decimal::Decimal;

#[derive(sqlx::FromRow)]
pub struct ResourceTypeRow {
    pub type_id: ResourceTypeId,
    pub type_name: String,
    pub description: String,
    pub icon: String,
}

impl From<ResourceTypeRow> for ResourceType {
    fn from(value: ResourceTypeRow) -> Self {
        let ResourceTypeRow {
            type_id,
            type_name,
            description,
            icon,
        } = value;
        ResourceType {
            type_id,
            type_name,
            description,
            icon,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct ResourceRow {
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

impl From<ResourceRow> for Resource {
    fn from(value: ResourceRow) -> Self {
        let ResourceRow {
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
        Resource {
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

// 一覧用。今後の予約可能枠数（future_slots）を集計して持つ
#[derive(sqlx::FromRow)]
pub struct ResourceSummaryRow {
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

impl From<ResourceSummaryRow> for ResourceSummary {
    fn from(value: ResourceSummaryRow) -> Self {
        let ResourceSummaryRow {
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
        ResourceSummary {
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
