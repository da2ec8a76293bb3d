use crate::model::id::{ResourceId, ResourceTypeId};
use rust_decimal::Decimal;

pub struct CreateResource {
    pub type_id: ResourceTypeId,
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

#[derive(Debug)]
pub struct UpdateResourceActive {
    pub resource_id: ResourceId,
    pub is_active: bool,
}
