use crate::model::id::ResourceId;
use chrono::{DateTime, Utc};
use derive_new::new;
use rust_decimal::Decimal;

#[derive(new)]
pub struct CreateSlot {
    pub resource_id: ResourceId,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub seats: i32,
    pub special_price: Option<Decimal>,
}
