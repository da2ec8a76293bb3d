use crate::model::availability::AvailabilitySlot;
use crate::model::id::{ResourceId, ResourceTypeId};
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub mod event;

// 観光資源の分類（博物館、ガイド付きルートなど）。マイグレーションで投入される
#[derive(Debug)]
pub struct ResourceType {
    pub type_id: ResourceTypeId,
    pub type_name: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug)]
pub struct Resource {
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

// 一覧表示用。今後の予約可能枠数を併せて返す
#[derive(Debug)]
pub struct ResourceSummary {
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

#[derive(Debug)]
pub struct ResourceWithSlots {
    pub resource: Resource,
    pub slots: Vec<AvailabilitySlot>,
}

// 一覧取得時の絞り込み条件
#[derive(Debug, Default)]
pub struct ResourceListOptions {
    pub search: Option<String>,
    pub type_id: Option<ResourceTypeId>,
    pub date: Option<NaiveDate>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
}
