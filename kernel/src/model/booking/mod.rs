use crate::model::id::{BookingId, ResourceId, SlotId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::AsRefStr;

pub mod event;

#[derive(Debug)]
pub struct Booking {
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
    pub slot: BookingSlot,
}

// 予約に紐づく枠と資源の情報
#[derive(Debug)]
pub struct BookingSlot {
    pub slot_id: SlotId,
    pub resource_id: ResourceId,
    pub resource_name: String,
    pub type_name: String,
    pub location: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    // キャンセル可能なのは pending / confirmed / active のみ。
    // completed・no_show・および既に cancelled のものは対象外
    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::Active)
    }
}

// 人が読める一意な予約番号。採番後は不変
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct BookingNumber(String);

impl BookingNumber {
    // RES-YYYYMMDD-XXXXXXXX 形式で採番する。
    // 一意性は bookings.booking_number の UNIQUE 制約が最終的に保証する
    pub fn generate() -> Self {
        let date = Utc::now().format("%Y%m%d");
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("RES-{}-{}", date, &suffix[..8].to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BookingNumber {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for BookingNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_number_has_expected_shape() {
        let number = BookingNumber::generate();
        let s = number.as_str();

        assert!(s.starts_with("RES-"));
        let parts: Vec<&str> = s.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].len(), 8);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn booking_numbers_do_not_collide_casually() {
        let a = BookingNumber::generate();
        let b = BookingNumber::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn only_live_statuses_are_cancellable() {
        assert!(BookingStatus::Pending.is_cancellable());
        assert!(BookingStatus::Confirmed.is_cancellable());
        assert!(BookingStatus::Active.is_cancellable());
        assert!(!BookingStatus::Completed.is_cancellable());
        assert!(!BookingStatus::Cancelled.is_cancellable());
        assert!(!BookingStatus::NoShow.is_cancellable());
    }

    #[test]
    fn status_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::NoShow).unwrap(),
            "\"no_show\""
        );
        assert_eq!(BookingStatus::Cancelled.as_ref(), "cancelled");
    }
}
