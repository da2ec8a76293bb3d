use crate::model::booking::BookingNumber;
use crate::model::id::{SlotId, UserId};
use derive_new::new;

#[derive(new)]
pub struct CreateBooking {
    pub slot_id: SlotId,
    pub user_id: UserId,
    pub party_size: i32,
    pub notes: Option<String>,
}

#[derive(new)]
pub struct CancelBooking {
    pub booking_number: BookingNumber,
    pub requested_user: UserId,
    pub reason: Option<String>,
}
