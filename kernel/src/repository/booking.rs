use crate::model::{
    booking::{
        event::{CancelBooking, CreateBooking},
        Booking, BookingNumber,
    },
    id::UserId,
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    // 予約を作成する。枠の残席の減算と予約行の挿入は単一トランザクションで行う
    async fn create(&self, event: CreateBooking) -> AppResult<BookingNumber>;
    // 予約をキャンセルし、枠の残席を戻す
    async fn cancel(&self, event: CancelBooking) -> AppResult<()>;
    // 予約番号から予約を取得する（所有者のみ）
    async fn find_by_number(
        &self,
        booking_number: &BookingNumber,
        user_id: UserId,
    ) -> AppResult<Option<Booking>>;
    // ユーザーの予約一覧を新しい順に取得する
    async fn find_all_by_user(&self, user_id: UserId) -> AppResult<Vec<Booking>>;
}
