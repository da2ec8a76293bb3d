use async_trait::async_trait;
use derive_new::new;
use kernel::model::booking::{
    event::{CancelBooking, CreateBooking},
    Booking, BookingNumber, BookingStatus,
};
use kernel::model::id::{BookingId, UserId};
use kernel::repository::booking::BookingRepository;
use rust_decimal::Decimal;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::booking::{BookingRow, BookingStateRow, SlotPricingRow},
    ConnectionPool,
};

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    // 予約操作を行う
    async fn create(&self, event: CreateBooking) -> AppResult<BookingNumber> {
        if event.party_size < 1 {
            return Err(AppError::UnprocessableEntity(
                "party size must be at least 1".into(),
            ));
        }

        let mut tx = self.db.begin().await?;

        // 事前のチェックとして、以下を調べる。
        // - 指定の枠 ID をもつ枠が存在するか
        // - 枠とその資源が有効（is_active）か
        // 単価もここで解決する（special_price があれば優先、なければ base_price）
        let pricing = sqlx::query_as::<_, SlotPricingRow>(
            r#"
            SELECT
                s.is_active AS slot_is_active,
                r.is_active AS resource_is_active,
                COALESCE(s.special_price, r.base_price) AS unit_price
            FROM availability_slots AS s
            INNER JOIN resources AS r ON s.resource_id = r.resource_id
            WHERE s.slot_id = $1
            "#,
        )
        .bind(event.slot_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let pricing = match pricing {
            None => {
                return Err(AppError::EntityNotFound(format!(
                    "availability slot ({}) was not found",
                    event.slot_id
                )))
            }
            Some(p) => p,
        };

        if !pricing.slot_is_active || !pricing.resource_is_active {
            return Err(AppError::UnprocessableEntity(format!(
                "availability slot ({}) is not open for booking",
                event.slot_id
            )));
        }

        // 残席の減算は条件付き UPDATE 一発で行う。
        // 0 行更新 = 残席不足。読み出してから書き戻す二段階の更新はしない
        let res = sqlx::query(
            r#"
            UPDATE availability_slots
            SET seats_remaining = seats_remaining - $2
            WHERE slot_id = $1 AND seats_remaining >= $2
            "#,
        )
        .bind(event.slot_id)
        .bind(event.party_size)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::CapacityExceeded(format!(
                "availability slot ({}) has fewer than {} seats remaining",
                event.slot_id, event.party_size
            )));
        }

        let total_price = pricing.unit_price * Decimal::from(event.party_size);
        let booking_id = BookingId::new();
        let booking_number = BookingNumber::generate();

        let res = sqlx::query(
            r#"
            INSERT INTO bookings
            (booking_id, booking_number, user_id, slot_id,
            party_size, total_price, status, notes, confirmed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, CURRENT_TIMESTAMP)
            "#,
        )
        .bind(booking_id)
        .bind(&booking_number)
        .bind(event.user_id)
        .bind(event.slot_id)
        .bind(event.party_size)
        .bind(total_price)
        .bind(BookingStatus::Confirmed)
        .bind(&event.notes)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No booking record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(booking_number)
    }

    // 予約キャンセル操作を行う
    async fn cancel(&self, event: CancelBooking) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // 行ロックを取ってから所有者と状態を確認する。
        // 同じ予約への二重キャンセルはここで弾かれる
        let state = sqlx::query_as::<_, BookingStateRow>(
            r#"
            SELECT booking_id, user_id, slot_id, party_size, status
            FROM bookings
            WHERE booking_number = $1
            FOR UPDATE
            "#,
        )
        .bind(&event.booking_number)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let state = match state {
            None => {
                return Err(AppError::EntityNotFound(format!(
                    "booking ({}) was not found",
                    event.booking_number
                )))
            }
            Some(s) => s,
        };

        if state.user_id != event.requested_user {
            return Err(AppError::ForbiddenOperation);
        }

        if !state.status.is_cancellable() {
            return Err(AppError::UnprocessableEntity(format!(
                "booking ({}) can no longer be cancelled (status: {})",
                event.booking_number,
                state.status.as_ref()
            )));
        }

        let reason = event
            .reason
            .unwrap_or_else(|| "Cancelled by the user".into());

        let res = sqlx::query(
            r#"
            UPDATE bookings
            SET status = 'cancelled',
                cancelled_at = CURRENT_TIMESTAMP,
                cancellation_reason = $2
            WHERE booking_id = $1
            "#,
        )
        .bind(state.booking_id)
        .bind(reason)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No booking record has been cancelled".into(),
            ));
        }

        // 減算した分だけ残席を戻す
        let res = sqlx::query(
            r#"
            UPDATE availability_slots
            SET seats_remaining = seats_remaining + $2
            WHERE slot_id = $1
            "#,
        )
        .bind(state.slot_id)
        .bind(state.party_size)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No seats have been restored".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }

    async fn find_by_number(
        &self,
        booking_number: &BookingNumber,
        user_id: UserId,
    ) -> AppResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT
                b.booking_id,
                b.booking_number,
                b.user_id,
                b.party_size,
                b.total_price,
                b.status,
                b.notes,
                b.created_at,
                b.confirmed_at,
                b.cancelled_at,
                b.cancellation_reason,
                s.slot_id,
                s.resource_id,
                r.resource_name,
                t.type_name,
                r.location,
                s.start_at,
                s.end_at
            FROM bookings AS b
            INNER JOIN availability_slots AS s ON b.slot_id = s.slot_id
            INNER JOIN resources AS r ON s.resource_id = r.resource_id
            INNER JOIN resource_types AS t ON r.type_id = t.type_id
            WHERE b.booking_number = $1 AND b.user_id = $2
            "#,
        )
        .bind(booking_number)
        .bind(user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Booking::from))
    }

    async fn find_all_by_user(&self, user_id: UserId) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT
                b.booking_id,
                b.booking_number,
                b.user_id,
                b.party_size,
                b.total_price,
                b.status,
                b.notes,
                b.created_at,
                b.confirmed_at,
                b.cancelled_at,
                b.cancellation_reason,
                s.slot_id,
                s.resource_id,
                r.resource_name,
                t.type_name,
                r.location,
                s.start_at,
                s.end_at
            FROM bookings AS b
            INNER JOIN availability_slots AS s ON b.slot_id = s.slot_id
            INNER JOIN resources AS r ON s.resource_id = r.resource_id
            INNER JOIN resource_types AS t ON r.type_id = t.type_id
            WHERE b.user_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(Booking::from).collect())
        .map_err(AppError::SpecificOperationError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::id::SlotId;
    use std::str::FromStr;
    use std::sync::Arc;

    // fixtures/common.sql の固定 ID
    const USER_ALBA: &str = "11111111-1111-1111-1111-111111111111";
    const USER_BRUNO: &str = "22222222-2222-2222-2222-222222222222";
    const SLOT_MUSEUM: &str = "77777777-7777-7777-7777-777777777701";
    const SLOT_SPECIAL_PRICE: &str = "77777777-7777-7777-7777-777777777702";
    const SLOT_INACTIVE: &str = "77777777-7777-7777-7777-777777777704";
    const SLOT_ON_CLOSED_RESOURCE: &str = "77777777-7777-7777-7777-777777777706";

    fn slot_id(raw: &str) -> SlotId {
        SlotId::from(uuid::Uuid::parse_str(raw).unwrap())
    }

    fn user_id(raw: &str) -> UserId {
        UserId::from(uuid::Uuid::parse_str(raw).unwrap())
    }

    async fn seats_remaining(pool: &sqlx::PgPool, slot: SlotId) -> i32 {
        sqlx::query_scalar::<_, i32>(
            "SELECT seats_remaining FROM availability_slots WHERE slot_id = $1",
        )
        .bind(slot)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "../migrations", fixtures("common"))]
    async fn create_booking_decrements_seats_and_prices_the_party(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        // 残席 5・基本価格 10.00 の枠に 3 名で予約する
        let number = repo
            .create(CreateBooking::new(
                slot_id(SLOT_MUSEUM),
                user_id(USER_ALBA),
                3,
                Some("window seats please".into()),
            ))
            .await?;

        let booking = repo
            .find_by_number(&number, user_id(USER_ALBA))
            .await?
            .unwrap();
        assert_eq!(booking.party_size, 3);
        assert_eq!(booking.total_price, Decimal::from_str("30.00")?);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert!(booking.confirmed_at.is_some());
        assert_eq!(booking.slot.resource_name, "Museo Etnográfico de Siero");

        assert_eq!(seats_remaining(&pool, slot_id(SLOT_MUSEUM)).await, 2);

        // 残り 2 席なので 3 名は弾かれる
        let err = repo
            .create(CreateBooking::new(
                slot_id(SLOT_MUSEUM),
                user_id(USER_BRUNO),
                3,
                None,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CapacityExceeded(_)));
        assert_eq!(seats_remaining(&pool, slot_id(SLOT_MUSEUM)).await, 2);

        // ちょうど 2 名なら通り、残席は 0 になる
        repo.create(CreateBooking::new(
            slot_id(SLOT_MUSEUM),
            user_id(USER_BRUNO),
            2,
            None,
        ))
        .await?;
        assert_eq!(seats_remaining(&pool, slot_id(SLOT_MUSEUM)).await, 0);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations", fixtures("common"))]
    async fn special_price_overrides_base_price(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        let number = repo
            .create(CreateBooking::new(
                slot_id(SLOT_SPECIAL_PRICE),
                user_id(USER_ALBA),
                2,
                None,
            ))
            .await?;

        let booking = repo
            .find_by_number(&number, user_id(USER_ALBA))
            .await?
            .unwrap();
        // special_price 8.50 * 2
        assert_eq!(booking.total_price, Decimal::from_str("17.00")?);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations", fixtures("common"))]
    async fn create_booking_rejects_unknown_and_inactive_slots(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        let err = repo
            .create(CreateBooking::new(
                SlotId::new(),
                user_id(USER_ALBA),
                1,
                None,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EntityNotFound(_)));

        let err = repo
            .create(CreateBooking::new(
                slot_id(SLOT_INACTIVE),
                user_id(USER_ALBA),
                1,
                None,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
        assert_eq!(seats_remaining(&pool, slot_id(SLOT_INACTIVE)).await, 5);

        // 資源そのものが無効な場合も弾く
        let err = repo
            .create(CreateBooking::new(
                slot_id(SLOT_ON_CLOSED_RESOURCE),
                user_id(USER_ALBA),
                1,
                None,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));

        let err = repo
            .create(CreateBooking::new(
                slot_id(SLOT_MUSEUM),
                user_id(USER_ALBA),
                0,
                None,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations", fixtures("common"))]
    async fn cancel_restores_seats_exactly_once(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        let number = repo
            .create(CreateBooking::new(
                slot_id(SLOT_MUSEUM),
                user_id(USER_ALBA),
                3,
                None,
            ))
            .await?;
        assert_eq!(seats_remaining(&pool, slot_id(SLOT_MUSEUM)).await, 2);

        repo.cancel(CancelBooking::new(
            number.clone(),
            user_id(USER_ALBA),
            Some("change of plans".into()),
        ))
        .await?;

        // 予約前の残席に戻る
        assert_eq!(seats_remaining(&pool, slot_id(SLOT_MUSEUM)).await, 5);

        let booking = repo
            .find_by_number(&number, user_id(USER_ALBA))
            .await?
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Cancelled);
        assert_eq!(booking.cancellation_reason.as_deref(), Some("change of plans"));
        assert!(booking.cancelled_at.is_some());

        // 二重キャンセルは二度目が拒否され、残席は増えない
        let err = repo
            .cancel(CancelBooking::new(number, user_id(USER_ALBA), None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
        assert_eq!(seats_remaining(&pool, slot_id(SLOT_MUSEUM)).await, 5);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations", fixtures("common"))]
    async fn cancel_rejects_non_owner_and_unknown_number(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        let number = repo
            .create(CreateBooking::new(
                slot_id(SLOT_MUSEUM),
                user_id(USER_ALBA),
                2,
                None,
            ))
            .await?;

        let err = repo
            .cancel(CancelBooking::new(number.clone(), user_id(USER_BRUNO), None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ForbiddenOperation));
        assert_eq!(seats_remaining(&pool, slot_id(SLOT_MUSEUM)).await, 3);

        let err = repo
            .cancel(CancelBooking::new(
                BookingNumber::from("RES-20000101-DEADBEEF".to_string()),
                user_id(USER_ALBA),
                None,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EntityNotFound(_)));

        // 所有者でないユーザーからは予約詳細も見えない
        let hidden = repo.find_by_number(&number, user_id(USER_BRUNO)).await?;
        assert!(hidden.is_none());

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations", fixtures("common"))]
    async fn concurrent_bookings_never_oversell(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = Arc::new(BookingRepositoryImpl::new(ConnectionPool::new(pool.clone())));

        // 残席 5 の枠へ同時に 8 件、各 1 名で予約をかける
        let mut handles = Vec::new();
        for _ in 0..8 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.create(CreateBooking::new(
                    slot_id(SLOT_MUSEUM),
                    user_id(USER_BRUNO),
                    1,
                    None,
                ))
                .await
            }));
        }

        let mut succeeded = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await? {
                Ok(_) => succeeded += 1,
                Err(AppError::CapacityExceeded(_)) => rejected += 1,
                Err(e) => panic!("unexpected error: {e:?}"),
            }
        }

        assert_eq!(succeeded, 5);
        assert_eq!(rejected, 3);
        assert_eq!(seats_remaining(&pool, slot_id(SLOT_MUSEUM)).await, 0);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations", fixtures("common"))]
    async fn failed_insert_rolls_back_seat_decrement(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        // 残席の減算後、予約行の INSERT を強制的に失敗させる
        sqlx::query(
            "CREATE OR REPLACE FUNCTION reject_all_bookings() RETURNS TRIGGER AS '
                BEGIN
                    RAISE EXCEPTION ''booking insert rejected'';
                END;
            ' LANGUAGE 'plpgsql'",
        )
        .execute(&pool)
        .await?;
        sqlx::query(
            "CREATE TRIGGER reject_bookings_trigger
                BEFORE INSERT ON bookings FOR EACH ROW
                EXECUTE PROCEDURE reject_all_bookings()",
        )
        .execute(&pool)
        .await?;

        let err = repo
            .create(CreateBooking::new(
                slot_id(SLOT_MUSEUM),
                user_id(USER_ALBA),
                3,
                None,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SpecificOperationError(_)));

        // 途中で失敗した予約は痕跡を残さない。残席も予約前のまま
        assert_eq!(seats_remaining(&pool, slot_id(SLOT_MUSEUM)).await, 5);
        let bookings = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings")
            .fetch_one(&pool)
            .await?;
        assert_eq!(bookings, 0);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations", fixtures("common"))]
    async fn bookings_are_listed_newest_first(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = BookingRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        let first = repo
            .create(CreateBooking::new(
                slot_id(SLOT_MUSEUM),
                user_id(USER_ALBA),
                1,
                None,
            ))
            .await?;
        let second = repo
            .create(CreateBooking::new(
                slot_id(SLOT_SPECIAL_PRICE),
                user_id(USER_ALBA),
                1,
                None,
            ))
            .await?;
        // 他ユーザーの予約は混ざらない
        repo.create(CreateBooking::new(
            slot_id(SLOT_MUSEUM),
            user_id(USER_BRUNO),
            1,
            None,
        ))
        .await?;

        let bookings = repo.find_all_by_user(user_id(USER_ALBA)).await?;
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].booking_number, second);
        assert_eq!(bookings[1].booking_number, first);

        Ok(())
    }
}
