use async_trait::async_trait;
use derive_new::new;
use kernel::model::availability::{event::CreateSlot, AvailabilitySlot, SlotListing};
use kernel::model::id::SlotId;
use kernel::repository::availability::AvailabilityRepository;
use shared::error::{AppError, AppResult};

use crate::database::{
    model::availability::{AvailabilitySlotRow, SlotListingRow},
    ConnectionPool,
};

#[derive(new)]
pub struct AvailabilityRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl AvailabilityRepository for AvailabilityRepositoryImpl {
    // 全資源を横断して、今後の予約可能枠を開始時刻順に取得する。
    // 枠・資源の両方が有効で、残席のあるものだけを返す
    async fn find_future_all(&self) -> AppResult<Vec<SlotListing>> {
        sqlx::query_as::<_, SlotListingRow>(
            r#"
            SELECT
                s.slot_id,
                s.resource_id,
                r.resource_name,
                t.type_name,
                r.location,
                s.start_at,
                s.end_at,
                s.seats_remaining,
                COALESCE(s.special_price, r.base_price) AS unit_price
            FROM availability_slots AS s
            INNER JOIN resources AS r ON s.resource_id = r.resource_id
            INNER JOIN resource_types AS t ON r.type_id = t.type_id
            WHERE s.start_at >= CURRENT_TIMESTAMP
              AND s.is_active
              AND r.is_active
              AND s.seats_remaining > 0
            ORDER BY s.start_at ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(SlotListing::from).collect())
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_by_id(&self, slot_id: SlotId) -> AppResult<Option<AvailabilitySlot>> {
        let row = sqlx::query_as::<_, AvailabilitySlotRow>(
            r#"
            SELECT
                slot_id,
                resource_id,
                start_at,
                end_at,
                seats_remaining,
                special_price,
                is_active
            FROM availability_slots
            WHERE slot_id = $1
            "#,
        )
        .bind(slot_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(AvailabilitySlot::from))
    }

    // 枠を新規登録する
    async fn create(&self, event: CreateSlot) -> AppResult<SlotId> {
        if event.end_at <= event.start_at {
            return Err(AppError::UnprocessableEntity(
                "slot must end after it starts".into(),
            ));
        }

        let mut tx = self.db.begin().await?;

        // 初期座席数は資源の最大収容人数を超えられない
        let max_capacity = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT max_capacity FROM resources WHERE resource_id = $1
            "#,
        )
        .bind(event.resource_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let max_capacity = match max_capacity {
            None => {
                return Err(AppError::EntityNotFound(format!(
                    "resource ({}) was not found",
                    event.resource_id
                )))
            }
            Some(c) => c,
        };

        if event.seats < 1 || event.seats > max_capacity {
            return Err(AppError::UnprocessableEntity(format!(
                "seats must be between 1 and {} for this resource",
                max_capacity
            )));
        }

        let slot_id = SlotId::new();
        let res = sqlx::query(
            r#"
            INSERT INTO availability_slots
            (slot_id, resource_id, start_at, end_at, seats_remaining, special_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(slot_id)
        .bind(event.resource_id)
        .bind(event.start_at)
        .bind(event.end_at)
        .bind(event.seats)
        .bind(event.special_price)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No availability slot record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(slot_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use kernel::model::id::ResourceId;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const RESOURCE_MUSEUM: &str = "55555555-5555-5555-5555-555555555501";

    fn resource_id(raw: &str) -> ResourceId {
        ResourceId::from(uuid::Uuid::parse_str(raw).unwrap())
    }

    #[sqlx::test(migrations = "../migrations", fixtures("common"))]
    async fn future_listing_skips_unbookable_slots(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = AvailabilityRepositoryImpl::new(ConnectionPool::new(pool));

        let listings = repo.find_future_all().await?;

        // 満席・無効・過去・無効資源の枠は現れない
        assert_eq!(listings.len(), 3);
        assert!(listings
            .windows(2)
            .all(|w| w[0].start_at <= w[1].start_at));

        // 単価は特別価格があればそちら、なければ基本価格
        let museum_price = Decimal::from_str("10.00")?;
        let special_price = Decimal::from_str("8.50")?;
        assert_eq!(listings[0].unit_price, museum_price);
        assert_eq!(listings[2].unit_price, special_price);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations", fixtures("common"))]
    async fn create_slot_respects_resource_capacity(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = AvailabilityRepositoryImpl::new(ConnectionPool::new(pool));

        let start = Utc::now() + Duration::days(30);
        let end = start + Duration::hours(2);

        // 最大収容人数（25 名）を超える枠は登録できない
        let err = repo
            .create(CreateSlot::new(
                resource_id(RESOURCE_MUSEUM),
                start,
                end,
                30,
                None,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));

        let err = repo
            .create(CreateSlot::new(
                resource_id(RESOURCE_MUSEUM),
                start,
                end,
                0,
                None,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));

        // 終了が開始より前の枠も不可
        let err = repo
            .create(CreateSlot::new(
                resource_id(RESOURCE_MUSEUM),
                end,
                start,
                10,
                None,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));

        let err = repo
            .create(CreateSlot::new(ResourceId::new(), start, end, 10, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EntityNotFound(_)));

        let slot_id = repo
            .create(CreateSlot::new(
                resource_id(RESOURCE_MUSEUM),
                start,
                end,
                25,
                Some(Decimal::from_str("4.00")?),
            ))
            .await?;

        let slot = repo.find_by_id(slot_id).await?.unwrap();
        assert_eq!(slot.seats_remaining, 25);
        assert_eq!(slot.special_price, Some(Decimal::from_str("4.00")?));
        assert!(slot.is_active);

        Ok(())
    }
}
