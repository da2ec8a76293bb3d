use async_trait::async_trait;
use derive_new::new;
use kernel::model::id::ResourceId;
use kernel::model::resource::{
    event::{CreateResource, UpdateResourceActive},
    ResourceListOptions, ResourceSummary, ResourceType, ResourceWithSlots,
};
use kernel::repository::resource::ResourceRepository;
use shared::error::{AppError, AppResult};
use sqlx::QueryBuilder;

use crate::database::{
    model::{
        availability::AvailabilitySlotRow,
        resource::{ResourceRow, ResourceSummaryRow, ResourceTypeRow},
    },
    ConnectionPool,
};

#[derive(new)]
pub struct ResourceRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ResourceRepository for ResourceRepositoryImpl {
    async fn find_types(&self) -> AppResult<Vec<ResourceType>> {
        sqlx::query_as::<_, ResourceTypeRow>(
            r#"
            SELECT type_id, type_name, description, icon
            FROM resource_types
            WHERE is_active = TRUE
            ORDER BY type_name ASC
            "#,
        )
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(ResourceType::from).collect())
        .map_err(AppError::SpecificOperationError)
    }

    // 有効な資源の一覧を取得する。
    // 絞り込み条件は任意なので、WHERE 句は QueryBuilder で組み立てる。
    // 並び順は「今後の予約可能枠が多い順、次いで名前順」
    async fn find_all(&self, options: ResourceListOptions) -> AppResult<Vec<ResourceSummary>> {
        let mut builder = QueryBuilder::new(
            r#"
            SELECT
                r.resource_id,
                r.type_id,
                t.type_name,
                r.resource_name,
                r.description,
                r.location,
                r.max_capacity,
                r.base_price,
                r.duration_minutes,
                (
                    SELECT COUNT(*)
                    FROM availability_slots AS s
                    WHERE s.resource_id = r.resource_id
                      AND s.start_at >= CURRENT_TIMESTAMP
                      AND s.is_active
                      AND s.seats_remaining > 0
                ) AS future_slots
            FROM resources AS r
            INNER JOIN resource_types AS t ON r.type_id = t.type_id
            WHERE r.is_active = TRUE
            "#,
        );

        if let Some(search) = &options.search {
            let pattern = format!("%{}%", search);
            builder
                .push(" AND (r.resource_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR r.description ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR r.location ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(type_id) = options.type_id {
            builder.push(" AND r.type_id = ").push_bind(type_id);
        }
        if let Some(price_min) = options.price_min {
            builder.push(" AND r.base_price >= ").push_bind(price_min);
        }
        if let Some(price_max) = options.price_max {
            builder.push(" AND r.base_price <= ").push_bind(price_max);
        }
        if let Some(date) = options.date {
            builder
                .push(
                    " AND EXISTS ( \
                     SELECT 1 FROM availability_slots AS s2 \
                     WHERE s2.resource_id = r.resource_id \
                       AND s2.start_at::date = ",
                )
                .push_bind(date)
                .push(" AND s2.is_active AND s2.seats_remaining > 0)");
        }

        builder.push(" ORDER BY future_slots DESC, r.resource_name ASC");

        let rows: Vec<ResourceSummaryRow> = builder
            .build_query_as()
            .fetch_all(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(ResourceSummary::from).collect())
    }

    async fn find_with_slots(
        &self,
        resource_id: ResourceId,
    ) -> AppResult<Option<ResourceWithSlots>> {
        let row = sqlx::query_as::<_, ResourceRow>(
            r#"
            SELECT
                r.resource_id,
                r.type_id,
                t.type_name,
                r.resource_name,
                r.description,
                r.location,
                r.max_capacity,
                r.base_price,
                r.duration_minutes,
                r.contact_phone,
                r.contact_email,
                r.is_active
            FROM resources AS r
            INNER JOIN resource_types AS t ON r.type_id = t.type_id
            WHERE r.resource_id = $1
            "#,
        )
        .bind(resource_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            return Ok(None);
        };

        // 今後の、予約を受け付けられる枠だけを添える
        let slots = sqlx::query_as::<_, AvailabilitySlotRow>(
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
            WHERE resource_id = $1
              AND start_at >= CURRENT_TIMESTAMP
              AND is_active
              AND seats_remaining > 0
            ORDER BY start_at ASC
            "#,
        )
        .bind(resource_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(Some(ResourceWithSlots {
            resource: row.into(),
            slots: slots.into_iter().map(Into::into).collect(),
        }))
    }

    async fn create(&self, event: CreateResource) -> AppResult<ResourceId> {
        let resource_id = ResourceId::new();
        let res = sqlx::query(
            r#"
            INSERT INTO resources
            (resource_id, type_id, resource_name, description, location,
            max_capacity, base_price, duration_minutes,
            contact_phone, contact_email, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(resource_id)
        .bind(event.type_id)
        .bind(event.resource_name)
        .bind(event.description)
        .bind(event.location)
        .bind(event.max_capacity)
        .bind(event.base_price)
        .bind(event.duration_minutes)
        .bind(event.contact_phone)
        .bind(event.contact_email)
        .bind(event.is_active)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No resource record has been created".into(),
            ));
        }

        Ok(resource_id)
    }

    async fn update_is_active(&self, event: UpdateResourceActive) -> AppResult<()> {
        let res = sqlx::query(
            r#"
            UPDATE resources
            SET is_active = $2
            WHERE resource_id = $1
            "#,
        )
        .bind(event.resource_id)
        .bind(event.is_active)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "resource ({}) was not found",
                event.resource_id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, Utc};
    use kernel::model::id::ResourceTypeId;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const RESOURCE_MUSEUM: &str = "55555555-5555-5555-5555-555555555501";

    fn resource_id(raw: &str) -> ResourceId {
        ResourceId::from(uuid::Uuid::parse_str(raw).unwrap())
    }

    #[sqlx::test(migrations = "../migrations", fixtures("common"))]
    async fn list_shows_active_resources_by_availability(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = ResourceRepositoryImpl::new(ConnectionPool::new(pool));

        let resources = repo.find_all(ResourceListOptions::default()).await?;

        // 無効化された資源は出ない
        assert_eq!(resources.len(), 2);
        // 今後の予約可能枠が多い順（museo: 2 枠、ruta: 1 枠）
        assert_eq!(resources[0].resource_name, "Museo Etnográfico de Siero");
        assert_eq!(resources[0].future_slots, 2);
        assert_eq!(resources[1].resource_name, "Ruta Sierra del Sueve");
        assert_eq!(resources[1].future_slots, 1);

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations", fixtures("common"))]
    async fn list_filters_compose(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = ResourceRepositoryImpl::new(ConnectionPool::new(pool.clone()));

        // フリーテキスト検索（名前・説明・所在地を横断、大文字小文字は無視）
        let found = repo
            .find_all(ResourceListOptions {
                search: Some("sueve".into()),
                ..Default::default()
            })
            .await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].resource_name, "Ruta Sierra del Sueve");

        // 価格帯
        let found = repo
            .find_all(ResourceListOptions {
                price_max: Some(Decimal::from_str("15.00")?),
                ..Default::default()
            })
            .await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].resource_name, "Museo Etnográfico de Siero");

        // 種別
        let type_id = sqlx::query_scalar::<_, ResourceTypeId>(
            "SELECT type_id FROM resource_types WHERE type_name = 'Ruta Guiada'",
        )
        .fetch_one(&pool)
        .await?;
        let found = repo
            .find_all(ResourceListOptions {
                type_id: Some(type_id),
                ..Default::default()
            })
            .await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].resource_name, "Ruta Sierra del Sueve");

        // 指定日に空き枠がある資源のみ
        let date = Utc::now()
            .date_naive()
            .checked_add_days(Days::new(14))
            .unwrap();
        let found = repo
            .find_all(ResourceListOptions {
                date: Some(date),
                ..Default::default()
            })
            .await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].resource_name, "Museo Etnográfico de Siero");

        Ok(())
    }

    #[sqlx::test(migrations = "../migrations", fixtures("common"))]
    async fn resource_detail_only_carries_bookable_slots(
        pool: sqlx::PgPool,
    ) -> anyhow::Result<()> {
        let repo = ResourceRepositoryImpl::new(ConnectionPool::new(pool));

        let found = repo
            .find_with_slots(resource_id(RESOURCE_MUSEUM))
            .await?
            .unwrap();

        assert_eq!(found.resource.resource_name, "Museo Etnográfico de Siero");
        // 満席・無効・過去の枠は出ない
        assert_eq!(found.slots.len(), 2);
        assert!(found.slots.windows(2).all(|w| w[0].start_at <= w[1].start_at));
        assert!(found
            .slots
            .iter()
            .all(|s| s.is_active && s.seats_remaining > 0));

        let missing = repo.find_with_slots(ResourceId::new()).await?;
        assert!(missing.is_none());

        Ok(())
    }
}
