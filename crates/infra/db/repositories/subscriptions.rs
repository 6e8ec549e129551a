use anyhow::Context;
use async_trait::async_trait;
use diesel::{
    RunQueryDsl, delete, insert_into,
    prelude::*,
    sql_query,
    sql_types::{BigInt, Date, Text},
    update,
};
use std::sync::Arc;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::subscriptions},
};
use domain::{
    entities::subscriptions::{
        InsertSubscriptionEntity, SubscriptionEntity, UpdateSubscriptionEntity,
    },
    errors::{RepositoryError, RepositoryResult},
    repositories::subscriptions::SubscriptionRepository,
    value_objects::{billing_window::BillingWindow, pagination::ListSubscriptionsFilter},
};

/// Same proration as `BillingWindow::prorated_total`, evaluated by Postgres.
/// Binds: `$1` user id, `$2` first day of the window's start month, `$3` first
/// day of its end month.
const PRORATED_SUM_SQL: &str = "\
WITH billed AS (
    SELECT price,
           GREATEST(start_date, $2) AS overlap_start,
           LEAST(COALESCE(end_date, $3), $3) AS overlap_end
    FROM subscriptions
    WHERE user_id = $1
)
SELECT COALESCE(SUM(
           price * (
               (EXTRACT(YEAR FROM overlap_end) - EXTRACT(YEAR FROM overlap_start)) * 12
               + EXTRACT(MONTH FROM overlap_end) - EXTRACT(MONTH FROM overlap_start)
               + 1
           )
       ), 0)::BIGINT AS total
FROM billed
WHERE overlap_start <= overlap_end";

#[derive(Debug, QueryableByName)]
struct ProratedSumRow {
    #[diesel(sql_type = BigInt)]
    total: i64,
}

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn create(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
    ) -> RepositoryResult<i64> {
        let mut conn = Arc::clone(&self.db_pool)
            .get()
            .context("failed to acquire postgres connection")?;

        let subscription_id = insert_into(subscriptions::table)
            .values(&insert_subscription_entity)
            .returning(subscriptions::id)
            .get_result::<i64>(&mut conn)
            .context("failed to insert subscription")?;

        Ok(subscription_id)
    }

    async fn get(&self, subscription_id: i64) -> RepositoryResult<SubscriptionEntity> {
        let mut conn = Arc::clone(&self.db_pool)
            .get()
            .context("failed to acquire postgres connection")?;

        subscriptions::table
            .find(subscription_id)
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()
            .context("failed to load subscription")?
            .ok_or(RepositoryError::NotFound)
    }

    async fn update(
        &self,
        subscription_id: i64,
        user_id: &str,
        update_subscription_entity: UpdateSubscriptionEntity,
    ) -> RepositoryResult<()> {
        let mut conn = Arc::clone(&self.db_pool)
            .get()
            .context("failed to acquire postgres connection")?;

        let updated = update(subscriptions::table)
            .filter(subscriptions::id.eq(subscription_id))
            .filter(subscriptions::user_id.eq(user_id))
            .set(&update_subscription_entity)
            .execute(&mut conn)
            .context("failed to update subscription")?;

        if updated == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, subscription_id: i64) -> RepositoryResult<()> {
        let mut conn = Arc::clone(&self.db_pool)
            .get()
            .context("failed to acquire postgres connection")?;

        let deleted = delete(subscriptions::table.find(subscription_id))
            .execute(&mut conn)
            .context("failed to delete subscription")?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list(
        &self,
        user_id: &str,
        filter: &ListSubscriptionsFilter,
    ) -> RepositoryResult<Vec<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool)
            .get()
            .context("failed to acquire postgres connection")?;

        let mut query = subscriptions::table
            .select(SubscriptionEntity::as_select())
            .filter(subscriptions::user_id.eq(user_id))
            .order(subscriptions::id.asc())
            .into_boxed();

        if let Some(after_id) = filter.after_id {
            query = query.filter(subscriptions::id.gt(after_id));
        }

        if let Some(limit) = filter.page_size() {
            query = query.limit(limit);
        }

        let results = query
            .load::<SubscriptionEntity>(&mut conn)
            .context("failed to list subscriptions")?;

        Ok(results)
    }

    async fn sum(&self, user_id: &str, window: &BillingWindow) -> RepositoryResult<i64> {
        let mut conn = Arc::clone(&self.db_pool)
            .get()
            .context("failed to acquire postgres connection")?;

        let row = sql_query(PRORATED_SUM_SQL)
            .bind::<Text, _>(user_id)
            .bind::<Date, _>(window.start().first_day())
            .bind::<Date, _>(window.end().first_day())
            .get_result::<ProratedSumRow>(&mut conn)
            .context("failed to sum subscriptions")?;

        Ok(row.total)
    }
}
