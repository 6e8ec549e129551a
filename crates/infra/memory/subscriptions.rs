use anyhow::anyhow;
use async_trait::async_trait;
use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use crate::domain::{
    entities::subscriptions::{
        InsertSubscriptionEntity, SubscriptionEntity, UpdateSubscriptionEntity,
    },
    errors::{RepositoryError, RepositoryResult},
    repositories::subscriptions::SubscriptionRepository,
    value_objects::{
        billing_window::{BillingWindow, BilledRange},
        pagination::ListSubscriptionsFilter,
    },
};

/// Process-local `SubscriptionRepository`. Ids start at 1 and are never
/// reused, like a `BIGSERIAL` column.
#[derive(Debug, Default)]
pub struct SubscriptionInMemory {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    rows: BTreeMap<i64, SubscriptionEntity>,
}

impl SubscriptionInMemory {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| {
            RepositoryError::Persistence(anyhow!("in-memory subscription store poisoned"))
        })
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionInMemory {
    async fn create(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
    ) -> RepositoryResult<i64> {
        let mut state = self.lock()?;
        state.last_id += 1;
        let id = state.last_id;

        state.rows.insert(
            id,
            SubscriptionEntity {
                id,
                service_name: insert_subscription_entity.service_name,
                price: insert_subscription_entity.price,
                user_id: insert_subscription_entity.user_id,
                start_date: insert_subscription_entity.start_date,
                end_date: insert_subscription_entity.end_date,
            },
        );

        Ok(id)
    }

    async fn get(&self, subscription_id: i64) -> RepositoryResult<SubscriptionEntity> {
        self.lock()?
            .rows
            .get(&subscription_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn update(
        &self,
        subscription_id: i64,
        user_id: &str,
        update_subscription_entity: UpdateSubscriptionEntity,
    ) -> RepositoryResult<()> {
        let mut state = self.lock()?;
        let row = state
            .rows
            .get_mut(&subscription_id)
            .filter(|row| row.user_id == user_id)
            .ok_or(RepositoryError::NotFound)?;

        row.service_name = update_subscription_entity.service_name;
        row.price = update_subscription_entity.price;
        row.start_date = update_subscription_entity.start_date;
        row.end_date = update_subscription_entity.end_date;

        Ok(())
    }

    async fn delete(&self, subscription_id: i64) -> RepositoryResult<()> {
        self.lock()?
            .rows
            .remove(&subscription_id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn list(
        &self,
        user_id: &str,
        filter: &ListSubscriptionsFilter,
    ) -> RepositoryResult<Vec<SubscriptionEntity>> {
        let state = self.lock()?;
        let matching = state
            .rows
            .values()
            .filter(|row| row.user_id == user_id && filter.admits(row.id))
            .cloned();

        let results = match filter.page_size() {
            Some(limit) => matching
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .collect(),
            None => matching.collect(),
        };

        Ok(results)
    }

    async fn sum(&self, user_id: &str, window: &BillingWindow) -> RepositoryResult<i64> {
        let state = self.lock()?;
        let ranges = state
            .rows
            .values()
            .filter(|row| row.user_id == user_id)
            .map(BilledRange::from);

        Ok(window.prorated_total(ranges))
    }
}
