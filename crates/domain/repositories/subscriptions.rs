use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::subscriptions::{
        InsertSubscriptionEntity, SubscriptionEntity, UpdateSubscriptionEntity,
    },
    errors::RepositoryResult,
    value_objects::{billing_window::BillingWindow, pagination::ListSubscriptionsFilter},
};

/// Persistence contract for subscriptions. Implementations perform no
/// validation; `NotFound` is reported when a keyed operation matches no row.
#[automock]
#[async_trait]
pub trait SubscriptionRepository {
    async fn create(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
    ) -> RepositoryResult<i64>;

    async fn get(&self, subscription_id: i64) -> RepositoryResult<SubscriptionEntity>;

    /// Replaces the mutable columns of the row matching both `subscription_id`
    /// and `user_id`.
    async fn update(
        &self,
        subscription_id: i64,
        user_id: &str,
        update_subscription_entity: UpdateSubscriptionEntity,
    ) -> RepositoryResult<()>;

    async fn delete(&self, subscription_id: i64) -> RepositoryResult<()>;

    /// Ascending by id, honoring the filter's exclusive cursor and page size.
    async fn list(
        &self,
        user_id: &str,
        filter: &ListSubscriptionsFilter,
    ) -> RepositoryResult<Vec<SubscriptionEntity>>;

    /// Prorated cost of the user's subscriptions over `window`.
    async fn sum(&self, user_id: &str, window: &BillingWindow) -> RepositoryResult<i64>;
}
