use std::sync::Arc;

use crates::domain::{
    errors::{RepositoryError, ValidationError},
    repositories::subscriptions::SubscriptionRepository,
    value_objects::{
        pagination::{ListSubscriptionsFilter, SubscriptionPageDto},
        subscriptions::{
            InsertSubscriptionModel, SubscriptionModel, SubscriptionSumDto,
            SumSubscriptionsModel, UpdateSubscriptionModel,
        },
    },
};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("subscription not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubscriptionError::Validation(_) => StatusCode::BAD_REQUEST,
            SubscriptionError::NotFound => StatusCode::NOT_FOUND,
            SubscriptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepositoryError> for SubscriptionError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => SubscriptionError::NotFound,
            RepositoryError::Persistence(err) => SubscriptionError::Internal(err),
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SubscriptionError>;

pub struct SubscriptionUseCase<S>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    subscription_repo: Arc<S>,
}

impl<S> SubscriptionUseCase<S>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    pub fn new(subscription_repo: Arc<S>) -> Self {
        Self { subscription_repo }
    }

    pub async fn create(&self, model: InsertSubscriptionModel) -> UseCaseResult<i64> {
        info!(
            user_id = %model.user_id,
            service_name = %model.service_name,
            "subscriptions: create requested"
        );

        let entity = model.to_entity().map_err(|err| {
            warn!(
                user_id = %model.user_id,
                error = %err,
                status = axum::http::StatusCode::BAD_REQUEST.as_u16(),
                "subscriptions: invalid create request"
            );
            err
        })?;

        let subscription_id = self
            .subscription_repo
            .create(entity)
            .await
            .map_err(|err| {
                error!(
                    user_id = %model.user_id,
                    db_error = ?err,
                    "subscriptions: failed to create subscription"
                );
                err
            })?;

        info!(
            user_id = %model.user_id,
            subscription_id,
            "subscriptions: subscription created"
        );
        Ok(subscription_id)
    }

    pub async fn get(&self, subscription_id: i64) -> UseCaseResult<SubscriptionModel> {
        info!(subscription_id, "subscriptions: get requested");

        let entity = self
            .subscription_repo
            .get(subscription_id)
            .await
            .map_err(|err| {
                Self::log_repository_error(subscription_id, &err, "failed to load subscription");
                err
            })?;

        Ok(SubscriptionModel::from(entity))
    }

    pub async fn update(
        &self,
        subscription_id: i64,
        model: UpdateSubscriptionModel,
    ) -> UseCaseResult<()> {
        info!(
            subscription_id,
            user_id = %model.user_id,
            "subscriptions: update requested"
        );

        let entity = model.to_entity().map_err(|err| {
            warn!(
                subscription_id,
                error = %err,
                status = axum::http::StatusCode::BAD_REQUEST.as_u16(),
                "subscriptions: invalid update request"
            );
            err
        })?;

        self.subscription_repo
            .update(subscription_id, &model.user_id, entity)
            .await
            .map_err(|err| {
                Self::log_repository_error(subscription_id, &err, "failed to update subscription");
                err
            })?;

        info!(subscription_id, "subscriptions: subscription updated");
        Ok(())
    }

    pub async fn delete(&self, subscription_id: i64) -> UseCaseResult<()> {
        info!(subscription_id, "subscriptions: delete requested");

        self.subscription_repo
            .delete(subscription_id)
            .await
            .map_err(|err| {
                Self::log_repository_error(subscription_id, &err, "failed to delete subscription");
                err
            })?;

        info!(subscription_id, "subscriptions: subscription deleted");
        Ok(())
    }

    pub async fn list(
        &self,
        user_id: &str,
        filter: ListSubscriptionsFilter,
    ) -> UseCaseResult<SubscriptionPageDto> {
        info!(
            %user_id,
            after_id = ?filter.after_id,
            limit = ?filter.limit,
            "subscriptions: list requested"
        );

        if user_id.trim().is_empty() {
            return Err(ValidationError::MissingField("user_id").into());
        }

        let entities = self
            .subscription_repo
            .list(user_id, &filter)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    db_error = ?err,
                    "subscriptions: failed to list subscriptions"
                );
                err
            })?;

        let page = SubscriptionPageDto::from(
            entities
                .into_iter()
                .map(SubscriptionModel::from)
                .collect::<Vec<_>>(),
        );

        info!(
            %user_id,
            count = page.data.len(),
            next_after_id = ?page.next_after_id,
            "subscriptions: subscriptions listed"
        );
        Ok(page)
    }

    pub async fn sum(&self, model: SumSubscriptionsModel) -> UseCaseResult<SubscriptionSumDto> {
        info!(
            user_id = %model.user_id,
            start_date = %model.start_date,
            end_date = %model.end_date,
            "subscriptions: sum requested"
        );

        let window = model.to_window().map_err(|err| {
            warn!(
                user_id = %model.user_id,
                error = %err,
                status = axum::http::StatusCode::BAD_REQUEST.as_u16(),
                "subscriptions: invalid sum window"
            );
            err
        })?;

        let current_sum = self
            .subscription_repo
            .sum(&model.user_id, &window)
            .await
            .map_err(|err| {
                error!(
                    user_id = %model.user_id,
                    db_error = ?err,
                    "subscriptions: failed to sum subscriptions"
                );
                err
            })?;

        info!(
            user_id = %model.user_id,
            current_sum,
            "subscriptions: sum calculated"
        );
        Ok(SubscriptionSumDto {
            user_id: model.user_id,
            current_sum,
        })
    }

    fn log_repository_error(subscription_id: i64, err: &RepositoryError, action: &str) {
        match err {
            RepositoryError::NotFound => warn!(
                subscription_id,
                status = axum::http::StatusCode::NOT_FOUND.as_u16(),
                "subscriptions: {action}: not found"
            ),
            RepositoryError::Persistence(db_error) => error!(
                subscription_id,
                db_error = ?db_error,
                "subscriptions: {action}"
            ),
        }
    }
}
