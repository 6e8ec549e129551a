use crate::usecases::subscriptions::{SubscriptionError, SubscriptionUseCase};
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use crates::domain::{
    repositories::subscriptions::SubscriptionRepository,
    value_objects::{
        pagination::ListSubscriptionsFilter,
        subscriptions::{
            CreateSubscriptionDto, InsertSubscriptionModel, SumSubscriptionsModel,
            UpdateSubscriptionModel,
        },
    },
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ListSubscriptionsQuery {
    pub user_id: String,
    pub after_id: Option<i64>,
    pub limit: Option<i64>,
}

impl ListSubscriptionsQuery {
    fn filter(&self) -> ListSubscriptionsFilter {
        ListSubscriptionsFilter {
            after_id: self.after_id,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub result: &'static str,
}

const OK: OkResponse = OkResponse { result: "ok" };

pub fn routes<S>(subscription_repository: Arc<S>) -> Router
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let subscriptions_usecase = SubscriptionUseCase::new(subscription_repository);

    Router::new()
        .route("/", post(create_subscription::<S>).get(list_subscriptions::<S>))
        .route("/sum", get(sum_subscriptions::<S>))
        .route(
            "/:id",
            get(get_subscription::<S>)
                .put(update_subscription::<S>)
                .delete(delete_subscription::<S>),
        )
        .with_state(Arc::new(subscriptions_usecase))
}

pub async fn create_subscription<S>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<S>>>,
    payload: Result<Json<InsertSubscriptionModel>, JsonRejection>,
) -> Result<impl IntoResponse, SubscriptionError>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let Json(insert_subscription_model) = payload?;
    let subscription_id = subscriptions_usecase
        .create(insert_subscription_model)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSubscriptionDto {
            result: "ok".to_string(),
            subscription_id,
        }),
    ))
}

pub async fn get_subscription<S>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<S>>>,
    subscription_id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, SubscriptionError>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let Path(subscription_id) = subscription_id?;
    let subscription = subscriptions_usecase.get(subscription_id).await?;

    Ok(Json(subscription))
}

pub async fn update_subscription<S>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<S>>>,
    subscription_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateSubscriptionModel>, JsonRejection>,
) -> Result<impl IntoResponse, SubscriptionError>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let Path(subscription_id) = subscription_id?;
    let Json(update_subscription_model) = payload?;
    subscriptions_usecase
        .update(subscription_id, update_subscription_model)
        .await?;

    Ok(Json(OK))
}

pub async fn delete_subscription<S>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<S>>>,
    subscription_id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, SubscriptionError>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let Path(subscription_id) = subscription_id?;
    subscriptions_usecase.delete(subscription_id).await?;

    Ok(Json(OK))
}

pub async fn list_subscriptions<S>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<S>>>,
    query: Result<Query<ListSubscriptionsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, SubscriptionError>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let Query(query) = query?;
    let page = subscriptions_usecase
        .list(&query.user_id, query.filter())
        .await?;

    Ok(Json(page))
}

pub async fn sum_subscriptions<S>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<S>>>,
    query: Result<Query<SumSubscriptionsModel>, QueryRejection>,
) -> Result<impl IntoResponse, SubscriptionError>
where
    S: SubscriptionRepository + Send + Sync + 'static,
{
    let Query(sum_subscriptions_model) = query?;
    let sum = subscriptions_usecase.sum(sum_subscriptions_model).await?;

    Ok(Json(sum))
}
