use chrono::NaiveDate;
use diesel::prelude::*;

use crate::infra::db::postgres::schema::subscriptions;

#[derive(Debug, Clone, PartialEq, Eq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = subscriptions)]
pub struct SubscriptionEntity {
    pub id: i64,
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = subscriptions)]
pub struct InsertSubscriptionEntity {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Replaceable columns. `id` and `user_id` identify the row and are never set.
#[derive(Debug, Clone, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = subscriptions, treat_none_as_null = true)]
pub struct UpdateSubscriptionEntity {
    pub service_name: String,
    pub price: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}
