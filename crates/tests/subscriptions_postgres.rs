//! Runs against a real database. Point `TEST_DATABASE_URL` at a disposable
//! Postgres and run `cargo test -p crates -- --ignored`.

use std::sync::Arc;

use chrono::NaiveDate;
use crates::{
    domain::{
        entities::subscriptions::{InsertSubscriptionEntity, UpdateSubscriptionEntity},
        errors::RepositoryError,
        repositories::subscriptions::SubscriptionRepository,
        value_objects::{
            billing_window::BillingWindow, calendar_month::CalendarMonth,
            pagination::ListSubscriptionsFilter,
        },
    },
    infra::{
        db::{
            postgres::postgres_connection::{self, PoolOptions},
            repositories::subscriptions::SubscriptionPostgres,
        },
        memory::subscriptions::SubscriptionInMemory,
    },
};
use diesel::connection::SimpleConnection;

const SCHEMA: &str =
    include_str!("../../migrations/2025-07-01-000000_create_subscriptions/up.sql");

fn date(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

fn month(raw: &str) -> CalendarMonth {
    CalendarMonth::parse(raw).unwrap()
}

fn insert(
    user_id: &str,
    price: i64,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> InsertSubscriptionEntity {
    InsertSubscriptionEntity {
        service_name: format!("service-{price}"),
        price,
        user_id: user_id.to_string(),
        start_date: start,
        end_date: end,
    }
}

fn postgres_repository() -> SubscriptionPostgres {
    dotenvy::dotenv().ok();
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    let pool = postgres_connection::establish_connection(&url, &PoolOptions::default()).unwrap();

    let mut conn = pool.get().unwrap();
    conn.batch_execute("DROP TABLE IF EXISTS subscriptions;").unwrap();
    conn.batch_execute(SCHEMA).unwrap();

    SubscriptionPostgres::new(Arc::new(pool))
}

async fn seed<R: SubscriptionRepository>(repository: &R) -> Vec<i64> {
    let rows = [
        insert("alice", 100, date(2023, 1), Some(date(2023, 12))),
        insert("alice", 50, date(2023, 5), None),
        insert("alice", 70, date(2022, 1), Some(date(2022, 12))),
        insert("alice", 30, date(2022, 11), Some(date(2023, 2))),
        insert("bob", 1000, date(2023, 1), None),
    ];

    let mut ids = Vec::new();
    for row in rows {
        ids.push(repository.create(row).await.unwrap());
    }
    ids
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn postgres_store_honors_subscription_contract() {
    let postgres = postgres_repository();
    let memory = SubscriptionInMemory::new();
    let ids = seed(&postgres).await;
    seed(&memory).await;

    let stored = postgres.get(ids[1]).await.unwrap();
    assert_eq!(stored.user_id, "alice");
    assert_eq!(stored.price, 50);
    assert_eq!(stored.start_date, date(2023, 5));
    assert_eq!(stored.end_date, None);

    let first_page = ListSubscriptionsFilter {
        after_id: None,
        limit: Some(2),
    };
    let page = postgres.list("alice", &first_page).await.unwrap();
    assert_eq!(page.iter().map(|s| s.id).collect::<Vec<_>>(), ids[..2]);
    assert_eq!(postgres.list("alice", &first_page).await.unwrap(), page);

    let rest = ListSubscriptionsFilter {
        after_id: Some(ids[1]),
        limit: None,
    };
    let page = postgres.list("alice", &rest).await.unwrap();
    assert_eq!(page.iter().map(|s| s.id).collect::<Vec<_>>(), ids[2..4]);

    for (start, end) in [
        ("01-2023", "06-2023"),
        ("01-2023", "03-2023"),
        ("06-2023", "08-2023"),
        ("12-2022", "01-2023"),
        ("01-2020", "12-2030"),
        ("01-2010", "12-2010"),
    ] {
        let window = BillingWindow::new(month(start), month(end)).unwrap();
        assert_eq!(
            postgres.sum("alice", &window).await.unwrap(),
            memory.sum("alice", &window).await.unwrap(),
            "window {start}..{end}"
        );
    }

    let window = BillingWindow::new(month("01-2023"), month("06-2023")).unwrap();
    assert_eq!(postgres.sum("nobody", &window).await.unwrap(), 0);

    let changes = UpdateSubscriptionEntity {
        service_name: "renamed".to_string(),
        price: 1,
        start_date: date(2024, 1),
        end_date: None,
    };
    assert!(matches!(
        postgres.update(ids[0], "bob", changes.clone()).await,
        Err(RepositoryError::NotFound)
    ));
    assert!(matches!(
        postgres.update(i64::MAX, "alice", changes.clone()).await,
        Err(RepositoryError::NotFound)
    ));
    postgres.update(ids[0], "alice", changes).await.unwrap();
    assert_eq!(postgres.get(ids[0]).await.unwrap().service_name, "renamed");

    postgres.delete(ids[0]).await.unwrap();
    assert!(matches!(postgres.get(ids[0]).await, Err(RepositoryError::NotFound)));
    assert!(matches!(postgres.delete(ids[0]).await, Err(RepositoryError::NotFound)));

    let next_id = postgres
        .create(insert("alice", 5, date(2024, 1), None))
        .await
        .unwrap();
    assert!(next_id > ids[4]);
}
