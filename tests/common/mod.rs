#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use subscription_manager::database::run_migrations;
use subscription_manager::repositories::{SubscriptionFields, SubscriptionRepository};
use subscription_manager::services::SubscriptionService;

pub const USER_1: &str = "60601fee-2bf1-4721-ae6f-7636e79a0cba";
pub const USER_2: &str = "1c0d8a1e-9d3b-4c55-8d6f-3f2b2a7c9e10";

/// Fresh, migrated in-memory database. A single connection keeps the
/// in-memory database alive for the life of the pool.
pub async fn setup_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("failed to open test database");
    run_migrations(&db)
        .await
        .expect("failed to migrate test database");
    db
}

pub async fn setup_repository() -> SubscriptionRepository {
    SubscriptionRepository::new(setup_db().await)
}

pub async fn setup_service() -> SubscriptionService {
    SubscriptionService::new(setup_repository().await)
}

pub fn month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

pub fn fields(
    service_name: &str,
    price: i64,
    user_id: &str,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> SubscriptionFields {
    SubscriptionFields {
        service_name: service_name.to_string(),
        price,
        user_id: user_id.to_string(),
        start_date,
        end_date,
    }
}

/// Five rows priced {1500, 1200, 1500, 990, 899}; user-1 owns 1500, 1200 and 899.
pub async fn seed_mixed(repo: &SubscriptionRepository) -> Vec<i32> {
    let rows = [
        fields("Netflix", 1500, "user-1", month(2025, 1), Some(month(2025, 6))),
        fields("Spotify", 1200, "user-1", month(2025, 2), None),
        fields("Netflix", 1500, "user-2", month(2025, 3), Some(month(2025, 12))),
        fields("YouTube Premium", 990, "user-3", month(2025, 4), None),
        fields("Apple Music", 899, "user-1", month(2025, 5), Some(month(2026, 5))),
    ];

    let mut ids = Vec::with_capacity(rows.len());
    for row in rows {
        ids.push(repo.create(row).await.expect("seed insert failed").id);
    }
    ids
}
