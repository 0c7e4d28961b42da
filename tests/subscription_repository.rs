mod common;

use common::*;
use std::collections::HashSet;
use subscription_manager::AppError;
use subscription_manager::models::PaginationParams;
use subscription_manager::repositories::{
    SortField, SortOrder, SubscriptionFilter, SubscriptionSort,
};

#[tokio::test]
async fn test_create_and_get_round_trip() {
    let repo = setup_repository().await;

    let created = repo
        .create(fields("Netflix", 1500, USER_1, month(2025, 7), Some(month(2025, 12))))
        .await
        .unwrap();
    assert!(created.id > 0);
    assert_eq!(created.created_at, created.updated_at);

    let got = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(got.service_name, "Netflix");
    assert_eq!(got.price, 1500);
    assert_eq!(got.user_id, USER_1);
    assert_eq!(got.start_date, month(2025, 7));
    assert_eq!(got.end_date, Some(month(2025, 12)));
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let repo = setup_repository().await;

    let err = repo.get_by_id(4242).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{err:?}");
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let repo = setup_repository().await;
    let created = repo
        .create(fields("Spotify", 1200, USER_1, month(2025, 1), None))
        .await
        .unwrap();

    assert_eq!(repo.delete(created.id).await.unwrap(), 1);
    assert_eq!(repo.delete(created.id).await.unwrap(), 0);
    assert_eq!(repo.delete(9999).await.unwrap(), 0);

    let err = repo.get_by_id(created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_update_missing_is_noop() {
    let repo = setup_repository().await;

    let affected = repo
        .update(77, fields("Ghost", 100, USER_1, month(2025, 1), None))
        .await
        .unwrap();
    assert_eq!(affected, 0);

    let (items, total) = repo
        .list(
            &SubscriptionFilter::default(),
            SubscriptionSort::default(),
            &PaginationParams::default(),
        )
        .await
        .unwrap();
    assert_eq!(total, 0);
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_update_overwrites_all_fields() {
    let repo = setup_repository().await;
    let created = repo
        .create(fields("Netflix", 1500, USER_1, month(2025, 1), Some(month(2025, 6))))
        .await
        .unwrap();

    let affected = repo
        .update(
            created.id,
            fields("Netflix Premium", 2300, USER_2, month(2025, 2), None),
        )
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let got = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(got.id, created.id);
    assert_eq!(got.service_name, "Netflix Premium");
    assert_eq!(got.price, 2300);
    assert_eq!(got.user_id, USER_2);
    assert_eq!(got.start_date, month(2025, 2));
    assert_eq!(got.end_date, None);
    assert_eq!(got.created_at, created.created_at);
    assert!(got.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_negative_price_is_storage_error() {
    let repo = setup_repository().await;

    let err = repo
        .create(fields("Broken", -1, USER_1, month(2025, 1), None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DatabaseError(_)), "{err:?}");
}

#[tokio::test]
async fn test_pagination_covers_every_row_once() {
    let repo = setup_repository().await;
    let seeded = seed_mixed(&repo).await;

    let filter = SubscriptionFilter::default();
    let mut seen = HashSet::new();
    for page in 1..=3 {
        let params = PaginationParams::new(Some(page), Some(2));
        let (items, total) = repo
            .list(&filter, SubscriptionSort::default(), &params)
            .await
            .unwrap();
        assert_eq!(total, 5);
        assert_eq!(items.len(), if page < 3 { 2 } else { 1 });
        for item in items {
            assert!(seen.insert(item.id), "id {} returned twice", item.id);
        }
    }

    let expected: HashSet<i32> = seeded.into_iter().collect();
    assert_eq!(seen, expected);

    let (beyond, total) = repo
        .list(&filter, SubscriptionSort::default(), &PaginationParams::new(Some(4), Some(2)))
        .await
        .unwrap();
    assert!(beyond.is_empty());
    assert_eq!(total, 5);
}

#[tokio::test]
async fn test_user_filter_total_is_independent_of_page_size() {
    let repo = setup_repository().await;
    seed_mixed(&repo).await;

    let filter = SubscriptionFilter {
        user_id: Some("user-1".to_string()),
        ..Default::default()
    };

    for limit in [1, 2, 10] {
        let (items, total) = repo
            .list(
                &filter,
                SubscriptionSort::default(),
                &PaginationParams::new(Some(1), Some(limit)),
            )
            .await
            .unwrap();
        assert_eq!(total, 3);
        assert_eq!(items.len() as u64, limit.min(3));
        assert!(items.iter().all(|s| s.user_id == "user-1"));
    }
}

#[tokio::test]
async fn test_sort_by_price_ascending() {
    let repo = setup_repository().await;
    seed_mixed(&repo).await;

    let sort = SubscriptionSort {
        field: SortField::Price,
        order: SortOrder::Asc,
    };
    let (items, _) = repo
        .list(&SubscriptionFilter::default(), sort, &PaginationParams::default())
        .await
        .unwrap();

    let prices: Vec<i64> = items.iter().map(|s| s.price).collect();
    assert_eq!(prices, vec![899, 990, 1200, 1500, 1500]);
    // equal prices fall back to id order
    assert!(items[3].id < items[4].id);
}

#[tokio::test]
async fn test_default_sort_is_newest_first() {
    let repo = setup_repository().await;
    let seeded = seed_mixed(&repo).await;

    let (items, _) = repo
        .list(
            &SubscriptionFilter::default(),
            SubscriptionSort::default(),
            &PaginationParams::default(),
        )
        .await
        .unwrap();

    let ids: Vec<i32> = items.iter().map(|s| s.id).collect();
    let mut expected = seeded;
    expected.reverse();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_start_date_range_and_service_name() {
    let repo = setup_repository().await;
    seed_mixed(&repo).await;

    let filter = SubscriptionFilter {
        service_name: Some("Netflix".to_string()),
        start_date_from: Some(month(2025, 2)),
        start_date_to: Some(month(2025, 3)),
        ..Default::default()
    };
    let (items, total) = repo
        .list(&filter, SubscriptionSort::default(), &PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].user_id, "user-2");
}

#[tokio::test]
async fn test_open_ended_rows_pass_end_date_bounds() {
    let repo = setup_repository().await;
    seed_mixed(&repo).await;

    // end_date <= 06-2025: the June row plus the two open-ended rows
    let upper = SubscriptionFilter {
        end_date_to: Some(month(2025, 6)),
        ..Default::default()
    };
    let (items, total) = repo
        .list(&upper, SubscriptionSort::default(), &PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(total, 3);
    assert!(
        items
            .iter()
            .all(|s| s.end_date.is_none_or(|d| d <= month(2025, 6)))
    );

    // end_date >= 12-2025: December, May 2026 and the two open-ended rows
    let lower = SubscriptionFilter {
        end_date_from: Some(month(2025, 12)),
        ..Default::default()
    };
    let (_, total) = repo
        .list(&lower, SubscriptionSort::default(), &PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(total, 4);
}

#[tokio::test]
async fn test_sum_price_with_no_matches_is_zero() {
    let repo = setup_repository().await;

    assert_eq!(repo.sum_price(&SubscriptionFilter::default()).await.unwrap(), 0);

    seed_mixed(&repo).await;
    let filter = SubscriptionFilter {
        user_id: Some("nobody".to_string()),
        ..Default::default()
    };
    assert_eq!(repo.sum_price(&filter).await.unwrap(), 0);
}

#[tokio::test]
async fn test_sum_price_for_user() {
    let repo = setup_repository().await;
    seed_mixed(&repo).await;

    let filter = SubscriptionFilter {
        user_id: Some("user-1".to_string()),
        ..Default::default()
    };
    assert_eq!(repo.sum_price(&filter).await.unwrap(), 3599);

    let all = repo.sum_price(&SubscriptionFilter::default()).await.unwrap();
    assert_eq!(all, 1500 + 1200 + 1500 + 990 + 899);
}

#[tokio::test]
async fn test_sum_price_over_period() {
    let repo = setup_repository().await;
    seed_mixed(&repo).await;

    // starts in 2025 and ends by 12-2025 (open-ended rows included)
    let filter = SubscriptionFilter {
        start_date_from: Some(month(2025, 1)),
        end_date_to: Some(month(2025, 12)),
        ..Default::default()
    };
    assert_eq!(repo.sum_price(&filter).await.unwrap(), 1500 + 1200 + 1500 + 990);
}
