use crate::entities::subscription_entity;
use crate::models::Pagination;
use crate::utils::MonthYear;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateSubscriptionRequest {
    pub service_name: String,
    /// Price in minor currency units
    pub price: i64,
    /// UUID of the owning user
    pub user_id: String,
    /// MM-YYYY
    pub start_date: String,
    /// MM-YYYY, omitted for open-ended subscriptions
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Partial update; only supplied fields overwrite the stored record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateSubscriptionRequest {
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ListSubscriptionsQuery {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub start_date_from: Option<String>,
    pub start_date_to: Option<String>,
    pub end_date_from: Option<String>,
    pub end_date_to: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TotalCostQuery {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: i32,
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<subscription_entity::Model> for SubscriptionResponse {
    fn from(m: subscription_entity::Model) -> Self {
        Self {
            id: m.id,
            service_name: m.service_name,
            price: m.price,
            user_id: m.user_id,
            start_date: MonthYear::from(m.start_date).to_string(),
            end_date: m.end_date.map(|d| MonthYear::from(d).to_string()),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionListResponse {
    pub data: Vec<SubscriptionResponse>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Period {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TotalCostResponse {
    pub total_cost: i64,
    pub period: Period,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_response_formats_month_year() {
        let now = Utc::now();
        let model = subscription_entity::Model {
            id: 7,
            service_name: "Yandex Plus".to_string(),
            price: 400,
            user_id: "60601fee-2bf1-4721-ae6f-7636e79a0cba".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            end_date: None,
            created_at: now,
            updated_at: now,
        };

        let resp = SubscriptionResponse::from(model);
        assert_eq!(resp.start_date, "07-2025");
        assert_eq!(resp.end_date, None);

        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("end_date").is_none());
        assert_eq!(json["start_date"], "07-2025");
    }
}
