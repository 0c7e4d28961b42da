use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::repositories::{
    SubscriptionFields, SubscriptionFilter, SubscriptionRepository, SubscriptionSort,
};
use crate::utils::MonthYear;
use chrono::NaiveDate;

const MAX_SERVICE_NAME_LEN: usize = 255;

#[derive(Clone)]
pub struct SubscriptionService {
    repo: SubscriptionRepository,
}

impl SubscriptionService {
    pub fn new(repo: SubscriptionRepository) -> Self {
        Self { repo }
    }

    pub async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> AppResult<SubscriptionResponse> {
        let fields = SubscriptionFields {
            service_name: validate_service_name(&request.service_name)?,
            price: validate_price(request.price)?,
            user_id: validate_user_id(&request.user_id)?,
            start_date: parse_month_year("start_date", &request.start_date)?,
            end_date: parse_optional_month_year("end_date", request.end_date.as_deref())?,
        };

        let model = self.repo.create(fields).await?;
        log::info!(
            "Created subscription {} ({}) for user {}",
            model.id,
            model.service_name,
            model.user_id
        );
        Ok(SubscriptionResponse::from(model))
    }

    pub async fn get_subscription(&self, id: i32) -> AppResult<SubscriptionResponse> {
        let model = self.repo.get_by_id(id).await?;
        Ok(SubscriptionResponse::from(model))
    }

    /// Merges the supplied fields into the stored record. An empty
    /// `end_date` string clears the end date.
    pub async fn update_subscription(
        &self,
        id: i32,
        request: UpdateSubscriptionRequest,
    ) -> AppResult<SubscriptionResponse> {
        let mut fields = SubscriptionFields::from(self.repo.get_by_id(id).await?);

        if let Some(service_name) = &request.service_name {
            fields.service_name = validate_service_name(service_name)?;
        }
        if let Some(price) = request.price {
            fields.price = validate_price(price)?;
        }
        if let Some(start_date) = &request.start_date {
            fields.start_date = parse_month_year("start_date", start_date)?;
        }
        if let Some(end_date) = &request.end_date {
            fields.end_date = parse_optional_month_year("end_date", Some(end_date))?;
        }

        let affected = self.repo.update(id, fields).await?;
        if affected == 0 {
            // deleted between the read and the write
            return Err(AppError::NotFound(format!("Subscription {id} not found")));
        }
        log::info!("Updated subscription {id}");

        let model = self.repo.get_by_id(id).await?;
        Ok(SubscriptionResponse::from(model))
    }

    pub async fn delete_subscription(&self, id: i32) -> AppResult<()> {
        let affected = self.repo.delete(id).await?;
        if affected > 0 {
            log::info!("Deleted subscription {id}");
        } else {
            log::debug!("Delete of missing subscription {id} ignored");
        }
        Ok(())
    }

    pub async fn list_subscriptions(
        &self,
        query: &ListSubscriptionsQuery,
    ) -> AppResult<SubscriptionListResponse> {
        let params = PaginationParams::new(query.page, query.limit);

        let filter = SubscriptionFilter {
            user_id: non_empty(query.user_id.as_deref()),
            service_name: non_empty(query.service_name.as_deref()),
            start_date_from: parse_optional_month_year(
                "start_date_from",
                query.start_date_from.as_deref(),
            )?,
            start_date_to: parse_optional_month_year(
                "start_date_to",
                query.start_date_to.as_deref(),
            )?,
            end_date_from: parse_optional_month_year(
                "end_date_from",
                query.end_date_from.as_deref(),
            )?,
            end_date_to: parse_optional_month_year("end_date_to", query.end_date_to.as_deref())?,
        };

        let mut sort = SubscriptionSort::default();
        if let Some(field) = non_empty(query.sort_by.as_deref()) {
            sort.field = field.parse()?;
        }
        if let Some(order) = non_empty(query.sort_order.as_deref()) {
            sort.order = order.parse()?;
        }

        let (models, total) = self.repo.list(&filter, sort, &params).await?;
        let data: Vec<SubscriptionResponse> =
            models.into_iter().map(SubscriptionResponse::from).collect();

        Ok(SubscriptionListResponse {
            data,
            pagination: Pagination::new(&params, total),
        })
    }

    /// Sums price over subscriptions that start on or after `start_date` and
    /// end on or before `end_date`; open-ended subscriptions are included.
    pub async fn calculate_total_cost(&self, query: &TotalCostQuery) -> AppResult<TotalCostResponse> {
        let start_date = non_empty(query.start_date.as_deref())
            .ok_or_else(|| AppError::ValidationError("start_date is required".to_string()))?;
        let end_date = non_empty(query.end_date.as_deref())
            .ok_or_else(|| AppError::ValidationError("end_date is required".to_string()))?;

        let filter = SubscriptionFilter {
            user_id: non_empty(query.user_id.as_deref()),
            service_name: non_empty(query.service_name.as_deref()),
            start_date_from: Some(parse_month_year("start_date", &start_date)?),
            end_date_to: Some(parse_month_year("end_date", &end_date)?),
            ..Default::default()
        };

        let total_cost = self.repo.sum_price(&filter).await?;

        Ok(TotalCostResponse {
            total_cost,
            period: Period {
                start_date,
                end_date,
            },
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_month_year(field: &str, value: &str) -> AppResult<NaiveDate> {
    value
        .trim()
        .parse::<MonthYear>()
        .map(NaiveDate::from)
        .map_err(|e| AppError::ValidationError(format!("{field}: {e}")))
}

fn parse_optional_month_year(field: &str, value: Option<&str>) -> AppResult<Option<NaiveDate>> {
    non_empty(value)
        .map(|v| parse_month_year(field, &v))
        .transpose()
}

fn validate_service_name(value: &str) -> AppResult<String> {
    let name = value.trim();
    if name.is_empty() {
        return Err(AppError::ValidationError(
            "service_name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_SERVICE_NAME_LEN {
        return Err(AppError::ValidationError(format!(
            "service_name must be at most {MAX_SERVICE_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_price(price: i64) -> AppResult<i64> {
    if price < 0 {
        return Err(AppError::ValidationError(
            "price must not be negative".to_string(),
        ));
    }
    Ok(price)
}

fn validate_user_id(value: &str) -> AppResult<String> {
    let user_id = value.trim();
    uuid::Uuid::parse_str(user_id)
        .map_err(|_| AppError::ValidationError("user_id must be a valid UUID".to_string()))?;
    Ok(user_id.to_string())
}
