use crate::entities::subscription_entity as subscriptions;
use crate::error::{AppError, AppResult};
use crate::models::PaginationParams;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::str::FromStr;

/// Mutable fields of a subscription, written as a whole on create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionFields {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl From<subscriptions::Model> for SubscriptionFields {
    fn from(m: subscriptions::Model) -> Self {
        Self {
            service_name: m.service_name,
            price: m.price,
            user_id: m.user_id,
            start_date: m.start_date,
            end_date: m.end_date,
        }
    }
}

/// Conjunctive filter shared by `list` and `sum_price`. Rows without an
/// `end_date` are open-ended and pass both end-date bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionFilter {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
    pub start_date_from: Option<NaiveDate>,
    pub start_date_to: Option<NaiveDate>,
    pub end_date_from: Option<NaiveDate>,
    pub end_date_to: Option<NaiveDate>,
}

impl SubscriptionFilter {
    fn condition(&self) -> Condition {
        use subscriptions::Column;

        let mut cond = Condition::all();
        if let Some(user_id) = &self.user_id {
            cond = cond.add(Column::UserId.eq(user_id.as_str()));
        }
        if let Some(service_name) = &self.service_name {
            cond = cond.add(Column::ServiceName.eq(service_name.as_str()));
        }
        if let Some(from) = self.start_date_from {
            cond = cond.add(Column::StartDate.gte(from));
        }
        if let Some(to) = self.start_date_to {
            cond = cond.add(Column::StartDate.lte(to));
        }
        if let Some(from) = self.end_date_from {
            cond = cond.add(
                Condition::any()
                    .add(Column::EndDate.gte(from))
                    .add(Column::EndDate.is_null()),
            );
        }
        if let Some(to) = self.end_date_to {
            cond = cond.add(
                Condition::any()
                    .add(Column::EndDate.lte(to))
                    .add(Column::EndDate.is_null()),
            );
        }
        cond
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    Id,
    ServiceName,
    Price,
    UserId,
    StartDate,
    EndDate,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    fn column(self) -> subscriptions::Column {
        use subscriptions::Column;
        match self {
            SortField::Id => Column::Id,
            SortField::ServiceName => Column::ServiceName,
            SortField::Price => Column::Price,
            SortField::UserId => Column::UserId,
            SortField::StartDate => Column::StartDate,
            SortField::EndDate => Column::EndDate,
            SortField::CreatedAt => Column::CreatedAt,
            SortField::UpdatedAt => Column::UpdatedAt,
        }
    }
}

impl FromStr for SortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortField::Id),
            "service_name" => Ok(SortField::ServiceName),
            "price" => Ok(SortField::Price),
            "user_id" => Ok(SortField::UserId),
            "start_date" => Ok(SortField::StartDate),
            "end_date" => Ok(SortField::EndDate),
            "created_at" => Ok(SortField::CreatedAt),
            "updated_at" => Ok(SortField::UpdatedAt),
            other => Err(AppError::ValidationError(format!(
                "Unsupported sort_by field: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(AppError::ValidationError(format!(
                "sort_order must be 'asc' or 'desc', got '{s}'"
            ))),
        }
    }
}

impl From<SortOrder> for Order {
    fn from(value: SortOrder) -> Self {
        match value {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

/// Defaults to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriptionSort {
    pub field: SortField,
    pub order: SortOrder,
}

#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: DatabaseConnection,
}

impl SubscriptionRepository {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create(&self, fields: SubscriptionFields) -> AppResult<subscriptions::Model> {
        let now = Utc::now();
        let model = subscriptions::ActiveModel {
            service_name: Set(fields.service_name),
            price: Set(fields.price),
            user_id: Set(fields.user_id),
            start_date: Set(fields.start_date),
            end_date: Set(fields.end_date),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(model)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<subscriptions::Model> {
        subscriptions::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Subscription {id} not found")))
    }

    /// Overwrites every mutable field of row `id`. A missing row is left
    /// alone and reported as zero affected rows, not as an error.
    pub async fn update(&self, id: i32, fields: SubscriptionFields) -> AppResult<u64> {
        use subscriptions::Column;

        let res = subscriptions::Entity::update_many()
            .col_expr(Column::ServiceName, Expr::value(fields.service_name))
            .col_expr(Column::Price, Expr::value(fields.price))
            .col_expr(Column::UserId, Expr::value(fields.user_id))
            .col_expr(Column::StartDate, Expr::value(fields.start_date))
            .col_expr(Column::EndDate, Expr::value(fields.end_date))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Id.eq(id))
            .exec(&self.pool)
            .await?;

        Ok(res.rows_affected)
    }

    /// Idempotent; deleting a missing id affects zero rows.
    pub async fn delete(&self, id: i32) -> AppResult<u64> {
        let res = subscriptions::Entity::delete_by_id(id)
            .exec(&self.pool)
            .await?;
        Ok(res.rows_affected)
    }

    /// Returns one page of matching rows plus the total match count.
    pub async fn list(
        &self,
        filter: &SubscriptionFilter,
        sort: SubscriptionSort,
        page: &PaginationParams,
    ) -> AppResult<(Vec<subscriptions::Model>, u64)> {
        let base_query = subscriptions::Entity::find().filter(filter.condition());

        let total = base_query.clone().count(&self.pool).await?;

        let order: Order = sort.order.into();
        let mut query = base_query.order_by(sort.field.column(), order.clone());
        // id tie-break keeps pages of the same request disjoint
        if sort.field != SortField::Id {
            query = query.order_by(subscriptions::Column::Id, order);
        }

        let items = query
            .limit(page.limit())
            .offset(page.offset())
            .all(&self.pool)
            .await?;

        Ok((items, total))
    }

    pub async fn sum_price(&self, filter: &SubscriptionFilter) -> AppResult<i64> {
        #[derive(Debug, FromQueryResult)]
        struct TotalCostRow {
            total_cost: i64,
        }

        // Postgres widens SUM(bigint) to numeric, cast back down.
        let row = subscriptions::Entity::find()
            .select_only()
            .column_as(
                Expr::cust("COALESCE(CAST(SUM(price) AS BIGINT), 0)"),
                "total_cost",
            )
            .filter(filter.condition())
            .into_model::<TotalCostRow>()
            .one(&self.pool)
            .await?;

        Ok(row.map(|r| r.total_cost).unwrap_or(0))
    }
}
