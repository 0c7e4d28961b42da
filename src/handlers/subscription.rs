use crate::error::{json_error_handler, path_error_handler, query_error_handler};
use crate::models::*;
use crate::services::SubscriptionService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/subscriptions",
    tag = "subscription",
    request_body = CreateSubscriptionRequest,
    responses(
        (status = 201, description = "Subscription created", body = SubscriptionResponse),
        (status = 400, description = "Invalid input"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn create_subscription(
    subscription_service: web::Data<SubscriptionService>,
    request: web::Json<CreateSubscriptionRequest>,
) -> Result<HttpResponse> {
    match subscription_service
        .create_subscription(request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Created().json(resp)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/subscriptions/{id}",
    tag = "subscription",
    params(
        ("id" = i32, Path, description = "Subscription id")
    ),
    responses(
        (status = 200, description = "Subscription found", body = SubscriptionResponse),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Subscription not found")
    )
)]
pub async fn get_subscription(
    subscription_service: web::Data<SubscriptionService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match subscription_service.get_subscription(path.into_inner()).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(resp)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/subscriptions/{id}",
    tag = "subscription",
    params(
        ("id" = i32, Path, description = "Subscription id")
    ),
    request_body = UpdateSubscriptionRequest,
    responses(
        (status = 200, description = "Subscription updated", body = SubscriptionResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Subscription not found"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn update_subscription(
    subscription_service: web::Data<SubscriptionService>,
    path: web::Path<i32>,
    request: web::Json<UpdateSubscriptionRequest>,
) -> Result<HttpResponse> {
    match subscription_service
        .update_subscription(path.into_inner(), request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(resp)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/subscriptions/{id}",
    tag = "subscription",
    params(
        ("id" = i32, Path, description = "Subscription id")
    ),
    responses(
        (status = 204, description = "Subscription deleted (or already absent)"),
        (status = 400, description = "Invalid id"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn delete_subscription(
    subscription_service: web::Data<SubscriptionService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match subscription_service
        .delete_subscription(path.into_inner())
        .await
    {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/subscriptions",
    tag = "subscription",
    params(
        ("user_id" = Option<String>, Query, description = "Owner user id"),
        ("service_name" = Option<String>, Query, description = "Exact service name"),
        ("page" = Option<u64>, Query, description = "1-based page, default 1"),
        ("limit" = Option<u64>, Query, description = "Page size, default 10; values above 100 are clamped to 100"),
        ("start_date_from" = Option<String>, Query, description = "MM-YYYY, start_date lower bound"),
        ("start_date_to" = Option<String>, Query, description = "MM-YYYY, start_date upper bound"),
        ("end_date_from" = Option<String>, Query, description = "MM-YYYY, end_date lower bound"),
        ("end_date_to" = Option<String>, Query, description = "MM-YYYY, end_date upper bound"),
        ("sort_by" = Option<String>, Query, description = "Sort field, default created_at"),
        ("sort_order" = Option<String>, Query, description = "asc | desc, default desc")
    ),
    responses(
        (status = 200, description = "Page of subscriptions", body = SubscriptionListResponse),
        (status = 400, description = "Invalid filter"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list_subscriptions(
    subscription_service: web::Data<SubscriptionService>,
    query: web::Query<ListSubscriptionsQuery>,
) -> Result<HttpResponse> {
    match subscription_service.list_subscriptions(&query).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(resp)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/subscriptions/total-cost",
    tag = "subscription",
    params(
        ("user_id" = Option<String>, Query, description = "Owner user id"),
        ("service_name" = Option<String>, Query, description = "Exact service name"),
        ("start_date" = String, Query, description = "MM-YYYY, period start"),
        ("end_date" = String, Query, description = "MM-YYYY, period end")
    ),
    responses(
        (status = 200, description = "Total cost for the period", body = TotalCostResponse),
        (status = 400, description = "Missing or invalid period"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn calculate_total_cost(
    subscription_service: web::Data<SubscriptionService>,
    query: web::Query<TotalCostQuery>,
) -> Result<HttpResponse> {
    match subscription_service.calculate_total_cost(&query).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(resp)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn subscription_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/subscriptions")
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .route("", web::post().to(create_subscription))
            .route("", web::get().to(list_subscriptions))
            // must precede /{id}
            .route("/total-cost", web::get().to(calculate_total_cost))
            .route("/{id}", web::get().to(get_subscription))
            .route("/{id}", web::put().to(update_subscription))
            .route("/{id}", web::delete().to(delete_subscription)),
    );
}
