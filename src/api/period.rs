//! Vacation and leave endpoints.
//!
//! Both scopes share these handlers; the scope's `web::Data<PeriodKind>` decides
//! which table a request touches. The OpenAPI paths are declared for
//! `/api/vacations` and mirrored to `/api/leaves` in `docs.rs`.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::model::period::{Period, PeriodKind, PeriodStatus};
use crate::service::period::{self as service, CreatePeriod, UpdatePeriod};
use crate::state::AppState;
use crate::store::{PageRequest, PeriodFilter, PeriodRepository};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PeriodQuery {
    /// Filter by employee ID
    pub employee_id: Option<String>,
    #[schema(example = "pending")]
    /// Filter by status
    pub status: Option<PeriodStatus>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u32>,
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct PeriodListResponse {
    pub data: Vec<Period>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

/* =========================
List periods
========================= */
#[utoipa::path(
    get,
    path = "/api/vacations",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Paginated period list", body = PeriodListResponse)
    ),
    tag = "Period"
)]
pub async fn list_periods(
    state: web::Data<AppState>,
    kind: web::Data<PeriodKind>,
    query: web::Query<PeriodQuery>,
) -> actix_web::Result<HttpResponse> {
    let query = query.into_inner();
    let kind = **kind;
    let page = PageRequest::new(query.page, query.per_page);
    let filter = PeriodFilter {
        employee_id: query.employee_id,
        status: query.status,
    };

    let result = state
        .store
        .list_periods(kind, &filter, page)
        .await
        .map_err(|e| {
            error!(error = %e, kind = %kind, "Failed to fetch period list");
            AppError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(PeriodListResponse {
        data: result.items,
        page: page.page,
        per_page: page.per_page,
        total: result.total,
    }))
}

/* =========================
Create period
========================= */
/// Periods starting today or earlier are approved on creation.
#[utoipa::path(
    post,
    path = "/api/vacations",
    request_body(
        content = CreatePeriod,
        description = "Period request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Period created", body = Period),
        (status = 400, description = "end_date before start_date", body = Object, example = json!({
            "message": "end_date cannot be before start_date",
            "field": "end_date"
        })),
        (status = 404, description = "Employee not found")
    ),
    tag = "Period"
)]
pub async fn create_period(
    state: web::Data<AppState>,
    kind: web::Data<PeriodKind>,
    payload: web::Json<CreatePeriod>,
) -> actix_web::Result<HttpResponse> {
    let period = service::create_period(
        state.store.as_ref(),
        state.clock.as_ref(),
        **kind,
        payload.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Created().json(period))
}

#[utoipa::path(
    get,
    path = "/api/vacations/{period_id}",
    params(
        ("period_id" = String, Path, description = "ID of the period to fetch")
    ),
    responses(
        (status = 200, description = "Period found", body = Period),
        (status = 404, description = "Period not found", body = Object, example = json!({
            "message": "Vacation not found"
        }))
    ),
    tag = "Period"
)]
pub async fn get_period(
    state: web::Data<AppState>,
    kind: web::Data<PeriodKind>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let period = service::get_period(state.store.as_ref(), **kind, &path).await?;
    Ok(HttpResponse::Ok().json(period))
}

/// Direct update; any status can be written.
#[utoipa::path(
    put,
    path = "/api/vacations/{period_id}",
    params(
        ("period_id" = String, Path, description = "ID of the period to update")
    ),
    request_body = UpdatePeriod,
    responses(
        (status = 200, description = "Period updated", body = Period),
        (status = 400, description = "Invalid update"),
        (status = 404, description = "Period not found")
    ),
    tag = "Period"
)]
pub async fn update_period(
    state: web::Data<AppState>,
    kind: web::Data<PeriodKind>,
    path: web::Path<String>,
    body: web::Json<UpdatePeriod>,
) -> actix_web::Result<HttpResponse> {
    let period =
        service::update_period(state.store.as_ref(), **kind, &path, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(period))
}

#[utoipa::path(
    delete,
    path = "/api/vacations/{period_id}",
    params(
        ("period_id" = String, Path, description = "ID of the period to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Period not found")
    ),
    tag = "Period"
)]
pub async fn delete_period(
    state: web::Data<AppState>,
    kind: web::Data<PeriodKind>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    service::delete_period(state.store.as_ref(), **kind, &path).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}

/* =========================
Approve / reject
========================= */
#[utoipa::path(
    put,
    path = "/api/vacations/{period_id}/approve",
    params(
        ("period_id" = String, Path, description = "ID of the period to approve")
    ),
    responses(
        (status = 200, description = "Period approved", body = Period),
        (status = 404, description = "Period not found"),
        (status = 409, description = "Period already processed", body = Object, example = json!({
            "message": "Vacation is already approved"
        }))
    ),
    tag = "Period"
)]
pub async fn approve_period(
    state: web::Data<AppState>,
    kind: web::Data<PeriodKind>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let period =
        service::decide_period(state.store.as_ref(), **kind, &path, PeriodStatus::Approved)
            .await?;
    Ok(HttpResponse::Ok().json(period))
}

#[utoipa::path(
    put,
    path = "/api/vacations/{period_id}/reject",
    params(
        ("period_id" = String, Path, description = "ID of the period to reject")
    ),
    responses(
        (status = 200, description = "Period rejected", body = Period),
        (status = 404, description = "Period not found"),
        (status = 409, description = "Period already processed")
    ),
    tag = "Period"
)]
pub async fn reject_period(
    state: web::Data<AppState>,
    kind: web::Data<PeriodKind>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let period =
        service::decide_period(state.store.as_ref(), **kind, &path, PeriodStatus::Rejected)
            .await?;
    Ok(HttpResponse::Ok().json(period))
}
