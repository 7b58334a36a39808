use actix_web::{HttpResponse, web};
use chrono::Datelike;
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::model::paid_day_off::PaidDayOff;
use crate::service::paid_day_off::{
    self as service, CreatePaidDayOff, PaidDayOffStatement, UpdatePaidDayOff,
};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct StatementQuery {
    /// Allowance year, defaults to the current one
    #[schema(example = 2026)]
    pub year: Option<i32>,
}

/* =========================
Per employee
========================= */
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}/paid-days-off",
    params(
        ("employee_id" = String, Path, description = "Employee ID"),
        StatementQuery
    ),
    responses(
        (status = 200, description = "Records and remaining allowance for the year", body = PaidDayOffStatement),
        (status = 404, description = "Employee not found")
    ),
    tag = "Paid Day Off"
)]
pub async fn paid_day_off_statement(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<StatementQuery>,
) -> actix_web::Result<HttpResponse> {
    let year = query.year.unwrap_or_else(|| state.clock.local().year());
    let statement = service::paid_day_off_statement(state.store.as_ref(), &path, year).await?;
    Ok(HttpResponse::Ok().json(statement))
}

#[utoipa::path(
    post,
    path = "/api/employees/{employee_id}/paid-days-off",
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    request_body = CreatePaidDayOff,
    responses(
        (status = 201, description = "Paid day off recorded", body = PaidDayOff),
        (status = 400, description = "Invalid hours or year", body = Object, example = json!({
            "message": "initial_hours must be formatted as HH:MM",
            "field": "initial_hours"
        })),
        (status = 404, description = "Employee not found")
    ),
    tag = "Paid Day Off"
)]
pub async fn add_paid_day_off(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<CreatePaidDayOff>,
) -> actix_web::Result<HttpResponse> {
    let day =
        service::add_paid_day_off(state.store.as_ref(), &path, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(day))
}

/* =========================
Single record
========================= */
#[utoipa::path(
    get,
    path = "/api/paid-days-off/{paid_day_off_id}",
    params(
        ("paid_day_off_id" = String, Path, description = "Paid day off ID")
    ),
    responses(
        (status = 200, description = "Paid day off found", body = PaidDayOff),
        (status = 404, description = "Paid day off not found")
    ),
    tag = "Paid Day Off"
)]
pub async fn get_paid_day_off(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let day = service::get_paid_day_off(state.store.as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(day))
}

#[utoipa::path(
    put,
    path = "/api/paid-days-off/{paid_day_off_id}",
    params(
        ("paid_day_off_id" = String, Path, description = "Paid day off ID")
    ),
    request_body = UpdatePaidDayOff,
    responses(
        (status = 200, description = "Paid day off updated", body = PaidDayOff),
        (status = 400, description = "Invalid or empty update"),
        (status = 404, description = "Paid day off not found")
    ),
    tag = "Paid Day Off"
)]
pub async fn update_paid_day_off(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePaidDayOff>,
) -> actix_web::Result<HttpResponse> {
    let day =
        service::update_paid_day_off(state.store.as_ref(), &path, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(day))
}

#[utoipa::path(
    delete,
    path = "/api/paid-days-off/{paid_day_off_id}",
    params(
        ("paid_day_off_id" = String, Path, description = "Paid day off ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Paid day off not found", body = Object, example = json!({
            "message": "Paid day off not found"
        }))
    ),
    tag = "Paid Day Off"
)]
pub async fn delete_paid_day_off(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    service::delete_paid_day_off(state.store.as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}
