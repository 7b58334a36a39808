use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::model::hours_bank::HoursBankEntry;
use crate::service::hours_bank::{self as service, CreateHoursEntry, HoursStatement};
use crate::state::AppState;

/// Hours bank statement of one employee
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}/hours",
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Entries with the running balance", body = HoursStatement),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Hours Bank"
)]
pub async fn hours_statement(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let statement = service::hours_statement(state.store.as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(statement))
}

/// Record a credit or debit
#[utoipa::path(
    post,
    path = "/api/employees/{employee_id}/hours",
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    request_body = CreateHoursEntry,
    responses(
        (status = 201, description = "Entry recorded", body = HoursBankEntry),
        (status = 400, description = "Invalid month, year or hours", body = Object, example = json!({
            "message": "hours must be formatted as HH:MM or -HH:MM",
            "field": "hours"
        })),
        (status = 404, description = "Employee not found")
    ),
    tag = "Hours Bank"
)]
pub async fn add_hours_entry(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<CreateHoursEntry>,
) -> actix_web::Result<HttpResponse> {
    let entry =
        service::add_hours_entry(state.store.as_ref(), &path, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(entry))
}

#[utoipa::path(
    get,
    path = "/api/hours/{entry_id}",
    params(
        ("entry_id" = String, Path, description = "Hours bank entry ID")
    ),
    responses(
        (status = 200, description = "Entry found", body = HoursBankEntry),
        (status = 404, description = "Entry not found")
    ),
    tag = "Hours Bank"
)]
pub async fn get_hours_entry(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let entry = service::get_hours_entry(state.store.as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(entry))
}

/// Entries cannot be edited, only removed
#[utoipa::path(
    delete,
    path = "/api/hours/{entry_id}",
    params(
        ("entry_id" = String, Path, description = "Hours bank entry ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 404, description = "Entry not found", body = Object, example = json!({
            "message": "Hours bank entry not found"
        }))
    ),
    tag = "Hours Bank"
)]
pub async fn delete_hours_entry(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    service::delete_hours_entry(state.store.as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}
