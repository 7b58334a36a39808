use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::model::employee::Employee;
use crate::service::employee::{self as service, CreateEmployee, UpdateEmployee};
use crate::state::AppState;
use crate::store::{EmployeeFilter, EmployeeRepository, PageRequest};

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct EmployeeQuery {
    /// Pagination page number (start with 1)
    pub page: Option<u32>,
    /// Items per page (max 100)
    pub per_page: Option<u32>,
    /// Search by name or registration number
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 10)]
    pub total: i64,
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created successfully", body = Employee),
        (status = 400, description = "Missing required field", body = Object, example = json!({
            "message": "position is required",
            "field": "position"
        })),
        (status = 409, description = "Registration number already taken", body = Object, example = json!({
            "message": "registration 1234567 already exists"
        })),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "message": "Something went wrong, Contact with system admin"
        }))
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    state: web::Data<AppState>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<HttpResponse> {
    let employee = service::create_employee(state.store.as_ref(), payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(employee))
}

#[utoipa::path(
    get,
    path = "/api/employees",
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse)
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    state: web::Data<AppState>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<HttpResponse> {
    let page = PageRequest::new(query.page, query.per_page);
    let filter = EmployeeFilter {
        search: query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    };
    debug!(?filter, page = page.page, per_page = page.per_page, "Fetching employees");

    let result = state
        .store
        .list_employees(&filter, page)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch employees");
            AppError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data: result.items,
        page: page.page,
        per_page: page.per_page,
        total: result.total,
    }))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    let employee = service::require_employee(state.store.as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated successfully", body = Employee),
        (status = 400, description = "Invalid or empty update"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 409, description = "Registration number already taken")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateEmployee>,
) -> actix_web::Result<HttpResponse> {
    let employee =
        service::update_employee(state.store.as_ref(), &path, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Delete Employee together with its hours bank, periods and paid days off
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<HttpResponse> {
    service::delete_employee(state.store.as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}
