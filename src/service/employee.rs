use serde::Deserialize;
use tracing::{error, info};
use utoipa::ToSchema;

use super::{optional_text, required};
use crate::error::AppError;
use crate::model::employee::{Employee, EmployeePatch, NewEmployee};
use crate::store::EmployeeRepository;
use crate::utils::registration::sanitize;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "Maria Souza")]
    pub full_name: String,
    /// Free text; spaces, periods and hyphens are stripped before storing.
    #[schema(example = "123.456-7")]
    pub registration_number: String,
    #[schema(example = "Analyst")]
    pub position: String,
    #[schema(example = "Part-time until March", nullable = true)]
    pub observations: Option<String>,
}

/// Partial update; absent fields are left alone, blank `observations` clears them.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub full_name: Option<String>,
    pub registration_number: Option<String>,
    pub position: Option<String>,
    pub observations: Option<String>,
}

fn registration_key(raw: &str) -> Result<String, AppError> {
    let key = sanitize(raw);
    if key.is_empty() {
        return Err(AppError::validation(
            "registration_number",
            "registration_number is required",
        ));
    }
    Ok(key)
}

async fn ensure_registration_free<R: EmployeeRepository + ?Sized>(
    repo: &R,
    key: &str,
    except_id: Option<&str>,
) -> Result<(), AppError> {
    let existing = repo.find_employee_by_registration(key).await.map_err(|e| {
        error!(error = %e, registration = key, "Failed to look up registration");
        AppError::from(e)
    })?;

    match existing {
        Some(other) if Some(other.id.as_str()) != except_id => Err(AppError::Conflict(format!(
            "registration {key} already exists"
        ))),
        _ => Ok(()),
    }
}

pub async fn require_employee<R: EmployeeRepository + ?Sized>(
    repo: &R,
    id: &str,
) -> Result<Employee, AppError> {
    repo.get_employee(id)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id = id, "Failed to fetch employee");
            AppError::from(e)
        })?
        .ok_or(AppError::NotFound("Employee"))
}

pub async fn create_employee<R: EmployeeRepository + ?Sized>(
    repo: &R,
    input: CreateEmployee,
) -> Result<Employee, AppError> {
    let full_name = required("full_name", &input.full_name)?;
    let registration_number = registration_key(&input.registration_number)?;
    let position = required("position", &input.position)?;

    ensure_registration_free(repo, &registration_number, None).await?;

    let employee = repo
        .create_employee(NewEmployee {
            full_name,
            registration_number,
            position,
            observations: optional_text(input.observations),
        })
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create employee");
            AppError::from(e)
        })?;

    info!(employee_id = %employee.id, "Employee created");
    Ok(employee)
}

pub async fn update_employee<R: EmployeeRepository + ?Sized>(
    repo: &R,
    id: &str,
    input: UpdateEmployee,
) -> Result<Employee, AppError> {
    let patch = EmployeePatch {
        full_name: input
            .full_name
            .map(|v| required("full_name", &v))
            .transpose()?,
        registration_number: input
            .registration_number
            .map(|v| registration_key(&v))
            .transpose()?,
        position: input
            .position
            .map(|v| required("position", &v))
            .transpose()?,
        observations: input.observations.map(|v| optional_text(Some(v))),
    };

    if patch.is_empty() {
        return Err(AppError::validation("body", "No fields provided for update"));
    }

    if let Some(key) = &patch.registration_number {
        ensure_registration_free(repo, key, Some(id)).await?;
    }

    repo.update_employee(id, patch)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id = id, "Failed to update employee");
            AppError::from(e)
        })?
        .ok_or(AppError::NotFound("Employee"))
}

/// Deletes the employee together with all dependent records.
pub async fn delete_employee<R: EmployeeRepository + ?Sized>(
    repo: &R,
    id: &str,
) -> Result<(), AppError> {
    let deleted = repo.delete_employee(id).await.map_err(|e| {
        error!(error = %e, employee_id = id, "Failed to delete employee");
        AppError::from(e)
    })?;

    if !deleted {
        return Err(AppError::NotFound("Employee"));
    }

    info!(employee_id = id, "Employee deleted");
    Ok(())
}
