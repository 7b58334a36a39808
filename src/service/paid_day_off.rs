use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;

use super::balance::{compute_paid_day_off_balance, initial_minutes_for_year};
use super::duration_field;
use super::employee::require_employee;
use crate::error::AppError;
use crate::model::paid_day_off::{NewPaidDayOff, PaidDayOff, PaidDayOffPatch};
use crate::store::{EmployeeRepository, PaidDayOffRepository, StoreError};
use crate::utils::time_text::format_minutes;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePaidDayOff {
    #[schema(example = "2026-02-16", format = "date", value_type = String)]
    pub date: NaiveDate,
    /// "HH:MM" consumed, or "-HH:MM" granted back.
    #[schema(example = "08:00")]
    pub hours: String,
    /// Defaults to the year of `date`.
    pub year: Option<i32>,
    /// Allowance seed for the year, "HH:MM".
    #[schema(example = "40:00")]
    pub initial_hours: Option<String>,
}

/// Blank `initial_hours` clears the seed.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePaidDayOff {
    #[schema(format = "date", value_type = Option<String>)]
    pub date: Option<NaiveDate>,
    pub hours: Option<String>,
    pub year: Option<i32>,
    pub initial_hours: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaidDayOffStatement {
    pub employee_id: String,
    pub year: i32,
    pub entries: Vec<PaidDayOff>,
    #[schema(example = 2400)]
    pub initial_minutes: i64,
    #[schema(example = 1920)]
    pub balance_minutes: i64,
    #[schema(example = "32:00")]
    pub balance: String,
}

fn check_year(year: i32) -> Result<i32, AppError> {
    if !(1900..=9999).contains(&year) {
        return Err(AppError::validation("year", "year must be between 1900 and 9999"));
    }
    Ok(year)
}

fn initial_field(text: Option<String>) -> Result<Option<i64>, AppError> {
    text.filter(|t| !t.trim().is_empty())
        .map(|t| duration_field("initial_hours", &t, false))
        .transpose()
}

fn storage(id: &str) -> impl FnOnce(StoreError) -> AppError + '_ {
    move |e| {
        error!(error = %e, paid_day_off_id = id, "Paid day off storage call failed");
        AppError::from(e)
    }
}

pub async fn add_paid_day_off<R>(
    repo: &R,
    employee_id: &str,
    input: CreatePaidDayOff,
) -> Result<PaidDayOff, AppError>
where
    R: EmployeeRepository + PaidDayOffRepository + ?Sized,
{
    let minutes = duration_field("hours", &input.hours, true)?;
    let year = check_year(input.year.unwrap_or_else(|| input.date.year()))?;
    let initial_minutes = initial_field(input.initial_hours)?;

    require_employee(repo, employee_id).await?;

    let day = repo
        .create_paid_day_off(NewPaidDayOff {
            employee_id: employee_id.to_string(),
            date: input.date,
            minutes,
            year,
            initial_minutes,
        })
        .await
        .map_err(storage("new"))?;

    info!(employee_id, paid_day_off_id = %day.id, year, "Paid day off recorded");
    Ok(day)
}

pub async fn get_paid_day_off<R: PaidDayOffRepository + ?Sized>(
    repo: &R,
    id: &str,
) -> Result<PaidDayOff, AppError> {
    repo.get_paid_day_off(id)
        .await
        .map_err(storage(id))?
        .ok_or(AppError::NotFound("Paid day off"))
}

pub async fn update_paid_day_off<R: PaidDayOffRepository + ?Sized>(
    repo: &R,
    id: &str,
    input: UpdatePaidDayOff,
) -> Result<PaidDayOff, AppError> {
    let patch = PaidDayOffPatch {
        date: input.date,
        minutes: input
            .hours
            .map(|h| duration_field("hours", &h, true))
            .transpose()?,
        year: input.year.map(check_year).transpose()?,
        initial_minutes: input.initial_hours.map(|t| initial_field(Some(t))).transpose()?,
    };
    if patch.is_empty() {
        return Err(AppError::validation("body", "No fields provided for update"));
    }

    repo.update_paid_day_off(id, patch)
        .await
        .map_err(storage(id))?
        .ok_or(AppError::NotFound("Paid day off"))
}

pub async fn delete_paid_day_off<R: PaidDayOffRepository + ?Sized>(
    repo: &R,
    id: &str,
) -> Result<(), AppError> {
    if !repo.delete_paid_day_off(id).await.map_err(storage(id))? {
        return Err(AppError::NotFound("Paid day off"));
    }
    Ok(())
}

/// Records and remaining allowance of one employee for one year.
pub async fn paid_day_off_statement<R>(
    repo: &R,
    employee_id: &str,
    year: i32,
) -> Result<PaidDayOffStatement, AppError>
where
    R: EmployeeRepository + PaidDayOffRepository + ?Sized,
{
    require_employee(repo, employee_id).await?;

    let entries = repo
        .list_paid_days_off(employee_id, Some(year))
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, year, "Failed to list paid days off");
            AppError::from(e)
        })?;

    let initial_minutes = initial_minutes_for_year(&entries);
    let balance_minutes = compute_paid_day_off_balance(initial_minutes, &entries);

    Ok(PaidDayOffStatement {
        employee_id: employee_id.to_string(),
        year,
        entries,
        initial_minutes,
        balance_minutes,
        balance: format_minutes(balance_minutes),
    })
}
