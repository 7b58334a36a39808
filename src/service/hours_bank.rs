use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;

use super::balance::compute_hours_balance;
use super::employee::require_employee;
use super::{duration_field, optional_text};
use crate::error::AppError;
use crate::model::hours_bank::{HoursBankEntry, NewHoursEntry};
use crate::store::{EmployeeRepository, HoursBankRepository};
use crate::utils::time_text::format_minutes;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateHoursEntry {
    #[schema(example = 3)]
    pub month: i32,
    #[schema(example = 2026)]
    pub year: i32,
    /// "HH:MM" credit or "-HH:MM" debit.
    #[schema(example = "-01:30")]
    pub hours: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HoursStatement {
    pub employee_id: String,
    pub entries: Vec<HoursBankEntry>,
    #[schema(example = 420)]
    pub balance_minutes: i64,
    #[schema(example = "07:00")]
    pub balance: String,
}

pub async fn add_hours_entry<R>(
    repo: &R,
    employee_id: &str,
    input: CreateHoursEntry,
) -> Result<HoursBankEntry, AppError>
where
    R: EmployeeRepository + HoursBankRepository + ?Sized,
{
    if !(1..=12).contains(&input.month) {
        return Err(AppError::validation("month", "month must be between 1 and 12"));
    }
    if !(1900..=9999).contains(&input.year) {
        return Err(AppError::validation("year", "year must be between 1900 and 9999"));
    }
    let minutes = duration_field("hours", &input.hours, true)?;

    require_employee(repo, employee_id).await?;

    let entry = repo
        .create_hours_entry(NewHoursEntry {
            employee_id: employee_id.to_string(),
            month: input.month,
            year: input.year,
            minutes,
            description: optional_text(input.description),
        })
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to create hours bank entry");
            AppError::from(e)
        })?;

    info!(employee_id, entry_id = %entry.id, minutes, "Hours bank entry recorded");
    Ok(entry)
}

pub async fn hours_statement<R>(repo: &R, employee_id: &str) -> Result<HoursStatement, AppError>
where
    R: EmployeeRepository + HoursBankRepository + ?Sized,
{
    require_employee(repo, employee_id).await?;

    let entries = repo.list_hours_entries(employee_id).await.map_err(|e| {
        error!(error = %e, employee_id, "Failed to list hours bank entries");
        AppError::from(e)
    })?;
    let balance_minutes = compute_hours_balance(&entries);

    Ok(HoursStatement {
        employee_id: employee_id.to_string(),
        entries,
        balance_minutes,
        balance: format_minutes(balance_minutes),
    })
}

pub async fn get_hours_entry<R: HoursBankRepository + ?Sized>(
    repo: &R,
    id: &str,
) -> Result<HoursBankEntry, AppError> {
    repo.get_hours_entry(id)
        .await
        .map_err(|e| {
            error!(error = %e, entry_id = id, "Failed to fetch hours bank entry");
            AppError::from(e)
        })?
        .ok_or(AppError::NotFound("Hours bank entry"))
}

/// Entries are immutable; removing one is the only correction.
pub async fn delete_hours_entry<R: HoursBankRepository + ?Sized>(
    repo: &R,
    id: &str,
) -> Result<(), AppError> {
    let deleted = repo.delete_hours_entry(id).await.map_err(|e| {
        error!(error = %e, entry_id = id, "Failed to delete hours bank entry");
        AppError::from(e)
    })?;

    if !deleted {
        return Err(AppError::NotFound("Hours bank entry"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::seeded_employee;
    use crate::store::InMemoryStore;

    fn form(month: i32, hours: &str) -> CreateHoursEntry {
        CreateHoursEntry {
            month,
            year: 2026,
            hours: hours.into(),
            description: None,
        }
    }

    #[actix_web::test]
    async fn statement_balances_the_ledger() {
        let store = InMemoryStore::new();
        let ana = seeded_employee(&store, "Ana", "1").await;

        for (month, hours) in [(1, "08:00"), (2, "-02:00"), (3, "1:00")] {
            add_hours_entry(&store, &ana.id, form(month, hours))
                .await
                .unwrap();
        }

        let statement = hours_statement(&store, &ana.id).await.unwrap();
        assert_eq!(statement.entries.len(), 3);
        assert_eq!(statement.balance_minutes, 420);
        assert_eq!(statement.balance, "07:00");
    }

    #[actix_web::test]
    async fn rejects_bad_month_and_malformed_hours() {
        let store = InMemoryStore::new();
        let ana = seeded_employee(&store, "Ana", "1").await;

        assert!(matches!(
            add_hours_entry(&store, &ana.id, form(13, "01:00")).await,
            Err(AppError::Validation { field: "month", .. })
        ));
        assert!(matches!(
            add_hours_entry(&store, &ana.id, form(1, "0100")).await,
            Err(AppError::Validation { field: "hours", .. })
        ));
        assert!(hours_statement(&store, &ana.id).await.unwrap().entries.is_empty());
    }

    #[actix_web::test]
    async fn unknown_employee_and_entry_are_not_found() {
        let store = InMemoryStore::new();
        assert!(matches!(
            add_hours_entry(&store, "ghost", form(1, "01:00")).await,
            Err(AppError::NotFound("Employee"))
        ));
        assert!(matches!(
            delete_hours_entry(&store, "ghost").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn deleted_entry_can_no_longer_be_fetched() {
        let store = InMemoryStore::new();
        let ana = seeded_employee(&store, "Ana", "1").await;
        let entry = add_hours_entry(&store, &ana.id, form(4, "00:45"))
            .await
            .unwrap();

        assert_eq!(get_hours_entry(&store, &entry.id).await.unwrap().minutes, 45);
        delete_hours_entry(&store, &entry.id).await.unwrap();
        assert!(matches!(
            get_hours_entry(&store, &entry.id).await,
            Err(AppError::NotFound("Hours bank entry"))
        ));
    }
}
