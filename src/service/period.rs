use chrono::NaiveDate;
use mockable::Clock;
use serde::Deserialize;
use tracing::{error, info};
use utoipa::ToSchema;

use super::employee::require_employee;
use super::optional_text;
use crate::error::AppError;
use crate::model::period::{NewPeriod, Period, PeriodKind, PeriodPatch, PeriodStatus};
use crate::store::{EmployeeRepository, PeriodRepository, StoreError};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePeriod {
    pub employee_id: String,
    #[schema(example = "2026-07-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-07-15", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    /// Defaults to pending. Ignored when the period has already started.
    pub status: Option<PeriodStatus>,
    pub notes: Option<String>,
}

/// Direct update. Status may be set to any value; it is not re-resolved against the date.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePeriod {
    #[schema(format = "date", value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    #[schema(format = "date", value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    pub status: Option<PeriodStatus>,
    pub notes: Option<String>,
}

/// Status a new period starts in: anything starting today or earlier is approved
/// outright, later periods keep what the caller asked for.
pub fn resolve_initial_status(
    start_date: NaiveDate,
    requested: PeriodStatus,
    today: NaiveDate,
) -> PeriodStatus {
    if start_date <= today {
        PeriodStatus::Approved
    } else {
        requested
    }
}

fn check_range(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), AppError> {
    if end_date < start_date {
        return Err(AppError::validation(
            "end_date",
            "end_date cannot be before start_date",
        ));
    }
    Ok(())
}

fn storage(kind: PeriodKind, id: &str) -> impl FnOnce(StoreError) -> AppError + '_ {
    move |e| {
        error!(error = %e, kind = %kind, period_id = id, "Period storage call failed");
        AppError::from(e)
    }
}

pub async fn create_period<R>(
    repo: &R,
    clock: &dyn Clock,
    kind: PeriodKind,
    input: CreatePeriod,
) -> Result<Period, AppError>
where
    R: EmployeeRepository + PeriodRepository + ?Sized,
{
    check_range(input.start_date, input.end_date)?;
    require_employee(repo, &input.employee_id).await?;

    let today = clock.local().date_naive();
    let status = resolve_initial_status(input.start_date, input.status.unwrap_or_default(), today);

    let period = repo
        .create_period(
            kind,
            NewPeriod {
                employee_id: input.employee_id,
                start_date: input.start_date,
                end_date: input.end_date,
                status,
                notes: optional_text(input.notes),
            },
        )
        .await
        .map_err(storage(kind, "new"))?;

    info!(kind = %kind, period_id = %period.id, status = %period.status, "Period created");
    Ok(period)
}

pub async fn get_period<R: PeriodRepository + ?Sized>(
    repo: &R,
    kind: PeriodKind,
    id: &str,
) -> Result<Period, AppError> {
    repo.get_period(kind, id)
        .await
        .map_err(storage(kind, id))?
        .ok_or(AppError::NotFound(kind.entity()))
}

pub async fn update_period<R: PeriodRepository + ?Sized>(
    repo: &R,
    kind: PeriodKind,
    id: &str,
    input: UpdatePeriod,
) -> Result<Period, AppError> {
    let patch = PeriodPatch {
        start_date: input.start_date,
        end_date: input.end_date,
        status: input.status,
        notes: input.notes.map(|n| optional_text(Some(n))),
    };
    if patch.is_empty() {
        return Err(AppError::validation("body", "No fields provided for update"));
    }

    let current = get_period(repo, kind, id).await?;
    check_range(
        patch.start_date.unwrap_or(current.start_date),
        patch.end_date.unwrap_or(current.end_date),
    )?;

    repo.update_period(kind, id, patch)
        .await
        .map_err(storage(kind, id))?
        .ok_or(AppError::NotFound(kind.entity()))
}

/// Explicit approve/reject; only pending periods move.
pub async fn decide_period<R: PeriodRepository + ?Sized>(
    repo: &R,
    kind: PeriodKind,
    id: &str,
    decision: PeriodStatus,
) -> Result<Period, AppError> {
    let current = get_period(repo, kind, id).await?;
    if current.status != PeriodStatus::Pending {
        return Err(AppError::Conflict(format!(
            "{} is already {}",
            kind.entity(),
            current.status
        )));
    }

    let patch = PeriodPatch {
        status: Some(decision),
        ..Default::default()
    };
    repo.update_period(kind, id, patch)
        .await
        .map_err(storage(kind, id))?
        .ok_or(AppError::NotFound(kind.entity()))
}

pub async fn delete_period<R: PeriodRepository + ?Sized>(
    repo: &R,
    kind: PeriodKind,
    id: &str,
) -> Result<(), AppError> {
    if !repo.delete_period(kind, id).await.map_err(storage(kind, id))? {
        return Err(AppError::NotFound(kind.entity()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::{date, fixed_clock, seeded_employee};
    use crate::store::InMemoryStore;
    use rstest::rstest;

    fn request(employee_id: &str, start: NaiveDate, end: NaiveDate) -> CreatePeriod {
        CreatePeriod {
            employee_id: employee_id.into(),
            start_date: start,
            end_date: end,
            status: None,
            notes: None,
        }
    }

    #[rstest]
    #[case(date(2026, 10, 15), PeriodStatus::Pending, PeriodStatus::Approved)]
    #[case(date(2026, 10, 16), PeriodStatus::Pending, PeriodStatus::Approved)]
    #[case(date(2026, 10, 16), PeriodStatus::Rejected, PeriodStatus::Approved)]
    #[case(date(2026, 10, 17), PeriodStatus::Pending, PeriodStatus::Pending)]
    #[case(date(2026, 10, 17), PeriodStatus::Completed, PeriodStatus::Completed)]
    fn resolves_initial_status(
        #[case] start: NaiveDate,
        #[case] requested: PeriodStatus,
        #[case] expected: PeriodStatus,
    ) {
        assert_eq!(
            resolve_initial_status(start, requested, date(2026, 10, 16)),
            expected
        );
    }

    #[actix_web::test]
    async fn vacation_starting_today_is_approved_tomorrow_is_pending() {
        let store = InMemoryStore::new();
        let clock = fixed_clock(date(2026, 10, 16));
        let ana = seeded_employee(&store, "Ana", "1").await;

        let today = create_period(
            &store,
            clock.as_ref(),
            PeriodKind::Vacation,
            request(&ana.id, date(2026, 10, 16), date(2026, 10, 20)),
        )
        .await
        .unwrap();
        assert_eq!(today.status, PeriodStatus::Approved);

        let tomorrow = create_period(
            &store,
            clock.as_ref(),
            PeriodKind::Vacation,
            request(&ana.id, date(2026, 10, 17), date(2026, 10, 20)),
        )
        .await
        .unwrap();
        assert_eq!(tomorrow.status, PeriodStatus::Pending);
    }

    #[actix_web::test]
    async fn rejects_inverted_range_and_unknown_employee() {
        let store = InMemoryStore::new();
        let clock = fixed_clock(date(2026, 10, 16));
        let ana = seeded_employee(&store, "Ana", "1").await;

        let inverted = create_period(
            &store,
            clock.as_ref(),
            PeriodKind::Leave,
            request(&ana.id, date(2026, 11, 2), date(2026, 11, 1)),
        )
        .await;
        assert!(matches!(
            inverted,
            Err(AppError::Validation {
                field: "end_date",
                ..
            })
        ));

        let orphan = create_period(
            &store,
            clock.as_ref(),
            PeriodKind::Leave,
            request("ghost", date(2026, 11, 1), date(2026, 11, 2)),
        )
        .await;
        assert!(matches!(orphan, Err(AppError::NotFound("Employee"))));
    }

    #[actix_web::test]
    async fn direct_update_allows_any_status_without_re_resolving() {
        let store = InMemoryStore::new();
        let clock = fixed_clock(date(2026, 10, 16));
        let ana = seeded_employee(&store, "Ana", "1").await;
        let past = create_period(
            &store,
            clock.as_ref(),
            PeriodKind::Leave,
            request(&ana.id, date(2026, 1, 5), date(2026, 1, 6)),
        )
        .await
        .unwrap();
        assert_eq!(past.status, PeriodStatus::Approved);

        let update = UpdatePeriod {
            status: Some(PeriodStatus::Pending),
            ..Default::default()
        };
        let updated = update_period(&store, PeriodKind::Leave, &past.id, update)
            .await
            .unwrap();
        assert_eq!(updated.status, PeriodStatus::Pending);

        let completed = UpdatePeriod {
            status: Some(PeriodStatus::Completed),
            ..Default::default()
        };
        let updated = update_period(&store, PeriodKind::Leave, &past.id, completed)
            .await
            .unwrap();
        assert_eq!(updated.status, PeriodStatus::Completed);
    }

    #[actix_web::test]
    async fn update_checks_merged_range() {
        let store = InMemoryStore::new();
        let clock = fixed_clock(date(2026, 10, 16));
        let ana = seeded_employee(&store, "Ana", "1").await;
        let period = create_period(
            &store,
            clock.as_ref(),
            PeriodKind::Vacation,
            request(&ana.id, date(2026, 12, 1), date(2026, 12, 10)),
        )
        .await
        .unwrap();

        let bad = UpdatePeriod {
            end_date: Some(date(2026, 11, 30)),
            ..Default::default()
        };
        assert!(
            update_period(&store, PeriodKind::Vacation, &period.id, bad)
                .await
                .is_err()
        );
    }

    #[actix_web::test]
    async fn approve_and_reject_only_move_pending_periods() {
        let store = InMemoryStore::new();
        let clock = fixed_clock(date(2026, 10, 16));
        let ana = seeded_employee(&store, "Ana", "1").await;
        let period = create_period(
            &store,
            clock.as_ref(),
            PeriodKind::Vacation,
            request(&ana.id, date(2026, 12, 1), date(2026, 12, 10)),
        )
        .await
        .unwrap();

        let rejected = decide_period(&store, PeriodKind::Vacation, &period.id, PeriodStatus::Rejected)
            .await
            .unwrap();
        assert_eq!(rejected.status, PeriodStatus::Rejected);

        let again =
            decide_period(&store, PeriodKind::Vacation, &period.id, PeriodStatus::Approved).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }

    #[actix_web::test]
    async fn kinds_are_stored_apart() {
        let store = InMemoryStore::new();
        let clock = fixed_clock(date(2026, 10, 16));
        let ana = seeded_employee(&store, "Ana", "1").await;
        let vacation = create_period(
            &store,
            clock.as_ref(),
            PeriodKind::Vacation,
            request(&ana.id, date(2026, 12, 1), date(2026, 12, 10)),
        )
        .await
        .unwrap();

        assert!(matches!(
            get_period(&store, PeriodKind::Leave, &vacation.id).await,
            Err(AppError::NotFound("Leave"))
        ));
        delete_period(&store, PeriodKind::Vacation, &vacation.id)
            .await
            .unwrap();
        assert!(
            get_period(&store, PeriodKind::Vacation, &vacation.id)
                .await
                .is_err()
        );
    }
}
