use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PaidDayOff {
    pub id: String,
    pub employee_id: String,
    #[schema(example = "2026-02-16", format = "date", value_type = String)]
    pub date: NaiveDate,
    /// Minutes consumed (positive) or granted back (negative) against the yearly allowance.
    #[schema(example = 480)]
    pub minutes: i64,
    #[schema(example = 2026)]
    pub year: i32,
    /// Seed balance for `year`, in minutes.
    #[schema(example = 2400, nullable = true)]
    pub initial_minutes: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewPaidDayOff {
    pub employee_id: String,
    pub date: NaiveDate,
    pub minutes: i64,
    pub year: i32,
    pub initial_minutes: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct PaidDayOffPatch {
    pub date: Option<NaiveDate>,
    pub minutes: Option<i64>,
    pub year: Option<i32>,
    pub initial_minutes: Option<Option<i64>>,
}

impl PaidDayOffPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.minutes.is_none()
            && self.year.is_none()
            && self.initial_minutes.is_none()
    }

    pub fn apply(self, day: &mut PaidDayOff) {
        if let Some(v) = self.date {
            day.date = v;
        }
        if let Some(v) = self.minutes {
            day.minutes = v;
        }
        if let Some(v) = self.year {
            day.year = v;
        }
        if let Some(v) = self.initial_minutes {
            day.initial_minutes = v;
        }
    }
}
