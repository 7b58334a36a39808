use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Vacation and leave periods share one shape but live in separate tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PeriodKind {
    Vacation,
    Leave,
}

impl PeriodKind {
    pub fn table(&self) -> &'static str {
        match self {
            PeriodKind::Vacation => "vacations",
            PeriodKind::Leave => "leaves",
        }
    }

    /// Name used in not-found errors.
    pub fn entity(&self) -> &'static str {
        match self {
            PeriodKind::Vacation => "Vacation",
            PeriodKind::Leave => "Leave",
        }
    }
}

/// No transition between these is forbidden; see `PeriodPatch`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PeriodStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "0b8d0e2c-5f0a-4b8e-9c55-2d7c6b1a9f03",
    "employee_id": "6f1c2a9e-3b7d-4e55-9a41-0c2f8f1b7d10",
    "start_date": "2026-07-01",
    "end_date": "2026-07-15",
    "status": "pending",
    "notes": null
}))]
pub struct Period {
    pub id: String,
    pub employee_id: String,
    #[schema(example = "2026-07-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-07-15", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub status: PeriodStatus,
    #[schema(nullable = true)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPeriod {
    pub employee_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PeriodStatus,
    pub notes: Option<String>,
}

/// Direct update; any status may be written over any other.
#[derive(Debug, Clone, Default)]
pub struct PeriodPatch {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<PeriodStatus>,
    pub notes: Option<Option<String>>,
}

impl PeriodPatch {
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.status.is_none()
            && self.notes.is_none()
    }

    pub fn apply(self, period: &mut Period) {
        if let Some(v) = self.start_date {
            period.start_date = v;
        }
        if let Some(v) = self.end_date {
            period.end_date = v;
        }
        if let Some(v) = self.status {
            period.status = v;
        }
        if let Some(v) = self.notes {
            period.notes = v;
        }
    }
}
