use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One credit (positive) or debit (negative) in an employee's hours bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct HoursBankEntry {
    pub id: String,
    pub employee_id: String,
    #[schema(example = 3, minimum = 1, maximum = 12)]
    pub month: i32,
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = 480)]
    pub minutes: i64,
    #[schema(example = "Left early for appointment", nullable = true)]
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewHoursEntry {
    pub employee_id: String,
    pub month: i32,
    pub year: i32,
    pub minutes: i64,
    pub description: Option<String>,
}
