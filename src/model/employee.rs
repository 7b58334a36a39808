use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": "6f1c2a9e-3b7d-4e55-9a41-0c2f8f1b7d10",
        "full_name": "Maria Souza",
        "registration_number": "1234567",
        "position": "Analyst",
        "observations": "Part-time until March"
    })
)]
pub struct Employee {
    #[schema(example = "6f1c2a9e-3b7d-4e55-9a41-0c2f8f1b7d10")]
    pub id: String,

    #[schema(example = "Maria Souza")]
    pub full_name: String,

    /// Canonical registration key (no spaces, periods or hyphens).
    #[schema(example = "1234567")]
    pub registration_number: String,

    #[schema(example = "Analyst")]
    pub position: String,

    #[schema(example = "Part-time until March", nullable = true)]
    pub observations: Option<String>,
}

/// Insert payload; `registration_number` is expected to be sanitized already.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub full_name: String,
    pub registration_number: String,
    pub position: String,
    pub observations: Option<String>,
}

/// Partial update. `observations: Some(None)` clears the field.
#[derive(Debug, Clone, Default)]
pub struct EmployeePatch {
    pub full_name: Option<String>,
    pub registration_number: Option<String>,
    pub position: Option<String>,
    pub observations: Option<Option<String>>,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.registration_number.is_none()
            && self.position.is_none()
            && self.observations.is_none()
    }

    pub fn apply(self, employee: &mut Employee) {
        if let Some(v) = self.full_name {
            employee.full_name = v;
        }
        if let Some(v) = self.registration_number {
            employee.registration_number = v;
        }
        if let Some(v) = self.position {
            employee.position = v;
        }
        if let Some(v) = self.observations {
            employee.observations = v;
        }
    }
}
