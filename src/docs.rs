use crate::api::employee::{EmployeeListResponse, EmployeeQuery};
use crate::api::import::{ImportRequest, ImportTextRequest};
use crate::api::paid_day_off::StatementQuery;
use crate::api::period::{PeriodListResponse, PeriodQuery};
use crate::api::time::{FormattedTime, ParsedTime};
use crate::model::employee::Employee;
use crate::model::hours_bank::HoursBankEntry;
use crate::model::paid_day_off::PaidDayOff;
use crate::model::period::{Period, PeriodKind, PeriodStatus};
use crate::service::employee::{CreateEmployee, UpdateEmployee};
use crate::service::hours_bank::{CreateHoursEntry, HoursStatement};
use crate::service::import::{ImportIssue, ImportIssueReason, ImportReport, ImportRow};
use crate::service::paid_day_off::{CreatePaidDayOff, PaidDayOffStatement, UpdatePaidDayOff};
use crate::service::period::{CreatePeriod, UpdatePeriod};
use utoipa::{Modify, OpenApi, openapi};

const VACATIONS: &str = "/api/vacations";
const LEAVES: &str = "/api/leaves";

/// `/api/leaves` runs the same handlers as `/api/vacations`; copy those paths
/// over with distinct operation ids.
struct LeavePaths;

impl Modify for LeavePaths {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let leaves: Vec<(String, openapi::PathItem)> = openapi
            .paths
            .paths
            .iter()
            .filter_map(|(path, item)| {
                let rest = path.strip_prefix(VACATIONS)?;
                let mut item = item.clone();
                for operation in item.operations.values_mut() {
                    if let Some(id) = operation.operation_id.take() {
                        operation.operation_id = Some(format!("{id}_leave"));
                    }
                }
                Some((format!("{LEAVES}{rest}"), item))
            })
            .collect();

        openapi.paths.paths.extend(leaves);
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Records API",
        version = "1.0.0",
        description = r#"
## HR Record Keeping

Back office API for a small HR department.

### 🔹 Key Features
- **Employees**
  - Roster with unique, sanitized registration numbers
- **Hours Bank**
  - Monthly credits and debits in `HH:MM`, with a running balance
- **Vacations and Leaves**
  - Periods that start today or earlier are approved on creation
- **Paid Days Off**
  - Yearly allowance seeded on a record, minus what was taken
- **Bulk Import**
  - Delimited text or parsed rows, with a per-row report of what was skipped

### 📦 Response Format
- JSON-based RESTful responses
- Durations are exchanged as `HH:MM` text and stored as minutes
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::hours_bank::hours_statement,
        crate::api::hours_bank::add_hours_entry,
        crate::api::hours_bank::get_hours_entry,
        crate::api::hours_bank::delete_hours_entry,

        crate::api::period::list_periods,
        crate::api::period::create_period,
        crate::api::period::get_period,
        crate::api::period::update_period,
        crate::api::period::delete_period,
        crate::api::period::approve_period,
        crate::api::period::reject_period,

        crate::api::paid_day_off::paid_day_off_statement,
        crate::api::paid_day_off::add_paid_day_off,
        crate::api::paid_day_off::get_paid_day_off,
        crate::api::paid_day_off::update_paid_day_off,
        crate::api::paid_day_off::delete_paid_day_off,

        crate::api::import::import_employees,
        crate::api::import::import_employees_text,

        crate::api::time::parse_time,
        crate::api::time::format_time
    ),
    components(
        schemas(
            Employee,
            EmployeeQuery,
            EmployeeListResponse,
            CreateEmployee,
            UpdateEmployee,
            HoursBankEntry,
            CreateHoursEntry,
            HoursStatement,
            Period,
            PeriodKind,
            PeriodStatus,
            PeriodQuery,
            PeriodListResponse,
            CreatePeriod,
            UpdatePeriod,
            PaidDayOff,
            StatementQuery,
            CreatePaidDayOff,
            UpdatePaidDayOff,
            PaidDayOffStatement,
            ImportRow,
            ImportRequest,
            ImportTextRequest,
            ImportIssue,
            ImportIssueReason,
            ImportReport,
            ParsedTime,
            FormattedTime
        )
    ),
    modifiers(&LeavePaths),
    tags(
        (name = "Employee", description = "Employee roster APIs"),
        (name = "Hours Bank", description = "Overtime and time-owed ledger APIs"),
        (name = "Period", description = "Vacation and leave APIs, served under /api/vacations and /api/leaves"),
        (name = "Paid Day Off", description = "Paid day off allowance APIs"),
        (name = "Import", description = "Bulk employee import APIs"),
        (name = "Time", description = "HH:MM conversion helpers"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scope_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/employees/{employee_id}",
            "/api/employees/{employee_id}/hours",
            "/api/vacations/{period_id}/approve",
            "/api/leaves",
            "/api/leaves/{period_id}/reject",
            "/api/paid-days-off/{paid_day_off_id}",
            "/api/import/employees/text",
            "/api/time/format",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        assert!(doc.paths.paths.keys().all(|p| !p.contains("{kind}")));
    }

    #[test]
    fn leave_operations_get_their_own_ids() {
        let doc = ApiDoc::openapi();
        let ids = |path: &str| -> Vec<String> {
            doc.paths.paths[path]
                .operations
                .values()
                .filter_map(|op| op.operation_id.clone())
                .collect()
        };
        assert_eq!(ids("/api/vacations/{period_id}/approve"), ["approve_period"]);
        assert_eq!(ids("/api/leaves/{period_id}/approve"), ["approve_period_leave"]);
    }
}
