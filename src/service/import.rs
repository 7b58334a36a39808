//! Bulk employee import.
//!
//! Rows are reconciled one at a time, in file order. Each accepted registration
//! joins the known set immediately so later rows of the same file collide with it.

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::model::employee::NewEmployee;
use crate::store::{EmployeeRepository, StoreError};
use crate::utils::registration::{RegistrationIndex, sanitize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ImportRow {
    #[serde(default)]
    #[schema(example = "Maria Souza")]
    pub full_name: String,
    #[serde(default)]
    #[schema(example = "123.456-7")]
    pub registration_number: String,
    #[serde(default)]
    #[schema(example = "Analyst")]
    pub position: String,
}

impl ImportRow {
    pub fn new(full_name: &str, registration_number: &str, position: &str) -> Self {
        Self {
            full_name: full_name.to_string(),
            registration_number: registration_number.to_string(),
            position: position.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, ToSchema)]
pub enum ImportIssueReason {
    #[serde(rename = "incomplete data")]
    #[strum(serialize = "incomplete data")]
    IncompleteData,
    #[serde(rename = "registration already exists")]
    #[strum(serialize = "registration already exists")]
    RegistrationExists,
    #[serde(rename = "creation error")]
    #[strum(serialize = "creation error")]
    CreationError,
}

/// A row that was not imported.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ImportIssue {
    /// 1-based position among the parsed rows.
    #[schema(example = 2)]
    pub row: usize,
    pub full_name: String,
    /// As submitted, before sanitizing.
    pub registration_number: String,
    pub reason: ImportIssueReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[schema(example = json!({
    "total_rows": 3,
    "created": 1,
    "duplicates": [
        {"row": 2, "full_name": "B", "registration_number": "11122", "reason": "registration already exists"},
        {"row": 3, "full_name": "C", "registration_number": "333", "reason": "incomplete data"}
    ]
}))]
pub struct ImportReport {
    pub total_rows: usize,
    pub created: usize,
    pub duplicates: Vec<ImportIssue>,
}

/// Parse stage for delimited text: `full name, registration, position` per line.
///
/// Each line is read on its own, so a stray quote only costs its own line. Lines
/// with fewer than three non-empty fields are dropped here and never reach the
/// report. Fields past the third are ignored.
pub fn parse_import_text(text: &str, has_header: bool) -> Vec<ImportRow> {
    let skip = usize::from(has_header);

    let mut rows = Vec::new();
    for (line, content) in text.lines().enumerate().skip(skip) {
        let Some(record) = read_line(line, content) else {
            continue;
        };

        if record.iter().filter(|f| !f.is_empty()).count() < 3 {
            debug!(line, "Skipping import line with fewer than three fields");
            continue;
        }

        rows.push(ImportRow::new(
            record.get(0).unwrap_or_default(),
            record.get(1).unwrap_or_default(),
            record.get(2).unwrap_or_default(),
        ));
    }

    rows
}

fn read_line(line: usize, content: &str) -> Option<StringRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    match reader.records().next()? {
        Ok(record) => Some(record),
        Err(e) => {
            debug!(line, error = %e, "Skipping unreadable import line");
            None
        }
    }
}

/// Reconcile parsed rows against the roster and create the new employees.
///
/// Only the initial snapshot of existing registrations can fail the whole call;
/// after that every row is settled on its own.
#[instrument(name = "import_rows", skip_all, fields(rows = rows.len()))]
pub async fn import_rows<R: EmployeeRepository + ?Sized>(
    repo: &R,
    rows: Vec<ImportRow>,
) -> Result<ImportReport, AppError> {
    let mut known: RegistrationIndex = repo
        .registration_keys()
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load existing registrations");
            AppError::from(e)
        })?
        .into_iter()
        .collect();

    let mut report = ImportReport {
        total_rows: rows.len(),
        created: 0,
        duplicates: Vec::new(),
    };

    for (index, row) in rows.into_iter().enumerate() {
        let row_number = index + 1;
        let outcome = import_one(repo, &mut known, &row).await;

        if let Err(reason) = outcome {
            debug!(row = row_number, %reason, "Import row skipped");
            report.duplicates.push(ImportIssue {
                row: row_number,
                full_name: row.full_name,
                registration_number: row.registration_number,
                reason,
            });
        } else {
            report.created += 1;
        }
    }

    info!(
        total = report.total_rows,
        created = report.created,
        skipped = report.duplicates.len(),
        "Employee import finished"
    );
    Ok(report)
}

async fn import_one<R: EmployeeRepository + ?Sized>(
    repo: &R,
    known: &mut RegistrationIndex,
    row: &ImportRow,
) -> Result<(), ImportIssueReason> {
    let full_name = row.full_name.trim();
    let position = row.position.trim();
    let registration = sanitize(&row.registration_number);

    if full_name.is_empty() || registration.is_empty() || position.is_empty() {
        return Err(ImportIssueReason::IncompleteData);
    }

    if known.contains(&registration) {
        return Err(ImportIssueReason::RegistrationExists);
    }

    let created = repo
        .create_employee(NewEmployee {
            full_name: full_name.to_string(),
            registration_number: registration.clone(),
            position: position.to_string(),
            observations: None,
        })
        .await;

    match created {
        Ok(_) => {
            known.insert(&registration);
            Ok(())
        }
        // written by someone else since the snapshot
        Err(StoreError::UniqueViolation(_)) => {
            known.insert(&registration);
            Err(ImportIssueReason::RegistrationExists)
        }
        Err(e) => {
            warn!(error = %e, registration = %registration, "Failed to create imported employee");
            Err(ImportIssueReason::CreationError)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::model::employee::{Employee, EmployeePatch};
    use crate::service::test_support::seeded_employee;
    use crate::store::{EmployeeFilter, InMemoryStore, Page, PageRequest};

    #[actix_web::test]
    async fn sanitized_collision_within_batch_is_reported() {
        let store = InMemoryStore::new();
        let rows = vec![
            ImportRow::new("A", "111-22", "Dev"),
            ImportRow::new("B", "11122", "QA"),
        ];

        let report = import_rows(&store, rows).await.unwrap();

        assert_eq!(report.total_rows, 2);
        assert_eq!(report.created, 1);
        assert_eq!(
            report.duplicates,
            vec![ImportIssue {
                row: 2,
                full_name: "B".into(),
                registration_number: "11122".into(),
                reason: ImportIssueReason::RegistrationExists,
            }]
        );
    }

    #[actix_web::test]
    async fn incomplete_row_is_reported_and_not_created() {
        let store = InMemoryStore::new();
        let rows = vec![
            ImportRow::new("A", "1", "Dev"),
            ImportRow::new("B", "2", "QA"),
            ImportRow::new("C", "3", ""),
        ];

        let report = import_rows(&store, rows).await.unwrap();

        assert_eq!(report.created, 2);
        assert_eq!(report.duplicates.len(), 1);
        assert_eq!(report.duplicates[0].row, 3);
        assert_eq!(
            report.duplicates[0].reason,
            ImportIssueReason::IncompleteData
        );
        assert!(
            store
                .find_employee_by_registration("3")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[actix_web::test]
    async fn collides_with_pre_existing_employee() {
        let store = InMemoryStore::new();
        seeded_employee(&store, "Ana", "98765").await;

        let report = import_rows(&store, vec![ImportRow::new("Ana Clone", "98.765", "Dev")])
            .await
            .unwrap();

        assert_eq!(report.created, 0);
        assert_eq!(report.duplicates[0].registration_number, "98.765");
        assert_eq!(
            report.duplicates[0].reason,
            ImportIssueReason::RegistrationExists
        );
    }

    /// Delegates to the in-memory store but refuses to create one name.
    struct FailingOn {
        inner: InMemoryStore,
        name: &'static str,
    }

    #[async_trait]
    impl EmployeeRepository for FailingOn {
        async fn create_employee(&self, new: NewEmployee) -> Result<Employee, StoreError> {
            if new.full_name == self.name {
                return Err(StoreError::Backend("connection reset".into()));
            }
            self.inner.create_employee(new).await
        }

        async fn get_employee(&self, id: &str) -> Result<Option<Employee>, StoreError> {
            self.inner.get_employee(id).await
        }

        async fn find_employee_by_registration(
            &self,
            registration: &str,
        ) -> Result<Option<Employee>, StoreError> {
            self.inner.find_employee_by_registration(registration).await
        }

        async fn list_employees(
            &self,
            filter: &EmployeeFilter,
            page: PageRequest,
        ) -> Result<Page<Employee>, StoreError> {
            self.inner.list_employees(filter, page).await
        }

        async fn registration_keys(&self) -> Result<Vec<String>, StoreError> {
            self.inner.registration_keys().await
        }

        async fn update_employee(
            &self,
            id: &str,
            patch: EmployeePatch,
        ) -> Result<Option<Employee>, StoreError> {
            self.inner.update_employee(id, patch).await
        }

        async fn delete_employee(&self, id: &str) -> Result<bool, StoreError> {
            self.inner.delete_employee(id).await
        }
    }

    #[actix_web::test]
    async fn storage_failure_on_one_row_does_not_abort_batch() {
        let store = FailingOn {
            inner: InMemoryStore::new(),
            name: "Broken",
        };
        let rows = vec![
            ImportRow::new("A", "1", "Dev"),
            ImportRow::new("Broken", "2", "Dev"),
            ImportRow::new("C", "2", "QA"),
            ImportRow::new("D", "", "QA"),
            ImportRow::new("E", "1", "QA"),
        ];

        let report = import_rows(&store, rows).await.unwrap();

        assert_eq!(report.total_rows, 5);
        assert_eq!(report.created, 2);
        let reasons: Vec<_> = report.duplicates.iter().map(|d| (d.row, d.reason)).collect();
        assert_eq!(
            reasons,
            vec![
                (2, ImportIssueReason::CreationError),
                (4, ImportIssueReason::IncompleteData),
                (5, ImportIssueReason::RegistrationExists),
            ]
        );
        // the failed row's key was never claimed, so row 3 got it
        let c = store.find_employee_by_registration("2").await.unwrap();
        assert_eq!(c.map(|e| e.full_name).as_deref(), Some("C"));
    }

    #[test]
    fn parse_drops_short_lines_and_keeps_order() {
        let text = "Ana, 111-22 ,Dev\n\
                    just a name\n\
                    \n\
                    Bia,11122\n\
                    Caio,333,QA,extra\n\
                    Dora,,QA,note\n";

        let rows = parse_import_text(text, false);

        assert_eq!(
            rows,
            vec![
                ImportRow::new("Ana", "111-22", "Dev"),
                ImportRow::new("Caio", "333", "QA"),
                ImportRow::new("Dora", "", "QA"),
            ]
        );
    }

    #[test]
    fn parse_skips_header_and_honours_quotes() {
        let text = "name,registration,position\n\"Souza, Maria\",12.3,Analyst\n";
        let rows = parse_import_text(text, true);
        assert_eq!(rows, vec![ImportRow::new("Souza, Maria", "12.3", "Analyst")]);
    }

    #[test]
    fn unbalanced_quote_costs_only_its_own_line() {
        let text = "\"Ana,111,Dev\nBia,222,QA\nCaio,333,Ops\n";
        let rows = parse_import_text(text, false);
        assert_eq!(
            rows,
            vec![
                ImportRow::new("Bia", "222", "QA"),
                ImportRow::new("Caio", "333", "Ops"),
            ]
        );
    }

    #[test]
    fn reasons_render_as_report_text() {
        assert_eq!(
            ImportIssueReason::RegistrationExists.to_string(),
            "registration already exists"
        );
        assert_eq!(
            serde_json::to_value(ImportIssueReason::IncompleteData).unwrap(),
            serde_json::json!("incomplete data")
        );
    }

    #[actix_web::test]
    async fn parsed_text_feeds_reconciler_with_parsed_row_numbers() {
        let store = InMemoryStore::new();
        let text = "A,111-22,Dev\nnoise\nB,11122,QA\n";

        let report = import_rows(&store, parse_import_text(text, false))
            .await
            .unwrap();

        assert_eq!(report.total_rows, 2);
        assert_eq!(report.created, 1);
        assert_eq!(report.duplicates[0].row, 2);
    }
}
