use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures_util::StreamExt;
use sqlx::MySqlPool;
use tracing::{debug, error};

use super::{
    EmployeeFilter, EmployeeRepository, HoursBankRepository, Page, PageRequest,
    PaidDayOffRepository, PeriodFilter, PeriodRepository, StoreError, new_id,
};
use crate::model::employee::{Employee, EmployeePatch, NewEmployee};
use crate::model::hours_bank::{HoursBankEntry, NewHoursEntry};
use crate::model::paid_day_off::{NewPaidDayOff, PaidDayOff, PaidDayOffPatch};
use crate::model::period::{NewPeriod, Period, PeriodKind, PeriodPatch, PeriodStatus};
use crate::utils::db_utils::{UpdateBuilder, execute_update};

const EMPLOYEE_COLUMNS: &str = "id, full_name, registration_number, position, observations";
const HOURS_COLUMNS: &str = "id, employee_id, month, year, minutes, description";
const PERIOD_COLUMNS: &str = "id, employee_id, start_date, end_date, status, notes";
const PAID_DAY_OFF_COLUMNS: &str = "id, employee_id, date, minutes, year, initial_minutes";

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn is_duplicate_key(e: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = e {
        return db_err.code().as_deref() == Some("23000") && db_err.message().contains("Duplicate");
    }
    false
}

fn registration_error(e: sqlx::Error, registration: &str) -> StoreError {
    if is_duplicate_key(&e) {
        StoreError::UniqueViolation(format!("registration {registration}"))
    } else {
        backend(e)
    }
}

#[derive(sqlx::FromRow)]
struct PeriodRow {
    id: String,
    employee_id: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: String,
    notes: Option<String>,
}

impl TryFrom<PeriodRow> for Period {
    type Error = StoreError;

    fn try_from(row: PeriodRow) -> Result<Self, Self::Error> {
        let status = PeriodStatus::from_str(&row.status)
            .map_err(|_| StoreError::Backend(format!("unknown period status '{}'", row.status)))?;

        Ok(Period {
            id: row.id,
            employee_id: row.employee_id,
            start_date: row.start_date,
            end_date: row.end_date,
            status,
            notes: row.notes,
        })
    }
}

#[async_trait]
impl EmployeeRepository for MySqlStore {
    async fn create_employee(&self, new: NewEmployee) -> Result<Employee, StoreError> {
        let id = new_id();

        sqlx::query(
            r#"
            INSERT INTO employees
            (id, full_name, registration_number, position, observations)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&new.full_name)
        .bind(&new.registration_number)
        .bind(&new.position)
        .bind(&new.observations)
        .execute(&self.pool)
        .await
        .map_err(|e| registration_error(e, &new.registration_number))?;

        Ok(Employee {
            id,
            full_name: new.full_name,
            registration_number: new.registration_number,
            position: new.position,
            observations: new.observations,
        })
    }

    async fn get_employee(&self, id: &str) -> Result<Option<Employee>, StoreError> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?");
        sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)
    }

    async fn find_employee_by_registration(
        &self,
        registration: &str,
    ) -> Result<Option<Employee>, StoreError> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE registration_number = ?");
        sqlx::query_as::<_, Employee>(&sql)
            .bind(registration)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)
    }

    async fn list_employees(
        &self,
        filter: &EmployeeFilter,
        page: PageRequest,
    ) -> Result<Page<Employee>, StoreError> {
        // ---------- build WHERE clause dynamically ----------
        let mut where_clause = String::new();
        let mut bindings: Vec<String> = Vec::new();

        if let Some(search) = &filter.search {
            where_clause.push_str("WHERE (full_name LIKE ? OR registration_number LIKE ?)");
            let like = format!("%{}%", search);
            bindings.push(like.clone());
            bindings.push(like);
        }

        // ---------- total count ----------
        let count_sql = format!("SELECT COUNT(*) FROM employees {}", where_clause);
        debug!(sql = %count_sql, bindings = ?bindings, "Counting employees");

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for b in &bindings {
            count_query = count_query.bind(b);
        }
        let total = count_query.fetch_one(&self.pool).await.map_err(backend)?;

        // ---------- data query ----------
        let data_sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees {} ORDER BY full_name, id LIMIT ? OFFSET ?",
            where_clause
        );
        let mut data_query = sqlx::query_as::<_, Employee>(&data_sql);
        for b in &bindings {
            data_query = data_query.bind(b);
        }
        let items = data_query
            .bind(page.per_page as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        Ok(Page { items, total })
    }

    async fn registration_keys(&self) -> Result<Vec<String>, StoreError> {
        let mut stream = sqlx::query_as::<_, (String,)>("SELECT registration_number FROM employees")
            .fetch(&self.pool);

        let mut keys = Vec::new();
        while let Some(row) = stream.next().await {
            let (key,) = row.map_err(backend)?;
            keys.push(key);
        }

        debug!(count = keys.len(), "Loaded registration keys");
        Ok(keys)
    }

    async fn update_employee(
        &self,
        id: &str,
        patch: EmployeePatch,
    ) -> Result<Option<Employee>, StoreError> {
        let registration = patch.registration_number.clone();
        let update = UpdateBuilder::new()
            .set("full_name", patch.full_name)
            .set("registration_number", patch.registration_number)
            .set("position", patch.position)
            .set("observations", patch.observations)
            .build("employees", "id", id);

        if let Some(update) = update {
            execute_update(&self.pool, update).await.map_err(|e| {
                registration_error(e, registration.as_deref().unwrap_or_default())
            })?;
        }

        // affected-row counts are zero for no-op updates on MySQL, so re-read
        self.get_employee(id).await
    }

    async fn delete_employee(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, employee_id = id, "Failed to delete employee");
                backend(e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl HoursBankRepository for MySqlStore {
    async fn create_hours_entry(&self, new: NewHoursEntry) -> Result<HoursBankEntry, StoreError> {
        let id = new_id();

        sqlx::query(
            r#"
            INSERT INTO hours_bank_entries
            (id, employee_id, month, year, minutes, description)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&new.employee_id)
        .bind(new.month)
        .bind(new.year)
        .bind(new.minutes)
        .bind(&new.description)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(HoursBankEntry {
            id,
            employee_id: new.employee_id,
            month: new.month,
            year: new.year,
            minutes: new.minutes,
            description: new.description,
        })
    }

    async fn get_hours_entry(&self, id: &str) -> Result<Option<HoursBankEntry>, StoreError> {
        let sql = format!("SELECT {HOURS_COLUMNS} FROM hours_bank_entries WHERE id = ?");
        sqlx::query_as::<_, HoursBankEntry>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)
    }

    async fn list_hours_entries(
        &self,
        employee_id: &str,
    ) -> Result<Vec<HoursBankEntry>, StoreError> {
        let sql = format!(
            "SELECT {HOURS_COLUMNS} FROM hours_bank_entries WHERE employee_id = ? ORDER BY year, month, id"
        );
        sqlx::query_as::<_, HoursBankEntry>(&sql)
            .bind(employee_id)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)
    }

    async fn delete_hours_entry(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM hours_bank_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PeriodRepository for MySqlStore {
    async fn create_period(&self, kind: PeriodKind, new: NewPeriod) -> Result<Period, StoreError> {
        let id = new_id();
        let sql = format!(
            "INSERT INTO {} ({PERIOD_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?)",
            kind.table()
        );

        sqlx::query(&sql)
            .bind(&id)
            .bind(&new.employee_id)
            .bind(new.start_date)
            .bind(new.end_date)
            .bind(new.status.to_string())
            .bind(&new.notes)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        Ok(Period {
            id,
            employee_id: new.employee_id,
            start_date: new.start_date,
            end_date: new.end_date,
            status: new.status,
            notes: new.notes,
        })
    }

    async fn get_period(&self, kind: PeriodKind, id: &str) -> Result<Option<Period>, StoreError> {
        let sql = format!("SELECT {PERIOD_COLUMNS} FROM {} WHERE id = ?", kind.table());
        sqlx::query_as::<_, PeriodRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?
            .map(Period::try_from)
            .transpose()
    }

    async fn list_periods(
        &self,
        kind: PeriodKind,
        filter: &PeriodFilter,
        page: PageRequest,
    ) -> Result<Page<Period>, StoreError> {
        let mut where_sql = String::from(" WHERE 1=1");
        let mut args: Vec<&str> = Vec::new();

        if let Some(employee_id) = filter.employee_id.as_deref() {
            where_sql.push_str(" AND employee_id = ?");
            args.push(employee_id);
        }

        if let Some(status) = filter.status.as_ref() {
            where_sql.push_str(" AND status = ?");
            args.push(status.as_ref());
        }

        let count_sql = format!("SELECT COUNT(*) FROM {}{}", kind.table(), where_sql);
        let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
        for arg in &args {
            count_q = count_q.bind(*arg);
        }
        let total = count_q.fetch_one(&self.pool).await.map_err(backend)?;

        let data_sql = format!(
            r#"
            SELECT {PERIOD_COLUMNS}
            FROM {}
            {}
            ORDER BY start_date DESC, id
            LIMIT ? OFFSET ?
            "#,
            kind.table(),
            where_sql
        );
        let mut data_q = sqlx::query_as::<_, PeriodRow>(&data_sql);
        for arg in args {
            data_q = data_q.bind(arg);
        }
        let rows = data_q
            .bind(page.per_page as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;

        let items = rows
            .into_iter()
            .map(Period::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page { items, total })
    }

    async fn update_period(
        &self,
        kind: PeriodKind,
        id: &str,
        patch: PeriodPatch,
    ) -> Result<Option<Period>, StoreError> {
        let update = UpdateBuilder::new()
            .set("start_date", patch.start_date)
            .set("end_date", patch.end_date)
            .set("status", patch.status.map(|s| s.to_string()))
            .set("notes", patch.notes)
            .build(kind.table(), "id", id);

        if let Some(update) = update {
            execute_update(&self.pool, update).await.map_err(backend)?;
        }

        self.get_period(kind, id).await
    }

    async fn delete_period(&self, kind: PeriodKind, id: &str) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", kind.table());
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PaidDayOffRepository for MySqlStore {
    async fn create_paid_day_off(&self, new: NewPaidDayOff) -> Result<PaidDayOff, StoreError> {
        let id = new_id();

        sqlx::query(
            r#"
            INSERT INTO paid_days_off
            (id, employee_id, date, minutes, year, initial_minutes)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&new.employee_id)
        .bind(new.date)
        .bind(new.minutes)
        .bind(new.year)
        .bind(new.initial_minutes)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(PaidDayOff {
            id,
            employee_id: new.employee_id,
            date: new.date,
            minutes: new.minutes,
            year: new.year,
            initial_minutes: new.initial_minutes,
        })
    }

    async fn get_paid_day_off(&self, id: &str) -> Result<Option<PaidDayOff>, StoreError> {
        let sql = format!("SELECT {PAID_DAY_OFF_COLUMNS} FROM paid_days_off WHERE id = ?");
        sqlx::query_as::<_, PaidDayOff>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)
    }

    async fn list_paid_days_off(
        &self,
        employee_id: &str,
        year: Option<i32>,
    ) -> Result<Vec<PaidDayOff>, StoreError> {
        let year_clause = if year.is_some() { " AND year = ?" } else { "" };
        let sql = format!(
            "SELECT {PAID_DAY_OFF_COLUMNS} FROM paid_days_off WHERE employee_id = ?{year_clause} ORDER BY date, id"
        );

        let mut query = sqlx::query_as::<_, PaidDayOff>(&sql).bind(employee_id);
        if let Some(year) = year {
            query = query.bind(year);
        }

        query.fetch_all(&self.pool).await.map_err(backend)
    }

    async fn update_paid_day_off(
        &self,
        id: &str,
        patch: PaidDayOffPatch,
    ) -> Result<Option<PaidDayOff>, StoreError> {
        let update = UpdateBuilder::new()
            .set("date", patch.date)
            .set("minutes", patch.minutes)
            .set("year", patch.year)
            .set("initial_minutes", patch.initial_minutes)
            .build("paid_days_off", "id", id);

        if let Some(update) = update {
            execute_update(&self.pool, update).await.map_err(backend)?;
        }

        self.get_paid_day_off(id).await
    }

    async fn delete_paid_day_off(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM paid_days_off WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        Ok(result.rows_affected() > 0)
    }
}
