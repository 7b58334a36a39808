//! Repository ports and their two adapters.
//!
//! Handlers and services only see `dyn Store`. The concrete adapter is picked once
//! at startup from `STORAGE_BACKEND`.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use derive_more::Display;
use uuid::Uuid;

use crate::config::{Config, StorageBackend};
use crate::model::employee::{Employee, EmployeePatch, NewEmployee};
use crate::model::hours_bank::{HoursBankEntry, NewHoursEntry};
use crate::model::paid_day_off::{NewPaidDayOff, PaidDayOff, PaidDayOffPatch};
use crate::model::period::{NewPeriod, Period, PeriodKind, PeriodPatch, PeriodStatus};

pub mod memory;
pub mod mysql;

pub use memory::InMemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, Display)]
pub enum StoreError {
    /// A unique key (registration number) is already taken.
    #[display(fmt = "{} already exists", _0)]
    UniqueViolation(String),
    #[display(fmt = "{}", _0)]
    Backend(String),
}

impl std::error::Error for StoreError {}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(20).clamp(1, 100),
        }
    }

    /// Widened so the largest `?page=` cannot overflow.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    /// Substring of the full name or registration number.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PeriodFilter {
    pub employee_id: Option<String>,
    pub status: Option<PeriodStatus>,
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Fails with `UniqueViolation` when the registration key is taken.
    async fn create_employee(&self, new: NewEmployee) -> Result<Employee, StoreError>;

    async fn get_employee(&self, id: &str) -> Result<Option<Employee>, StoreError>;

    async fn find_employee_by_registration(
        &self,
        registration: &str,
    ) -> Result<Option<Employee>, StoreError>;

    async fn list_employees(
        &self,
        filter: &EmployeeFilter,
        page: PageRequest,
    ) -> Result<Page<Employee>, StoreError>;

    /// Every persisted registration key, for seeding an import.
    async fn registration_keys(&self) -> Result<Vec<String>, StoreError>;

    async fn update_employee(
        &self,
        id: &str,
        patch: EmployeePatch,
    ) -> Result<Option<Employee>, StoreError>;

    /// Removes the employee and every dependent record. Returns false if absent.
    async fn delete_employee(&self, id: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait HoursBankRepository: Send + Sync {
    async fn create_hours_entry(&self, new: NewHoursEntry) -> Result<HoursBankEntry, StoreError>;

    async fn get_hours_entry(&self, id: &str) -> Result<Option<HoursBankEntry>, StoreError>;

    /// Chronological (year, month) order.
    async fn list_hours_entries(&self, employee_id: &str)
    -> Result<Vec<HoursBankEntry>, StoreError>;

    async fn delete_hours_entry(&self, id: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait PeriodRepository: Send + Sync {
    async fn create_period(&self, kind: PeriodKind, new: NewPeriod) -> Result<Period, StoreError>;

    async fn get_period(&self, kind: PeriodKind, id: &str) -> Result<Option<Period>, StoreError>;

    /// Newest start date first.
    async fn list_periods(
        &self,
        kind: PeriodKind,
        filter: &PeriodFilter,
        page: PageRequest,
    ) -> Result<Page<Period>, StoreError>;

    async fn update_period(
        &self,
        kind: PeriodKind,
        id: &str,
        patch: PeriodPatch,
    ) -> Result<Option<Period>, StoreError>;

    async fn delete_period(&self, kind: PeriodKind, id: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait PaidDayOffRepository: Send + Sync {
    async fn create_paid_day_off(&self, new: NewPaidDayOff) -> Result<PaidDayOff, StoreError>;

    async fn get_paid_day_off(&self, id: &str) -> Result<Option<PaidDayOff>, StoreError>;

    /// Ordered by date.
    async fn list_paid_days_off(
        &self,
        employee_id: &str,
        year: Option<i32>,
    ) -> Result<Vec<PaidDayOff>, StoreError>;

    async fn update_paid_day_off(
        &self,
        id: &str,
        patch: PaidDayOffPatch,
    ) -> Result<Option<PaidDayOff>, StoreError>;

    async fn delete_paid_day_off(&self, id: &str) -> Result<bool, StoreError>;
}

/// Everything the HTTP layer needs from persistence.
pub trait Store:
    EmployeeRepository + HoursBankRepository + PeriodRepository + PaidDayOffRepository
{
}

impl<T> Store for T where
    T: EmployeeRepository + HoursBankRepository + PeriodRepository + PaidDayOffRepository
{
}

/// Build the adapter named by the configuration.
pub async fn connect(config: &Config) -> anyhow::Result<Arc<dyn Store>> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory store");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StorageBackend::Mysql => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set when STORAGE_BACKEND=mysql")?;
            let pool = crate::db::init_db(url).await?;
            tracing::info!("Using MySQL store");
            Ok(Arc::new(MySqlStore::new(pool)))
        }
    }
}
