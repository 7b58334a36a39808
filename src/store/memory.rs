use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::{
    EmployeeFilter, EmployeeRepository, HoursBankRepository, Page, PageRequest,
    PaidDayOffRepository, PeriodFilter, PeriodRepository, StoreError, new_id,
};
use crate::model::employee::{Employee, EmployeePatch, NewEmployee};
use crate::model::hours_bank::{HoursBankEntry, NewHoursEntry};
use crate::model::paid_day_off::{NewPaidDayOff, PaidDayOff, PaidDayOffPatch};
use crate::model::period::{NewPeriod, Period, PeriodKind, PeriodPatch};

#[derive(Default)]
struct Tables {
    employees: HashMap<String, Employee>,
    hours: HashMap<String, HoursBankEntry>,
    vacations: HashMap<String, Period>,
    leaves: HashMap<String, Period>,
    paid_days_off: HashMap<String, PaidDayOff>,
}

impl Tables {
    fn periods(&self, kind: PeriodKind) -> &HashMap<String, Period> {
        match kind {
            PeriodKind::Vacation => &self.vacations,
            PeriodKind::Leave => &self.leaves,
        }
    }

    fn periods_mut(&mut self, kind: PeriodKind) -> &mut HashMap<String, Period> {
        match kind {
            PeriodKind::Vacation => &mut self.vacations,
            PeriodKind::Leave => &mut self.leaves,
        }
    }

    fn registration_taken(&self, registration: &str, except_id: Option<&str>) -> bool {
        self.employees
            .values()
            .any(|e| e.registration_number == registration && Some(e.id.as_str()) != except_id)
    }

    fn require_employee(&self, employee_id: &str) -> Result<(), StoreError> {
        if self.employees.contains_key(employee_id) {
            Ok(())
        } else {
            Err(StoreError::Backend(format!(
                "employee {employee_id} does not exist"
            )))
        }
    }
}

/// Map-backed store for local runs and tests. Enforces the same registration
/// uniqueness and cascading delete as the MySQL schema.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".into()))
    }
}

fn paginate<T>(mut items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as i64;
    let start = usize::try_from(page.offset())
        .unwrap_or(usize::MAX)
        .min(items.len());
    let end = (start + page.per_page as usize).min(items.len());
    let items = items.drain(start..end).collect();
    Page { items, total }
}

#[async_trait]
impl EmployeeRepository for InMemoryStore {
    async fn create_employee(&self, new: NewEmployee) -> Result<Employee, StoreError> {
        let mut tables = self.write()?;
        if tables.registration_taken(&new.registration_number, None) {
            return Err(StoreError::UniqueViolation(format!(
                "registration {}",
                new.registration_number
            )));
        }

        let employee = Employee {
            id: new_id(),
            full_name: new.full_name,
            registration_number: new.registration_number,
            position: new.position,
            observations: new.observations,
        };
        tables
            .employees
            .insert(employee.id.clone(), employee.clone());
        Ok(employee)
    }

    async fn get_employee(&self, id: &str) -> Result<Option<Employee>, StoreError> {
        Ok(self.read()?.employees.get(id).cloned())
    }

    async fn find_employee_by_registration(
        &self,
        registration: &str,
    ) -> Result<Option<Employee>, StoreError> {
        Ok(self
            .read()?
            .employees
            .values()
            .find(|e| e.registration_number == registration)
            .cloned())
    }

    async fn list_employees(
        &self,
        filter: &EmployeeFilter,
        page: PageRequest,
    ) -> Result<Page<Employee>, StoreError> {
        let needle = filter.search.as_deref().map(str::to_lowercase);
        let tables = self.read()?;

        let mut matching: Vec<Employee> = tables
            .employees
            .values()
            .filter(|e| match &needle {
                Some(n) => {
                    e.full_name.to_lowercase().contains(n)
                        || e.registration_number.to_lowercase().contains(n)
                }
                None => true,
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.full_name.cmp(&b.full_name).then(a.id.cmp(&b.id)));

        Ok(paginate(matching, page))
    }

    async fn registration_keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .read()?
            .employees
            .values()
            .map(|e| e.registration_number.clone())
            .collect())
    }

    async fn update_employee(
        &self,
        id: &str,
        patch: EmployeePatch,
    ) -> Result<Option<Employee>, StoreError> {
        let mut tables = self.write()?;
        if let Some(registration) = &patch.registration_number {
            if tables.registration_taken(registration, Some(id)) {
                return Err(StoreError::UniqueViolation(format!(
                    "registration {registration}"
                )));
            }
        }

        let Some(employee) = tables.employees.get_mut(id) else {
            return Ok(None);
        };
        patch.apply(employee);
        Ok(Some(employee.clone()))
    }

    async fn delete_employee(&self, id: &str) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        if tables.employees.remove(id).is_none() {
            return Ok(false);
        }

        tables.hours.retain(|_, e| e.employee_id != id);
        tables.vacations.retain(|_, p| p.employee_id != id);
        tables.leaves.retain(|_, p| p.employee_id != id);
        tables.paid_days_off.retain(|_, d| d.employee_id != id);
        Ok(true)
    }
}

#[async_trait]
impl HoursBankRepository for InMemoryStore {
    async fn create_hours_entry(&self, new: NewHoursEntry) -> Result<HoursBankEntry, StoreError> {
        let mut tables = self.write()?;
        tables.require_employee(&new.employee_id)?;

        let entry = HoursBankEntry {
            id: new_id(),
            employee_id: new.employee_id,
            month: new.month,
            year: new.year,
            minutes: new.minutes,
            description: new.description,
        };
        tables.hours.insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    async fn get_hours_entry(&self, id: &str) -> Result<Option<HoursBankEntry>, StoreError> {
        Ok(self.read()?.hours.get(id).cloned())
    }

    async fn list_hours_entries(
        &self,
        employee_id: &str,
    ) -> Result<Vec<HoursBankEntry>, StoreError> {
        let mut entries: Vec<HoursBankEntry> = self
            .read()?
            .hours
            .values()
            .filter(|e| e.employee_id == employee_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| {
            (a.year, a.month)
                .cmp(&(b.year, b.month))
                .then(a.id.cmp(&b.id))
        });
        Ok(entries)
    }

    async fn delete_hours_entry(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.write()?.hours.remove(id).is_some())
    }
}

#[async_trait]
impl PeriodRepository for InMemoryStore {
    async fn create_period(&self, kind: PeriodKind, new: NewPeriod) -> Result<Period, StoreError> {
        let mut tables = self.write()?;
        tables.require_employee(&new.employee_id)?;

        let period = Period {
            id: new_id(),
            employee_id: new.employee_id,
            start_date: new.start_date,
            end_date: new.end_date,
            status: new.status,
            notes: new.notes,
        };
        tables
            .periods_mut(kind)
            .insert(period.id.clone(), period.clone());
        Ok(period)
    }

    async fn get_period(&self, kind: PeriodKind, id: &str) -> Result<Option<Period>, StoreError> {
        Ok(self.read()?.periods(kind).get(id).cloned())
    }

    async fn list_periods(
        &self,
        kind: PeriodKind,
        filter: &PeriodFilter,
        page: PageRequest,
    ) -> Result<Page<Period>, StoreError> {
        let tables = self.read()?;
        let mut matching: Vec<Period> = tables
            .periods(kind)
            .values()
            .filter(|p| {
                filter
                    .employee_id
                    .as_deref()
                    .is_none_or(|id| p.employee_id == id)
                    && filter.status.is_none_or(|s| p.status == s)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(a.id.cmp(&b.id)));

        Ok(paginate(matching, page))
    }

    async fn update_period(
        &self,
        kind: PeriodKind,
        id: &str,
        patch: PeriodPatch,
    ) -> Result<Option<Period>, StoreError> {
        let mut tables = self.write()?;
        let Some(period) = tables.periods_mut(kind).get_mut(id) else {
            return Ok(None);
        };
        patch.apply(period);
        Ok(Some(period.clone()))
    }

    async fn delete_period(&self, kind: PeriodKind, id: &str) -> Result<bool, StoreError> {
        Ok(self.write()?.periods_mut(kind).remove(id).is_some())
    }
}

#[async_trait]
impl PaidDayOffRepository for InMemoryStore {
    async fn create_paid_day_off(&self, new: NewPaidDayOff) -> Result<PaidDayOff, StoreError> {
        let mut tables = self.write()?;
        tables.require_employee(&new.employee_id)?;

        let day = PaidDayOff {
            id: new_id(),
            employee_id: new.employee_id,
            date: new.date,
            minutes: new.minutes,
            year: new.year,
            initial_minutes: new.initial_minutes,
        };
        tables.paid_days_off.insert(day.id.clone(), day.clone());
        Ok(day)
    }

    async fn get_paid_day_off(&self, id: &str) -> Result<Option<PaidDayOff>, StoreError> {
        Ok(self.read()?.paid_days_off.get(id).cloned())
    }

    async fn list_paid_days_off(
        &self,
        employee_id: &str,
        year: Option<i32>,
    ) -> Result<Vec<PaidDayOff>, StoreError> {
        let mut days: Vec<PaidDayOff> = self
            .read()?
            .paid_days_off
            .values()
            .filter(|d| d.employee_id == employee_id && year.is_none_or(|y| d.year == y))
            .cloned()
            .collect();
        days.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(days)
    }

    async fn update_paid_day_off(
        &self,
        id: &str,
        patch: PaidDayOffPatch,
    ) -> Result<Option<PaidDayOff>, StoreError> {
        let mut tables = self.write()?;
        let Some(day) = tables.paid_days_off.get_mut(id) else {
            return Ok(None);
        };
        patch.apply(day);
        Ok(Some(day.clone()))
    }

    async fn delete_paid_day_off(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.write()?.paid_days_off.remove(id).is_some())
    }
}
