use crate::model::hours_bank::HoursBankEntry;
use crate::model::paid_day_off::PaidDayOff;

/// Current hours-bank balance in minutes. Recomputed from the ledger on every read.
pub fn compute_hours_balance(entries: &[HoursBankEntry]) -> i64 {
    entries.iter().map(|e| e.minutes).sum()
}

/// Remaining paid-day-off allowance for one year: seed minus everything consumed.
pub fn compute_paid_day_off_balance(initial_minutes: i64, entries_for_year: &[PaidDayOff]) -> i64 {
    initial_minutes - entries_for_year.iter().map(|d| d.minutes).sum::<i64>()
}

/// Seed of a year's allowance: the earliest record carrying one, else zero.
pub fn initial_minutes_for_year(entries_for_year: &[PaidDayOff]) -> i64 {
    entries_for_year
        .iter()
        .filter(|d| d.initial_minutes.is_some())
        .min_by_key(|d| d.date)
        .and_then(|d| d.initial_minutes)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::date;

    fn entry(minutes: i64) -> HoursBankEntry {
        HoursBankEntry {
            id: format!("h{minutes}"),
            employee_id: "e1".into(),
            month: 1,
            year: 2026,
            minutes,
            description: None,
        }
    }

    fn day(d: u32, minutes: i64, initial: Option<i64>) -> PaidDayOff {
        PaidDayOff {
            id: format!("p{d}"),
            employee_id: "e1".into(),
            date: date(2026, 3, d),
            minutes,
            year: 2026,
            initial_minutes: initial,
        }
    }

    #[test]
    fn hours_balance_sums_credits_and_debits() {
        let entries = [entry(480), entry(-120), entry(60)];
        assert_eq!(compute_hours_balance(&entries), 420);
        assert_eq!(compute_hours_balance(&[]), 0);
    }

    #[test]
    fn paid_day_off_balance_subtracts_consumption_from_seed() {
        let days = [day(2, 480, None), day(9, 240, None)];
        assert_eq!(compute_paid_day_off_balance(2400, &days), 1680);
        assert_eq!(compute_paid_day_off_balance(0, &days), -720);
    }

    #[test]
    fn seed_comes_from_earliest_record_that_has_one() {
        let days = [day(20, 480, Some(999)), day(2, 480, None), day(9, 0, Some(2400))];
        assert_eq!(initial_minutes_for_year(&days), 2400);
        assert_eq!(initial_minutes_for_year(&[day(1, 60, None)]), 0);
    }
}
