pub mod employee;
pub mod hours_bank;
pub mod paid_day_off;
pub mod period;
