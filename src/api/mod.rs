pub mod employee;
pub mod hours_bank;
pub mod import;
pub mod paid_day_off;
pub mod period;
pub mod time;
