pub mod db_utils;
pub mod registration;
pub mod time_text;
