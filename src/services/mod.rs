pub mod database;
pub mod uploads;
