pub mod email_log;
pub mod reservation;
