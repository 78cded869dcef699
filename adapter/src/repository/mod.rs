pub mod email_log;
pub mod health;
pub mod memory;
pub mod reservation;
