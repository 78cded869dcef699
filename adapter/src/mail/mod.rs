pub mod gmail;
pub mod log;
pub mod template;
