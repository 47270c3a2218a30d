pub mod log;
pub mod notify;
