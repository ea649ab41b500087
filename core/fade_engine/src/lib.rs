pub mod channel;
pub mod config;
pub mod constants;
pub mod device_manager;
pub mod engine;
pub mod fade;
pub mod scheduler;
pub mod track;
