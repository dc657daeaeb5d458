pub mod command_service;
pub mod signal_job;
pub mod telegram_service;
