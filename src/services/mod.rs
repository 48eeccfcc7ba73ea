pub mod appointment_service;
pub mod user_service;
