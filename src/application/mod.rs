pub mod dto;
pub mod ports;
pub mod services;
pub mod triage;
pub mod validation;
