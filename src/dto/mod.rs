//! DTOs de la API
//!
//! Requests de entrada (con derives de validator) y responses de salida.

pub mod auth_dto;
pub mod client_dto;
pub mod common;
pub mod delivery_dto;
pub mod driver_dto;
pub mod report_dto;
pub mod route_dto;
pub mod vehicle_dto;
