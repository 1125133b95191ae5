//! Controladores HTTP
//!
//! Validan la request, resuelven permisos con el usuario autenticado y
//! delegan en repositorios y servicios.

pub mod auth_controller;
pub mod client_controller;
pub mod delivery_controller;
pub mod driver_controller;
pub mod report_controller;
pub mod route_controller;
pub mod vehicle_controller;
