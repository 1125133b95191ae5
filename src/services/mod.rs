//! Servicios de negocio
//!
//! Aquí vive la lógica con invariantes: el motor de capacidad, los ciclos
//! de vida de entregas y rutas, la asignación de flota, los reportes y la
//! emisión de tokens. Cada operación mutante se ejecuta dentro de una
//! única transacción sqlx.

pub mod auth_service;
pub mod capacity;
pub mod delivery_lifecycle;
pub mod fleet;
pub mod report_service;
pub mod route_lifecycle;
