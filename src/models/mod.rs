//! Modelos del sistema
//!
//! Este módulo contiene los structs que mapean exactamente al schema
//! PostgreSQL y los enums de estado con sus tokens snake_case.

pub mod client;
pub mod delivery;
pub mod driver;
pub mod history;
pub mod route;
pub mod user;
pub mod vehicle;
