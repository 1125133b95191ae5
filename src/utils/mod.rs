//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y generación de códigos de rastreo.

pub mod errors;
pub mod tracking;
pub mod validation;
