//! Repositorios de persistencia
//!
//! Un repositorio por entidad, con queries sqlx en runtime. Las lecturas
//! reciben un `AccessScope` explícito en lugar de filtrar por estado
//! ambiental del request: el admin ve todo, un conductor solo lo suyo.

pub mod client_repository;
pub mod delivery_repository;
pub mod driver_repository;
pub mod history_repository;
pub mod route_repository;
pub mod user_repository;
pub mod vehicle_repository;

use uuid::Uuid;

/// Alcance de acceso de la identidad que consulta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    /// Administrador: sin restricciones
    Admin,
    /// Conductor vinculado: solo sus propios datos
    Driver(Uuid),
    /// Usuario autenticado sin conductor vinculado: no ve nada
    Unlinked,
}

impl AccessScope {
    pub fn is_admin(&self) -> bool {
        matches!(self, AccessScope::Admin)
    }

    /// El conductor al que está restringido el alcance, si aplica
    pub fn driver_id(&self) -> Option<Uuid> {
        match self {
            AccessScope::Driver(id) => Some(*id),
            _ => None,
        }
    }
}
