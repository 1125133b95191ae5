//! Backend de gestión logística: clientes, conductores, vehículos,
//! entregas y rutas, con control de capacidad y rastreo público.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
