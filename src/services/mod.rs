//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación. Los
//! servicios encapsulan operaciones que pueden involucrar múltiples
//! repositorios dentro de una misma transacción.

pub mod auth_service;
pub mod authorization_service;
pub mod auto_return_service;
pub mod booking_service;
pub mod user_service;
pub mod vehicle_service;
