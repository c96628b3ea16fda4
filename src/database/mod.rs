//! Acceso a base de datos
//!
//! Este módulo contiene el bootstrap del schema PostgreSQL.

pub mod schema;
