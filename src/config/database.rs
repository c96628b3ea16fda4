//! Configuración de base de datos
//!
//! Este módulo maneja la conexión y configuración de PostgreSQL con SQLx.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    /// Cota superior de espera por un lock de fila; pasado este tiempo la
    /// operación falla con 55P03 en vez de quedar colgada
    pub lock_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: std::env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set in environment variables"),
            max_connections: 20,
            min_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(3600),
            lock_timeout: Duration::from_secs(5),
        }
    }
}

impl DatabaseConfig {
    /// Crear un nuevo pool de conexiones
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        let lock_timeout_ms = self.lock_timeout.as_millis();
        let set_lock_timeout = format!("SET lock_timeout = '{}ms'", lock_timeout_ms);

        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .after_connect(move |conn, _meta| {
                let set_lock_timeout = set_lock_timeout.clone();
                Box::pin(async move {
                    sqlx::query(&set_lock_timeout).execute(conn).await?;
                    Ok(())
                })
            })
            .connect(&self.url)
            .await
    }
}
