//! Repositorio de vehículos
//!
//! CRUD de vehículos más el ledger de disponibilidad: try_reserve,
//! mark_booked y release se ejecutan dentro de una transacción provista
//! por el caller y son la única escritura de availability_status.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::vehicle::{Vehicle, VehicleCategory};
use crate::utils::errors::{not_found_error, AppError};

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        vehicle_name: String,
        category: VehicleCategory,
        registration_number: String,
        daily_rent_price: Decimal,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, vehicle_name, type, registration_number, daily_rent_price, availability_status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, 'available', NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(vehicle_name)
        .bind(category)
        .bind(registration_number)
        .bind(daily_rent_price)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn list(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(vehicles)
    }

    pub async fn registration_number_exists(
        &self,
        registration_number: &str,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM vehicles WHERE registration_number = $1)",
        )
        .bind(registration_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn update(
        &self,
        id: Uuid,
        vehicle_name: Option<String>,
        category: Option<VehicleCategory>,
        registration_number: Option<String>,
        daily_rent_price: Option<Decimal>,
    ) -> Result<Vehicle, AppError> {
        // Obtener vehículo actual para mezclar los campos omitidos
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET vehicle_name = $2, type = $3, registration_number = $4, daily_rent_price = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(vehicle_name.unwrap_or(current.vehicle_name))
        .bind(category.unwrap_or(current.category))
        .bind(registration_number.unwrap_or(current.registration_number))
        .bind(daily_rent_price.unwrap_or(current.daily_rent_price))
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }

        Ok(())
    }

    /// Intentar reservar un vehículo: toma un lock exclusivo de fila y
    /// devuelve el vehículo solo si sigue disponible. El check y el lock son
    /// atómicos frente a cualquier otro reservador concurrente.
    pub async fn try_reserve(
        tx: &mut Transaction<'_, Postgres>,
        vehicle_id: Uuid,
    ) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE id = $1 AND availability_status = 'available' FOR UPDATE",
        )
        .bind(vehicle_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(vehicle)
    }

    /// Marcar un vehículo reservado como ocupado, dentro de la misma
    /// transacción que tomó el lock
    pub async fn mark_booked(
        tx: &mut Transaction<'_, Postgres>,
        vehicle_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE vehicles SET availability_status = 'booked', updated_at = NOW() WHERE id = $1",
        )
        .bind(vehicle_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Liberar un vehículo. Incondicional e idempotente: liberar un vehículo
    /// ya disponible lo deja disponible.
    pub async fn release(
        tx: &mut Transaction<'_, Postgres>,
        vehicle_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE vehicles SET availability_status = 'available', updated_at = NOW() WHERE id = $1",
        )
        .bind(vehicle_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Liberar en bloque los vehículos de las reservas vencidas
    pub async fn release_many(
        tx: &mut Transaction<'_, Postgres>,
        vehicle_ids: &[Uuid],
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE vehicles SET availability_status = 'available', updated_at = NOW() WHERE id = ANY($1)",
        )
        .bind(vehicle_ids)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected())
    }
}
