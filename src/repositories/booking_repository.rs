//! Repositorio de reservas
//!
//! Inserción y transición de estado bajo lock de fila, listados con joins
//! y el barrido de reservas vencidas del auto-return.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::booking::{
    Booking, BookingListItem, BookingStatus, BookingVehicleInfo, CustomerSummary,
};
use crate::models::vehicle::VehicleCategory;
use crate::utils::errors::AppError;

/// Fila del listado de admin: reserva + vehículo + cliente
#[derive(Debug, FromRow)]
pub struct AdminBookingRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub rent_start_date: NaiveDate,
    pub rent_end_date: NaiveDate,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub vehicle_name: String,
    pub registration_number: String,
    pub customer_name: String,
    pub customer_email: String,
}

/// Fila del listado de cliente: reserva + resumen del vehículo
#[derive(Debug, FromRow)]
pub struct CustomerBookingRow {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub rent_start_date: NaiveDate,
    pub rent_end_date: NaiveDate,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub vehicle_name: String,
    pub registration_number: String,
    pub vehicle_type: VehicleCategory,
}

impl From<AdminBookingRow> for BookingListItem {
    fn from(row: AdminBookingRow) -> Self {
        Self {
            id: row.id,
            vehicle_id: row.vehicle_id,
            rent_start_date: row.rent_start_date,
            rent_end_date: row.rent_end_date,
            total_price: row.total_price,
            status: row.status,
            customer_id: Some(row.customer_id),
            customer: Some(CustomerSummary {
                name: row.customer_name,
                email: row.customer_email,
            }),
            vehicle: BookingVehicleInfo {
                vehicle_name: row.vehicle_name,
                registration_number: row.registration_number,
                category: None,
            },
        }
    }
}

impl From<CustomerBookingRow> for BookingListItem {
    fn from(row: CustomerBookingRow) -> Self {
        Self {
            id: row.id,
            vehicle_id: row.vehicle_id,
            rent_start_date: row.rent_start_date,
            rent_end_date: row.rent_end_date,
            total_price: row.total_price,
            status: row.status,
            customer_id: None,
            customer: None,
            vehicle: BookingVehicleInfo {
                vehicle_name: row.vehicle_name,
                registration_number: row.registration_number,
                category: Some(row.vehicle_type),
            },
        }
    }
}

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Listado de admin: todas las reservas con datos de cliente y vehículo
    pub async fn list_all(&self) -> Result<Vec<AdminBookingRow>, AppError> {
        let rows = sqlx::query_as::<_, AdminBookingRow>(
            r#"
            SELECT b.id, b.customer_id, b.vehicle_id, b.rent_start_date, b.rent_end_date,
                   b.total_price, b.status,
                   v.vehicle_name, v.registration_number,
                   u.name AS customer_name, u.email AS customer_email
            FROM bookings b
            JOIN vehicles v ON v.id = b.vehicle_id
            JOIN users u ON u.id = b.customer_id
            ORDER BY b.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Listado de cliente: solo sus reservas, con resumen del vehículo
    pub async fn list_by_customer(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<CustomerBookingRow>, AppError> {
        let rows = sqlx::query_as::<_, CustomerBookingRow>(
            r#"
            SELECT b.id, b.vehicle_id, b.rent_start_date, b.rent_end_date,
                   b.total_price, b.status,
                   v.vehicle_name, v.registration_number, v.type AS vehicle_type
            FROM bookings b
            JOIN vehicles v ON v.id = b.vehicle_id
            WHERE b.customer_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Verificar si algún booking referencia al vehículo (histórico incluido)
    pub async fn exists_for_vehicle(&self, vehicle_id: Uuid) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM bookings WHERE vehicle_id = $1)")
                .bind(vehicle_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    /// Insertar una reserva activa, dentro de la transacción de creación
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        customer_id: Uuid,
        vehicle_id: Uuid,
        rent_start_date: NaiveDate,
        rent_end_date: NaiveDate,
        total_price: Decimal,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (id, customer_id, vehicle_id, rent_start_date, rent_end_date, total_price, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'active', NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(customer_id)
        .bind(vehicle_id)
        .bind(rent_start_date)
        .bind(rent_end_date)
        .bind(total_price)
        .fetch_one(&mut **tx)
        .await?;

        Ok(booking)
    }

    /// Tomar el lock de fila de una reserva antes de transicionar su estado
    pub async fn lock_by_id(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, AppError> {
        let booking =
            sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
                .bind(booking_id)
                .fetch_optional(&mut **tx)
                .await?;

        Ok(booking)
    }

    /// Aplicar la transición de estado bajo el lock ya tomado
    pub async fn update_status(
        tx: &mut Transaction<'_, Postgres>,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(booking_id)
        .bind(status)
        .fetch_one(&mut **tx)
        .await?;

        Ok(booking)
    }

    /// Barrido del auto-return: devuelve en una sola sentencia atómica las
    /// reservas activas vencidas y captura sus vehículos
    pub async fn sweep_expired(tx: &mut Transaction<'_, Postgres>) -> Result<Vec<Uuid>, AppError> {
        let vehicle_ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE bookings
            SET status = 'returned', updated_at = NOW()
            WHERE status = 'active' AND rent_end_date < CURRENT_DATE
            RETURNING vehicle_id
            "#,
        )
        .fetch_all(&mut **tx)
        .await?;

        Ok(vehicle_ids)
    }
}
