//! Servicio de reservas
//!
//! Este módulo contiene la transacción de creación de reservas y la máquina
//! de estados de una reserva. Ambas rutas serializan sus conflictos con
//! locks de fila: no hay ningún mutex en proceso del que dependa la
//! corrección.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::booking::{
    BookingListItem, BookingResponse, BookingStatus, BookingUpdateResponse,
    BookingVehicleSummary, CreateBookingRequest, VehicleAvailabilityEcho,
};
use crate::models::user::UserRole;
use crate::models::vehicle::AvailabilityStatus;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::authorization_service;
use crate::utils::errors::{bad_request_error, AppError};

pub struct BookingService {
    pool: PgPool,
}

impl BookingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crear una reserva. Todo el protocolo corre en una sola transacción:
    /// lock del vehículo, cálculo de precio, inserción de la reserva y
    /// cambio de disponibilidad se confirman o deshacen juntos.
    pub async fn create_booking(
        &self,
        customer_id: Uuid,
        request: CreateBookingRequest,
    ) -> Result<BookingResponse, AppError> {
        // Validación barata, antes de tocar la base de datos
        let today = Utc::now().date_naive();
        validate_rental_window(request.rent_start_date, request.rent_end_date, today)?;

        let mut tx = self.pool.begin().await?;

        // 1. Lock exclusivo + check de disponibilidad. Este check-then-act
        //    atómico es la única defensa contra el double-booking.
        let vehicle = match VehicleRepository::try_reserve(&mut tx, request.vehicle_id).await? {
            Some(vehicle) => vehicle,
            None => {
                tx.rollback().await?;
                // Resultado esperado bajo contención, no un fallo del sistema
                return Err(AppError::Conflict("Vehicle is no longer available".to_string()));
            }
        };

        // 2. Precio total al precio diario vigente; inmutable después
        let days = rental_days(request.rent_start_date, request.rent_end_date);
        let total_price = compute_total_price(vehicle.daily_rent_price, days)
            .ok_or_else(|| AppError::Internal("Price computation overflow".to_string()))?;

        // 3. Insertar la reserva activa
        let booking = BookingRepository::insert(
            &mut tx,
            customer_id,
            vehicle.id,
            request.rent_start_date,
            request.rent_end_date,
            total_price,
        )
        .await?;

        // 4. Cambiar la disponibilidad del vehículo
        VehicleRepository::mark_booked(&mut tx, vehicle.id).await?;

        // 5. Commit: desde aquí el vehículo deja de estar disponible para
        //    cualquier otro reservador
        tx.commit().await?;

        log::info!("Reserva {} creada para el vehículo {}", booking.id, vehicle.id);

        Ok(BookingResponse {
            id: booking.id,
            customer_id: booking.customer_id,
            vehicle_id: booking.vehicle_id,
            rent_start_date: booking.rent_start_date,
            rent_end_date: booking.rent_end_date,
            total_price: booking.total_price,
            status: booking.status,
            vehicle: BookingVehicleSummary {
                vehicle_name: vehicle.vehicle_name,
                daily_rent_price: vehicle.daily_rent_price,
            },
        })
    }

    /// Listar reservas: el admin ve todas con cliente y vehículo, el
    /// cliente solo las suyas con el resumen del vehículo
    pub async fn fetch_bookings(
        &self,
        actor: &AuthenticatedUser,
    ) -> Result<Vec<BookingListItem>, AppError> {
        let repo = BookingRepository::new(self.pool.clone());

        let items = match actor.role {
            UserRole::Admin => repo
                .list_all()
                .await?
                .into_iter()
                .map(BookingListItem::from)
                .collect(),
            UserRole::Customer => repo
                .list_by_customer(actor.id)
                .await?
                .into_iter()
                .map(BookingListItem::from)
                .collect(),
        };

        Ok(items)
    }

    /// Transicionar el estado de una reserva. La reserva y el vehículo se
    /// actualizan bajo la misma transacción para que nunca se observe un
    /// vehículo ocupado sin reserva activa ni lo contrario.
    pub async fn update_booking(
        &self,
        actor: &AuthenticatedUser,
        booking_id: Uuid,
        requested: BookingStatus,
    ) -> Result<BookingUpdateResponse, AppError> {
        ensure_valid_target(requested)?;

        let mut tx = self.pool.begin().await?;

        // 1. Lock de la fila de la reserva
        let booking = BookingRepository::lock_by_id(&mut tx, booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        // 2. Autorización: cliente solo su reserva y solo a cancelled
        authorization_service::authorize_booking_update(actor, &booking, requested)?;

        // 3. Los estados cancelled/returned son terminales
        ensure_transition_allowed(booking.status)?;

        // 4. Aplicar la transición
        let updated = BookingRepository::update_status(&mut tx, booking_id, requested).await?;

        // 5. Liberar el vehículo en la misma transacción
        VehicleRepository::release(&mut tx, booking.vehicle_id).await?;

        tx.commit().await?;

        let vehicle = (requested == BookingStatus::Returned).then(|| VehicleAvailabilityEcho {
            availability_status: AvailabilityStatus::Available,
        });

        Ok(BookingUpdateResponse {
            id: updated.id,
            customer_id: updated.customer_id,
            vehicle_id: updated.vehicle_id,
            rent_start_date: updated.rent_start_date,
            rent_end_date: updated.rent_end_date,
            total_price: updated.total_price,
            status: updated.status,
            vehicle,
        })
    }
}

/// Días de renta con granularidad de día calendario; cualquier fracción de
/// día queda cubierta por la regla end > start (mínimo 1 día)
pub fn rental_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// total = días × precio diario
pub fn compute_total_price(daily_rent_price: Decimal, days: i64) -> Option<Decimal> {
    Decimal::from(days).checked_mul(daily_rent_price)
}

/// Validar la ventana de renta contra la fecha actual (hora en cero)
pub fn validate_rental_window(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<(), AppError> {
    if end <= start {
        return Err(bad_request_error("End date must be after start date"));
    }
    if start < today {
        return Err(bad_request_error("Start date cannot be in the past"));
    }
    Ok(())
}

/// El estado solicitado solo puede ser cancelled o returned
fn ensure_valid_target(requested: BookingStatus) -> Result<(), AppError> {
    if requested == BookingStatus::Active {
        return Err(bad_request_error(
            "Status field is required and must be either 'cancelled' or 'returned'",
        ));
    }
    Ok(())
}

/// Una reserva ya cancelada o devuelta no admite más transiciones
fn ensure_transition_allowed(current: BookingStatus) -> Result<(), AppError> {
    if current.is_terminal() {
        return Err(AppError::Conflict(
            "Booking is already cancelled or returned".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rental_days() {
        assert_eq!(rental_days(date(2024, 1, 1), date(2024, 1, 4)), 3);
        assert_eq!(rental_days(date(2024, 1, 1), date(2024, 1, 2)), 1);
    }

    #[test]
    fn test_compute_total_price_three_days() {
        // 3 días a 50.00 → 150.00
        let total = compute_total_price(Decimal::new(5000, 2), 3).unwrap();
        assert_eq!(total, Decimal::new(15000, 2));
    }

    #[test]
    fn test_compute_total_price_single_day_minimum() {
        // un rango de un día (el mínimo que permite end > start)
        let total = compute_total_price(Decimal::new(5000, 2), 1).unwrap();
        assert_eq!(total, Decimal::new(5000, 2));
    }

    #[test]
    fn test_validate_rental_window_accepts_future_range() {
        let today = date(2024, 1, 1);
        assert!(validate_rental_window(date(2024, 1, 1), date(2024, 1, 4), today).is_ok());
        assert!(validate_rental_window(date(2024, 2, 1), date(2024, 2, 2), today).is_ok());
    }

    #[test]
    fn test_validate_rental_window_rejects_inverted_range() {
        let today = date(2024, 1, 1);
        assert!(validate_rental_window(date(2024, 1, 4), date(2024, 1, 1), today).is_err());
        // rango vacío también es inválido
        assert!(validate_rental_window(date(2024, 1, 4), date(2024, 1, 4), today).is_err());
    }

    #[test]
    fn test_validate_rental_window_rejects_past_start() {
        let today = date(2024, 1, 10);
        assert!(validate_rental_window(date(2024, 1, 9), date(2024, 1, 12), today).is_err());
    }

    #[test]
    fn test_ensure_valid_target() {
        assert!(ensure_valid_target(BookingStatus::Cancelled).is_ok());
        assert!(ensure_valid_target(BookingStatus::Returned).is_ok());
        assert!(ensure_valid_target(BookingStatus::Active).is_err());
    }

    #[test]
    fn test_ensure_transition_allowed_rejects_terminal_states() {
        assert!(ensure_transition_allowed(BookingStatus::Active).is_ok());

        match ensure_transition_allowed(BookingStatus::Cancelled) {
            Err(AppError::Conflict(_)) => {}
            other => panic!("expected Conflict, got {:?}", other.err()),
        }
        match ensure_transition_allowed(BookingStatus::Returned) {
            Err(AppError::Conflict(_)) => {}
            other => panic!("expected Conflict, got {:?}", other.err()),
        }
    }
}
