//! Modelo de Booking
//!
//! Este módulo contiene el struct Booking, sus estados y las variantes
//! de request/response del ciclo de vida de una reserva.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::models::vehicle::{AvailabilityStatus, VehicleCategory};

/// Estado de la reserva - mapea al ENUM booking_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Cancelled,
    Returned,
}

impl BookingStatus {
    /// Los estados cancelled/returned son terminales: no hay transición de salida
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Returned)
    }
}

/// Booking principal - mapea exactamente a la tabla bookings
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub rent_start_date: NaiveDate,
    pub rent_end_date: NaiveDate,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request para crear una reserva
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub vehicle_id: Uuid,
    pub rent_start_date: NaiveDate,
    pub rent_end_date: NaiveDate,
}

/// Request para actualizar el estado de una reserva
#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    pub status: BookingStatus,
}

/// Resumen del vehículo embebido en la respuesta de creación
#[derive(Debug, Serialize)]
pub struct BookingVehicleSummary {
    pub vehicle_name: String,
    pub daily_rent_price: Decimal,
}

/// Response de creación de reserva
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub rent_start_date: NaiveDate,
    pub rent_end_date: NaiveDate,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub vehicle: BookingVehicleSummary,
}

/// Eco de disponibilidad que acompaña a una devolución
#[derive(Debug, Serialize)]
pub struct VehicleAvailabilityEcho {
    pub availability_status: AvailabilityStatus,
}

/// Response de actualización de estado
#[derive(Debug, Serialize)]
pub struct BookingUpdateResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub rent_start_date: NaiveDate,
    pub rent_end_date: NaiveDate,
    pub total_price: Decimal,
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<VehicleAvailabilityEcho>,
}

/// Resumen del cliente para el listado de admin
#[derive(Debug, Serialize)]
pub struct CustomerSummary {
    pub name: String,
    pub email: String,
}

/// Datos del vehículo para los listados de reservas
#[derive(Debug, Serialize)]
pub struct BookingVehicleInfo {
    pub vehicle_name: String,
    pub registration_number: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub category: Option<VehicleCategory>,
}

/// Item del listado de reservas. El admin ve además el cliente; el
/// cliente ve la categoría del vehículo.
#[derive(Debug, Serialize)]
pub struct BookingListItem {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub rent_start_date: NaiveDate,
    pub rent_end_date: NaiveDate,
    pub total_price: Decimal,
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerSummary>,
    pub vehicle: BookingVehicleInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!BookingStatus::Active.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::Returned.is_terminal());
    }
}
