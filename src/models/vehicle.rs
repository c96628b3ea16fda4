//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus variantes para CRUD operations.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;
use validator::Validate;

/// Categoría del vehículo - mapea al ENUM vehicle_category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleCategory {
    Car,
    Bike,
    Van,
}

/// Estado de disponibilidad - mapea al ENUM status_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "status_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Available,
    Booked,
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub vehicle_name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub category: VehicleCategory,
    pub registration_number: String,
    pub daily_rent_price: Decimal,
    pub availability_status: AvailabilityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request para crear un nuevo vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 2, max = 255))]
    pub vehicle_name: String,

    #[serde(rename = "type")]
    pub category: VehicleCategory,

    #[validate(custom = "crate::utils::validation::validate_registration_number")]
    pub registration_number: String,

    #[validate(custom = "crate::utils::validation::validate_daily_rent_price")]
    pub daily_rent_price: Decimal,
}

/// Request para actualizar un vehículo existente.
/// La disponibilidad NO se actualiza por aquí: solo el ledger de
/// reservas escribe availability_status.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 2, max = 255))]
    pub vehicle_name: Option<String>,

    #[serde(rename = "type")]
    pub category: Option<VehicleCategory>,

    #[validate(custom = "crate::utils::validation::validate_registration_number")]
    pub registration_number: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_daily_rent_price")]
    pub daily_rent_price: Option<Decimal>,
}

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub vehicle_name: String,
    #[serde(rename = "type")]
    pub category: VehicleCategory,
    pub registration_number: String,
    pub daily_rent_price: Decimal,
    pub availability_status: AvailabilityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            vehicle_name: vehicle.vehicle_name,
            category: vehicle.category,
            registration_number: vehicle.registration_number,
            daily_rent_price: vehicle.daily_rent_price,
            availability_status: vehicle.availability_status,
            created_at: vehicle.created_at,
            updated_at: vehicle.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_vehicle_request_validation() {
        let valid = CreateVehicleRequest {
            vehicle_name: "Toyota Axio".to_string(),
            category: VehicleCategory::Car,
            registration_number: "DHK-1234".to_string(),
            daily_rent_price: Decimal::new(5000, 2),
        };
        assert!(valid.validate().is_ok());

        let bad_price = CreateVehicleRequest {
            daily_rent_price: Decimal::ZERO,
            ..valid
        };
        assert!(bad_price.validate().is_err());
    }
}
