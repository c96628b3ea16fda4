//! Servicio de vehículos
//!
//! CRUD de la flota. La disponibilidad no se gestiona aquí: la escribe
//! únicamente el ledger del repositorio dentro de las transacciones de
//! reserva.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::models::vehicle::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{conflict_error, not_found_error, AppError};

pub struct VehicleService {
    pool: PgPool,
}

impl VehicleService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_vehicle(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<VehicleResponse, AppError> {
        request.validate()?;

        let repo = VehicleRepository::new(self.pool.clone());

        if repo
            .registration_number_exists(&request.registration_number)
            .await?
        {
            return Err(conflict_error(
                "Vehicle",
                "registration number",
                &request.registration_number,
            ));
        }

        let vehicle = repo
            .create(
                request.vehicle_name,
                request.category,
                request.registration_number,
                request.daily_rent_price,
            )
            .await?;

        Ok(vehicle.into())
    }

    pub async fn fetch_vehicles(&self) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = VehicleRepository::new(self.pool.clone()).list().await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn fetch_vehicle(&self, vehicle_id: Uuid) -> Result<VehicleResponse, AppError> {
        let vehicle = VehicleRepository::new(self.pool.clone())
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))?;

        Ok(vehicle.into())
    }

    pub async fn update_vehicle(
        &self,
        vehicle_id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<VehicleResponse, AppError> {
        request.validate()?;

        let vehicle = VehicleRepository::new(self.pool.clone())
            .update(
                vehicle_id,
                request.vehicle_name,
                request.category,
                request.registration_number,
                request.daily_rent_price,
            )
            .await?;

        Ok(vehicle.into())
    }

    /// Eliminar un vehículo. Prohibido mientras exista cualquier reserva
    /// que lo referencie: el histórico de bookings no se rompe.
    pub async fn delete_vehicle(&self, vehicle_id: Uuid) -> Result<(), AppError> {
        let repo = VehicleRepository::new(self.pool.clone());

        if repo.find_by_id(vehicle_id).await?.is_none() {
            return Err(not_found_error("Vehicle", &vehicle_id.to_string()));
        }

        let has_bookings = BookingRepository::new(self.pool.clone())
            .exists_for_vehicle(vehicle_id)
            .await?;

        if has_bookings {
            return Err(AppError::Conflict(
                "Cannot delete vehicle with existing bookings".to_string(),
            ));
        }

        repo.delete(vehicle_id).await
    }
}
