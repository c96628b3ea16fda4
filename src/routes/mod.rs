//! Rutas de la API
//!
//! Este módulo arma el router de /api/v1 a partir de los routers por
//! recurso, igual que la tabla de rutas del gateway.

pub mod auth_routes;
pub mod booking_routes;
pub mod user_routes;
pub mod vehicle_routes;

use axum::Router;

use crate::middleware::rate_limit::RateLimitState;
use crate::state::AppState;

/// Crear el router principal de la API
pub fn create_api_router(state: AppState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .merge(auth_routes::create_auth_router(rate_limit))
        .merge(user_routes::create_user_router(state.clone()))
        .merge(vehicle_routes::create_vehicle_router(state.clone()))
        .merge(booking_routes::create_booking_router(state))
}
