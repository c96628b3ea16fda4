//! Guard de autorización
//!
//! Predicados sin estado sobre (rol del actor, id del actor, dueño del
//! recurso, operación). Las violaciones devuelven un error 403, nunca
//! escapan como panics.

use uuid::Uuid;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::booking::{Booking, BookingStatus};
use crate::models::user::UserRole;
use crate::utils::errors::AppError;

/// Autorizar una transición de estado de reserva: un cliente solo puede
/// cancelar sus propias reservas; un admin puede cancelar o devolver
/// cualquiera.
pub fn authorize_booking_update(
    actor: &AuthenticatedUser,
    booking: &Booking,
    requested: BookingStatus,
) -> Result<(), AppError> {
    if actor.role == UserRole::Customer {
        if booking.customer_id != actor.id {
            return Err(AppError::Forbidden(
                "You are not authorized to update this booking".to_string(),
            ));
        }

        if requested != BookingStatus::Cancelled {
            return Err(AppError::Forbidden(
                "Customers can only cancel their bookings".to_string(),
            ));
        }
    }

    Ok(())
}

/// Autorizar la modificación de un perfil: admin o el propio usuario
pub fn authorize_user_update(
    actor: &AuthenticatedUser,
    target_user_id: Uuid,
) -> Result<(), AppError> {
    let is_admin = actor.role == UserRole::Admin;
    let is_own_profile = actor.id == target_user_id;

    if !is_admin && !is_own_profile {
        return Err(AppError::Forbidden(
            "You are not authorized to update this user".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    fn actor(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "actor@example.com".to_string(),
            role,
        }
    }

    fn booking_of(customer_id: Uuid) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            customer_id,
            vehicle_id: Uuid::new_v4(),
            rent_start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            rent_end_date: NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
            total_price: Decimal::new(15000, 2),
            status: BookingStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_customer_can_cancel_own_booking() {
        let customer = actor(UserRole::Customer);
        let booking = booking_of(customer.id);

        assert!(authorize_booking_update(&customer, &booking, BookingStatus::Cancelled).is_ok());
    }

    #[test]
    fn test_customer_cannot_touch_foreign_booking() {
        let customer = actor(UserRole::Customer);
        let booking = booking_of(Uuid::new_v4());

        let result = authorize_booking_update(&customer, &booking, BookingStatus::Cancelled);
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_customer_cannot_mark_returned() {
        let customer = actor(UserRole::Customer);
        let booking = booking_of(customer.id);

        let result = authorize_booking_update(&customer, &booking, BookingStatus::Returned);
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_admin_can_update_any_booking() {
        let admin = actor(UserRole::Admin);
        let booking = booking_of(Uuid::new_v4());

        assert!(authorize_booking_update(&admin, &booking, BookingStatus::Cancelled).is_ok());
        assert!(authorize_booking_update(&admin, &booking, BookingStatus::Returned).is_ok());
    }

    #[test]
    fn test_user_update_authorization() {
        let admin = actor(UserRole::Admin);
        let customer = actor(UserRole::Customer);

        assert!(authorize_user_update(&admin, Uuid::new_v4()).is_ok());
        assert!(authorize_user_update(&customer, customer.id).is_ok());
        assert!(matches!(
            authorize_user_update(&customer, Uuid::new_v4()),
            Err(AppError::Forbidden(_))
        ));
    }
}
