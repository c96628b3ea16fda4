//! Servicio de usuarios

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::{UpdateUserRequest, UserResponse, UserRole};
use crate::repositories::user_repository::UserRepository;
use crate::services::authorization_service;
use crate::utils::errors::AppError;

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Listar todos los usuarios (solo admin, verificado en la ruta)
    pub async fn fetch_users(&self) -> Result<Vec<UserResponse>, AppError> {
        let users = UserRepository::new(self.pool.clone()).list().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Actualizar un usuario: admin o el propio perfil. Solo un admin
    /// puede cambiar el rol.
    pub async fn update_user(
        &self,
        actor: &AuthenticatedUser,
        target_user_id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, AppError> {
        request.validate()?;
        authorization_service::authorize_user_update(actor, target_user_id)?;

        let role = if actor.role == UserRole::Admin {
            request.role
        } else {
            None
        };

        let email = request.email.map(|e| e.to_lowercase());

        let user = UserRepository::new(self.pool.clone())
            .update(target_user_id, request.name, email, request.phone, role)
            .await?;

        Ok(user.into())
    }

    /// Eliminar un usuario (solo admin, verificado en la ruta). El FK de
    /// bookings protege el histórico: si tiene reservas la eliminación
    /// falla como conflicto.
    pub async fn delete_user(&self, target_user_id: Uuid) -> Result<(), AppError> {
        UserRepository::new(self.pool.clone())
            .delete(target_user_id)
            .await
    }
}
