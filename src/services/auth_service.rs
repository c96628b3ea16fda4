//! Servicio de autenticación
//!
//! Registro y login de usuarios: hash de password con bcrypt y emisión
//! de JWT con el rol embebido.

use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::models::auth::{SignInData, SignInRequest};
use crate::models::user::{SignUpRequest, UserResponse, UserRole};
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthService {
    pool: PgPool,
    jwt_config: JwtConfig,
}

impl AuthService {
    pub fn new(pool: PgPool, config: &EnvironmentConfig) -> Self {
        Self {
            pool,
            jwt_config: JwtConfig::from(config),
        }
    }

    /// Registrar un usuario. El email se guarda siempre en minúsculas.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<UserResponse, AppError> {
        request.validate()?;

        let email = request.email.to_lowercase();
        let repo = UserRepository::new(self.pool.clone());

        if repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error hasheando password: {}", e)))?;

        let user = repo
            .create(
                request.name,
                email,
                password_hash,
                request.phone,
                request.role.unwrap_or(UserRole::Customer),
            )
            .await?;

        Ok(user.into())
    }

    /// Autenticar un usuario y emitir su token
    pub async fn sign_in(&self, request: SignInRequest) -> Result<SignInData, AppError> {
        request.validate()?;

        let email = request.email.to_lowercase();
        let repo = UserRepository::new(self.pool.clone());

        let user = repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let password_valid = verify(&request.password, &user.password)
            .map_err(|e| AppError::Hash(format!("Error verificando password: {}", e)))?;

        if !password_valid {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let token = generate_token(user.id, &user.email, user.role.as_str(), &self.jwt_config)?;

        log::info!("Login exitoso para {}", user.email);

        Ok(SignInData {
            token,
            user: user.into(),
        })
    }
}
