//! Modelos de autenticación
//!
//! Requests y responses de signup/signin.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::UserResponse;

/// Request de login
#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Datos devueltos tras un login exitoso
#[derive(Debug, Serialize)]
pub struct SignInData {
    pub token: String,
    pub user: UserResponse,
}
