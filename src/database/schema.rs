//! Bootstrap del schema
//!
//! Este módulo crea los tipos ENUM y las tablas si no existen, de modo que
//! el binario pueda arrancar contra una base de datos vacía.

use sqlx::PgPool;
use tracing::info;

use crate::utils::errors::AppError;

const CREATE_ROLE_TYPE: &str = r#"
DO $$
BEGIN
    CREATE TYPE role_type AS ENUM ('admin', 'customer');
EXCEPTION
    WHEN duplicate_object THEN NULL;
END $$;
"#;

const CREATE_VEHICLE_TYPES: &str = r#"
DO $$
BEGIN
    CREATE TYPE vehicle_category AS ENUM ('car', 'bike', 'van');
    CREATE TYPE status_type AS ENUM ('available', 'booked');
EXCEPTION
    WHEN duplicate_object THEN NULL;
END $$;
"#;

const CREATE_BOOKING_TYPE: &str = r#"
DO $$
BEGIN
    CREATE TYPE booking_status AS ENUM ('active', 'cancelled', 'returned');
EXCEPTION
    WHEN duplicate_object THEN NULL;
END $$;
"#;

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    email VARCHAR(100) UNIQUE NOT NULL,
    password VARCHAR(255) NOT NULL,
    phone VARCHAR(20) NOT NULL,
    role role_type NOT NULL DEFAULT 'customer',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT email_lowercase CHECK (email = LOWER(email))
);
"#;

const CREATE_VEHICLES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS vehicles (
    id UUID PRIMARY KEY,
    vehicle_name VARCHAR(255) NOT NULL,
    type vehicle_category NOT NULL,
    registration_number VARCHAR(50) UNIQUE NOT NULL,
    daily_rent_price DECIMAL(10, 2) NOT NULL CHECK (daily_rent_price > 0),
    availability_status status_type NOT NULL DEFAULT 'available',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#;

const CREATE_BOOKINGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS bookings (
    id UUID PRIMARY KEY,
    customer_id UUID NOT NULL REFERENCES users(id),
    vehicle_id UUID NOT NULL REFERENCES vehicles(id),
    rent_start_date DATE NOT NULL,
    rent_end_date DATE NOT NULL,
    total_price DECIMAL(10, 2) NOT NULL CHECK (total_price > 0),
    status booking_status NOT NULL DEFAULT 'active',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT valid_rental_window CHECK (rent_end_date > rent_start_date)
);
"#;

/// Crear tipos y tablas si no existen
pub async fn init_schema(pool: &PgPool) -> Result<(), AppError> {
    let statements = [
        CREATE_ROLE_TYPE,
        CREATE_VEHICLE_TYPES,
        CREATE_BOOKING_TYPE,
        CREATE_USERS_TABLE,
        CREATE_VEHICLES_TABLE,
        CREATE_BOOKINGS_TABLE,
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Schema de base de datos verificado");
    Ok(())
}
