mod config;
mod database;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing::{error, info};

use config::database::DatabaseConfig;
use config::environment::EnvironmentConfig;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use middleware::rate_limit::{rate_limit_middleware, RateLimitState};
use services::auto_return_service::AutoReturnService;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("🚗 Vehicle Rental - Booking API");
    info!("===============================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let pool = match DatabaseConfig::default().create_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    // Crear tipos y tablas si no existen
    if let Err(e) = database::schema::init_schema(&pool).await {
        error!("❌ Error inicializando el schema: {}", e);
        return Err(anyhow::anyhow!("Error de schema: {}", e));
    }

    info!("✅ Base de datos conectada");

    // Job de auto-return: devuelve reservas vencidas cada madrugada
    let auto_return_handle = AutoReturnService::spawn(pool.clone());

    // Crear router de la API
    let app_state = AppState::new(pool, config.clone());
    let rate_limit_state = RateLimitState::new(&config);

    let cors = if config.is_development() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(config.cors_origins.clone())
    };

    let app = Router::new()
        .route("/", get(root_endpoint))
        .nest(
            "/api/v1",
            routes::create_api_router(app_state.clone(), rate_limit_state.clone()),
        )
        .fallback(not_found_endpoint)
        .layer(axum::middleware::from_fn_with_state(
            rate_limit_state,
            rate_limit_middleware,
        ))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   POST /api/v1/auth/signup - Registrar usuario");
    info!("   POST /api/v1/auth/signin - Login");
    info!("👤 Endpoints - Users:");
    info!("   GET    /api/v1/users - Listar usuarios (admin)");
    info!("   PUT    /api/v1/users/:id - Actualizar usuario");
    info!("   DELETE /api/v1/users/:id - Eliminar usuario (admin)");
    info!("🚗 Endpoints - Vehicles:");
    info!("   POST   /api/v1/vehicles - Crear vehículo (admin)");
    info!("   GET    /api/v1/vehicles - Listar vehículos");
    info!("   GET    /api/v1/vehicles/:id - Obtener vehículo");
    info!("   PUT    /api/v1/vehicles/:id - Actualizar vehículo (admin)");
    info!("   DELETE /api/v1/vehicles/:id - Eliminar vehículo (admin)");
    info!("📅 Endpoints - Bookings:");
    info!("   POST /api/v1/bookings - Crear reserva");
    info!("   GET  /api/v1/bookings - Listar reservas");
    info!("   PUT  /api/v1/bookings/:id - Cancelar/devolver reserva");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    // Parar el job de fondo junto con el servidor
    auto_return_handle.abort();

    info!("👋 Servidor terminado");
    Ok(())
}

/// Endpoint raíz de bienvenida
async fn root_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "status": true,
        "message": "Welcome to the Vehicle Rental API!",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Fallback para rutas inexistentes
async fn not_found_endpoint() -> (axum::http::StatusCode, Json<serde_json::Value>) {
    (
        axum::http::StatusCode::NOT_FOUND,
        Json(json!({
            "status": false,
            "error": "Route not found"
        })),
    )
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
