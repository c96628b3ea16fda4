//! Job de auto-return
//!
//! Proceso periódico que devuelve las reservas activas vencidas y libera
//! sus vehículos. Corre una vez al día poco después de medianoche (UTC),
//! en una sola transacción, independiente de los handlers de requests; la
//! sincronización con las operaciones en vivo la dan los locks de fila,
//! no el scheduling. Si una pasada falla se deja para la siguiente.

use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, Utc};
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;

/// Hora de ejecución diaria: 00:01 UTC
const SWEEP_HOUR: u32 = 0;
const SWEEP_MINUTE: u32 = 1;

/// Resultado de una pasada del job
#[derive(Debug, Clone, Copy)]
pub struct SweepOutcome {
    pub bookings_returned: u64,
    pub vehicles_released: u64,
}

pub struct AutoReturnService {
    pool: PgPool,
}

impl AutoReturnService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ejecutar una pasada del barrido en una sola transacción: las
    /// reservas vencidas pasan a returned y sus vehículos quedan
    /// disponibles, o no cambia nada.
    pub async fn run_once(&self) -> Result<SweepOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let vehicle_ids = BookingRepository::sweep_expired(&mut tx).await?;

        let vehicles_released = if vehicle_ids.is_empty() {
            0
        } else {
            VehicleRepository::release_many(&mut tx, &vehicle_ids).await?
        };

        tx.commit().await?;

        Ok(SweepOutcome {
            bookings_returned: vehicle_ids.len() as u64,
            vehicles_released,
        })
    }

    /// Próxima ejecución: hoy a las 00:01 UTC si aún no pasó, si no mañana
    pub fn next_sweep_at(now: DateTime<Utc>) -> DateTime<Utc> {
        let run_time =
            NaiveTime::from_hms_opt(SWEEP_HOUR, SWEEP_MINUTE, 0).unwrap_or(NaiveTime::MIN);

        let mut next = now.date_naive().and_time(run_time).and_utc();
        if next <= now {
            next = next + ChronoDuration::days(1);
        }
        next
    }

    /// Tiempo de espera hasta la próxima ejecución
    pub fn next_sweep_delay(now: DateTime<Utc>) -> std::time::Duration {
        (Self::next_sweep_at(now) - now)
            .to_std()
            .unwrap_or(std::time::Duration::from_secs(60))
    }

    /// Lanzar el job como task de fondo. El handle permite abortarlo en el
    /// shutdown del servidor.
    pub fn spawn(pool: PgPool) -> JoinHandle<()> {
        tokio::spawn(async move {
            let service = AutoReturnService::new(pool);

            loop {
                let delay = Self::next_sweep_delay(Utc::now());
                tokio::time::sleep(delay).await;

                info!("Buscando reservas vencidas...");

                match service.run_once().await {
                    Ok(outcome) if outcome.bookings_returned > 0 => {
                        info!(
                            "Auto-return: {} reservas devueltas, {} vehículos liberados",
                            outcome.bookings_returned, outcome.vehicles_released
                        );
                    }
                    Ok(_) => {}
                    Err(e) => {
                        // No es fatal: el barrido se reintenta en el
                        // próximo tick diario
                        error!("Error en el job de auto-return: {}", e);
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_next_sweep_at_before_run_time() {
        // a las 00:00:30 el barrido de hoy aún no corrió
        let now = Utc.with_ymd_and_hms(2024, 5, 5, 0, 0, 30).unwrap();
        let next = AutoReturnService::next_sweep_at(now);
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 5, 5, 0, 1, 0).unwrap());
    }

    #[test]
    fn test_next_sweep_at_after_run_time() {
        let now = Utc.with_ymd_and_hms(2024, 5, 5, 10, 0, 0).unwrap();
        let next = AutoReturnService::next_sweep_at(now);
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 5, 6, 0, 1, 0).unwrap());
    }

    #[test]
    fn test_next_sweep_delay_is_positive_and_bounded() {
        let now = Utc.with_ymd_and_hms(2024, 5, 5, 23, 59, 0).unwrap();
        let delay = AutoReturnService::next_sweep_delay(now);
        assert!(delay > std::time::Duration::ZERO);
        assert!(delay <= std::time::Duration::from_secs(24 * 3600));
    }
}
