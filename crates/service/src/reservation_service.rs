//! Reservation request handling.

use sqlx::PgPool;
use validator::Validate;

use pathplanner_config::AppConfig;
use pathplanner_domain::{
    PlannerError, ReleaseOut, ReservationCreate, ReservationOut,
};
use pathplanner_storage::ReservationRepository;

/// Seat reservation service.
#[derive(Clone)]
pub struct ReservationService {
    reservations: ReservationRepository,
    default_hold_minutes: i64,
}

impl ReservationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            reservations: ReservationRepository::new(pool),
            default_hold_minutes: 15,
        }
    }

    pub fn with_config(pool: PgPool, config: &AppConfig) -> Self {
        Self {
            reservations: ReservationRepository::new(pool),
            default_hold_minutes: config.reservation_hold_minutes,
        }
    }

    pub async fn create(
        &self,
        request: &ReservationCreate,
    ) -> Result<ReservationOut, PlannerError> {
        request
            .validate()
            .map_err(PlannerError::from_validation_errors)?;
        let hold_minutes = request.hold_minutes.unwrap_or(self.default_hold_minutes);

        tracing::info!(
            offering_id = request.offering_id,
            hold_minutes,
            "creating seat hold"
        );
        self.reservations
            .create(
                request.offering_id,
                request.user_id,
                hold_minutes,
                request.allow_overfull,
            )
            .await
    }

    pub async fn commit(
        &self,
        reservation_id: i32,
        allow_overfull: bool,
    ) -> Result<ReservationOut, PlannerError> {
        tracing::info!(reservation_id, "committing reservation");
        self.reservations.commit(reservation_id, allow_overfull).await
    }

    pub async fn release(&self, reservation_id: i32) -> Result<ReleaseOut, PlannerError> {
        tracing::info!(reservation_id, "releasing reservation");
        self.reservations.release(reservation_id).await
    }

    pub async fn get(&self, reservation_id: i32) -> Result<ReservationOut, PlannerError> {
        self.reservations
            .get(reservation_id)
            .await?
            .ok_or_else(|| PlannerError::NotFound(format!("reservation {reservation_id}")))
    }

    /// Batch-expire lapsed holds; intended for a periodic background sweep.
    pub async fn sweep_expired(&self) -> Result<u64, PlannerError> {
        let swept = self.reservations.sweep_expired().await?;
        if swept > 0 {
            tracing::info!(swept, "expired lapsed seat holds");
        }
        Ok(swept)
    }
}
