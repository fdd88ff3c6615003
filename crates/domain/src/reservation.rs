//! Seat reservation types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::PlannerError;

/// Reservation lifecycle state.
///
/// `held` reservations with a live hold window consume capacity for
/// admission tests; `committed` is terminal for enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Held,
    Committed,
    Released,
    Expired,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Held => "held",
            ReservationStatus::Committed => "committed",
            ReservationStatus::Released => "released",
            ReservationStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "held" => Ok(ReservationStatus::Held),
            "committed" => Ok(ReservationStatus::Committed),
            "released" => Ok(ReservationStatus::Released),
            "expired" => Ok(ReservationStatus::Expired),
            other => Err(PlannerError::Database(format!(
                "unknown reservation status: {other}"
            ))),
        }
    }
}

/// Seat hold request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReservationCreate {
    pub offering_id: i32,
    pub user_id: Option<i32>,
    /// Hold window; the configured default applies when absent.
    #[validate(range(min = 0, max = 1440))]
    pub hold_minutes: Option<i64>,
    #[serde(default)]
    pub allow_overfull: bool,
}

/// Reservation state returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationOut {
    pub id: i32,
    pub offering_id: i32,
    pub user_id: Option<i32>,
    pub status: ReservationStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub seats: i32,
    pub notes: Option<String>,
}

/// Release acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseOut {
    pub status: ReservationStatus,
    pub id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            ReservationStatus::Held,
            ReservationStatus::Committed,
            ReservationStatus::Released,
            ReservationStatus::Expired,
        ] {
            assert_eq!(status.as_str().parse::<ReservationStatus>().unwrap(), status);
        }
        assert!("pending".parse::<ReservationStatus>().is_err());
    }

    #[test]
    fn wire_names_are_lowercase() {
        let json = serde_json::to_string(&ReservationStatus::Held).unwrap();
        assert_eq!(json, r#""held""#);
    }
}
