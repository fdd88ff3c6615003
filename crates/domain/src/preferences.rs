//! Stored student scheduling preferences.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Student scheduling preferences, one record per user.
///
/// Day fields are letter strings ("MWF", "TR"); instructor and location
/// fields are comma-separated lists, matched case-insensitively.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentPreferences {
    pub user_id: Option<i32>,
    /// Overrides the request credit cap when smaller.
    pub max_credits_per_term: Option<i32>,
    pub unavailable_days: Option<String>,
    #[serde(default)]
    pub avoid_mornings: bool,
    #[serde(default)]
    pub avoid_evenings: bool,
    pub preferred_instructors: Option<String>,
    pub earliest_start_time: Option<NaiveTime>,
    pub latest_end_time: Option<NaiveTime>,
    pub max_days_per_week: Option<i32>,
    pub preferred_days: Option<String>,
    /// Tolerated idle minutes between classes on one day.
    pub max_gaps_per_day: Option<i32>,
    #[serde(default)]
    pub contiguous_classes: bool,
    pub preferred_locations: Option<String>,
    /// "morning", "afternoon", or "none".
    pub preferred_time_of_day: Option<String>,
    pub notes: Option<String>,
}
