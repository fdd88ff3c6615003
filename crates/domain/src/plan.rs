//! Plan and score request/response types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::preferences::StudentPreferences;

fn default_max_credits() -> i32 {
    15
}

fn default_max_terms() -> u32 {
    12
}

fn default_years() -> u32 {
    4
}

fn default_true() -> bool {
    true
}

/// Which solver a plan request runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    #[default]
    Heuristic,
    Exact,
}

/// Term-by-term planning request.
///
/// Exactly one of `pathway_id` / `pathway_code` must be supplied.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PlanRequest {
    pub pathway_id: Option<i32>,
    pub pathway_code: Option<String>,
    #[serde(default)]
    pub completed_course_codes: Vec<String>,
    #[serde(default = "default_max_credits")]
    #[validate(range(min = 1, max = 40))]
    pub max_credits_per_semester: i32,
    /// Loads stored preferences when set.
    pub user_id: Option<i32>,
    /// Canonical "Term YYYY"; inferred from today's date when absent.
    pub start_semester: Option<String>,
    #[serde(default = "default_max_terms")]
    #[validate(range(max = 48))]
    pub max_terms: u32,
    #[serde(default)]
    pub allow_overfull: bool,
    #[serde(default)]
    pub reserve_seats: bool,
    #[serde(default)]
    pub balance_load: bool,
    #[serde(default)]
    pub solver: SolverKind,
}

/// Four-year preset: `max_terms = years * (2 + include_summer)`, plan padded
/// with empty terms up to that horizon.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FourYearRequest {
    pub pathway_id: Option<i32>,
    pub pathway_code: Option<String>,
    #[serde(default)]
    pub completed_course_codes: Vec<String>,
    #[serde(default = "default_years")]
    #[validate(range(min = 1, max = 8))]
    pub years: u32,
    #[serde(default)]
    pub include_summer: bool,
    #[serde(default = "default_max_credits")]
    #[validate(range(min = 1, max = 40))]
    pub max_credits_per_semester: i32,
    #[serde(default)]
    pub allow_overfull: bool,
    #[serde(default)]
    pub reserve_seats: bool,
    #[serde(default = "default_true")]
    pub balance_load: bool,
    pub user_id: Option<i32>,
}

/// Offering snapshot attached to a planned course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferingSnapshot {
    pub id: i32,
    pub section: Option<String>,
    pub days: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub instructor: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub enrolled: Option<i32>,
    pub status: SeatStatus,
}

/// Seat availability at plan emission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Confirmed,
    Full,
}

/// One scheduled course within a term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedCourse {
    pub course_code: String,
    pub name: String,
    pub credits: i32,
    pub offering: Option<OfferingSnapshot>,
}

/// One term of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermPlan {
    pub semester: String,
    pub courses: Vec<PlannedCourse>,
    pub total_credits: i32,
}

impl TermPlan {
    pub fn empty(semester: String) -> Self {
        Self {
            semester,
            courses: Vec::new(),
            total_credits: 0,
        }
    }
}

/// "Must take together" pairing surfaced to callers.
///
/// The planner never enforces corequisites; the relation is reported so
/// callers can warn or group the pair themselves.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CorequisiteLink {
    pub course_code: String,
    pub corequisite_code: String,
}

/// Schedule scoring request. Inline `preferences` override any stored
/// preferences for `user_id`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScoreRequest {
    #[validate(length(min = 1))]
    pub course_ids: Vec<i32>,
    pub weights: Option<HashMap<String, f64>>,
    pub user_id: Option<i32>,
    pub preferences: Option<StudentPreferences>,
}

/// Scoring weights; every term of the score formula is overridable by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub base: f64,
    pub conflict_penalty: f64,
    pub gap_penalty_per_minute: f64,
    pub day_penalty_per_day: f64,
    pub compactness_reward: f64,
    pub rating_weight: f64,
    pub unavailable_day_penalty: f64,
    pub avoid_morning_penalty: f64,
    pub avoid_evening_penalty: f64,
    pub preferred_instructor_reward: f64,
    pub outside_window_penalty: f64,
    pub max_days_penalty: f64,
    pub preferred_day_reward: f64,
    pub preferred_location_reward: f64,
    pub preferred_time_reward: f64,
    pub max_gaps_penalty_per_minute: f64,
    pub contiguous_bonus: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            base: 500.0,
            conflict_penalty: 1000.0,
            gap_penalty_per_minute: 0.5,
            day_penalty_per_day: 75.0,
            compactness_reward: 50.0,
            rating_weight: 20.0,
            unavailable_day_penalty: 500.0,
            avoid_morning_penalty: 150.0,
            avoid_evening_penalty: 150.0,
            preferred_instructor_reward: 75.0,
            outside_window_penalty: 200.0,
            max_days_penalty: 100.0,
            preferred_day_reward: 50.0,
            preferred_location_reward: 50.0,
            preferred_time_reward: 50.0,
            max_gaps_penalty_per_minute: 1.0,
            contiguous_bonus: 100.0,
        }
    }
}

impl ScoreWeights {
    /// Defaults with named overrides applied; unrecognized keys are ignored.
    pub fn with_overrides(overrides: &HashMap<String, f64>) -> Self {
        let mut weights = Self::default();
        for (key, value) in overrides {
            match key.as_str() {
                "base" => weights.base = *value,
                "conflict_penalty" => weights.conflict_penalty = *value,
                "gap_penalty_per_minute" => weights.gap_penalty_per_minute = *value,
                "day_penalty_per_day" => weights.day_penalty_per_day = *value,
                "compactness_reward" => weights.compactness_reward = *value,
                "rating_weight" => weights.rating_weight = *value,
                "unavailable_day_penalty" => weights.unavailable_day_penalty = *value,
                "avoid_morning_penalty" => weights.avoid_morning_penalty = *value,
                "avoid_evening_penalty" => weights.avoid_evening_penalty = *value,
                "preferred_instructor_reward" => weights.preferred_instructor_reward = *value,
                "outside_window_penalty" => weights.outside_window_penalty = *value,
                "max_days_penalty" => weights.max_days_penalty = *value,
                "preferred_day_reward" => weights.preferred_day_reward = *value,
                "preferred_location_reward" => weights.preferred_location_reward = *value,
                "preferred_time_reward" => weights.preferred_time_reward = *value,
                "max_gaps_penalty_per_minute" => weights.max_gaps_penalty_per_minute = *value,
                "contiguous_bonus" => weights.contiguous_bonus = *value,
                _ => {}
            }
        }
        weights
    }
}

/// Conflicting course pair in a score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictPair {
    pub course1: String,
    pub course2: String,
    /// Overlapping day letters, sorted.
    pub days: String,
}

/// One applied preference penalty or reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceAdjustment {
    /// Absent for schedule-level adjustments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<f64>,
}

/// Score breakdown by formula term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub conflict_count: u32,
    pub conflicts: Vec<ConflictPair>,
    pub total_gaps_minutes: u32,
    pub distinct_days: u32,
    pub compactness_bonus: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f64>,
    pub preference_adjustments: Vec<PreferenceAdjustment>,
}

/// Score response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub weights: ScoreWeights,
}
