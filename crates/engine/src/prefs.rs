//! Parsed preference set used by the planner and scorer.

use std::collections::HashSet;

use pathplanner_domain::StudentPreferences;

use crate::timeslot::{DaySet, minute_of_day};

/// Preferred part of day for the scorer's time-of-day reward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    #[default]
    None,
}

/// Student preferences with day sets, minute bounds and lowercased match
/// sets resolved once per request.
#[derive(Debug, Clone, Default)]
pub struct PreferenceSet {
    pub max_credits_per_term: Option<i32>,
    pub unavailable_days: DaySet,
    pub avoid_mornings: bool,
    pub avoid_evenings: bool,
    pub preferred_instructors: HashSet<String>,
    pub earliest_start: Option<u16>,
    pub latest_end: Option<u16>,
    pub max_days_per_week: Option<u32>,
    pub preferred_days: DaySet,
    pub max_gaps_per_day: Option<u16>,
    pub contiguous_classes: bool,
    pub preferred_locations: HashSet<String>,
    pub preferred_time_of_day: TimeOfDay,
}

impl PreferenceSet {
    /// Morning starts before 10:00.
    pub const MORNING_CUTOFF: u16 = 10 * 60;
    /// Evening classes end at or after 18:00.
    pub const EVENING_START: u16 = 18 * 60;
    /// Noon splits the time-of-day reward.
    pub const NOON: u16 = 12 * 60;

    pub fn prefers_instructor(&self, instructor: Option<&str>) -> bool {
        match instructor {
            Some(name) if !self.preferred_instructors.is_empty() => self
                .preferred_instructors
                .contains(&name.trim().to_lowercase()),
            _ => false,
        }
    }

    pub fn prefers_location(&self, location: Option<&str>) -> bool {
        match location {
            Some(name) if !self.preferred_locations.is_empty() => self
                .preferred_locations
                .contains(&name.trim().to_lowercase()),
            _ => false,
        }
    }
}

fn csv_set(raw: Option<&str>) -> HashSet<String> {
    raw.map(|s| {
        s.split(',')
            .map(|item| item.trim().to_lowercase())
            .filter(|item| !item.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

impl From<&StudentPreferences> for PreferenceSet {
    fn from(stored: &StudentPreferences) -> Self {
        let preferred_time_of_day = match stored.preferred_time_of_day.as_deref() {
            Some(raw) if raw.eq_ignore_ascii_case("morning") => TimeOfDay::Morning,
            Some(raw) if raw.eq_ignore_ascii_case("afternoon") => TimeOfDay::Afternoon,
            _ => TimeOfDay::None,
        };
        Self {
            max_credits_per_term: stored.max_credits_per_term,
            unavailable_days: DaySet::parse_opt(stored.unavailable_days.as_deref()),
            avoid_mornings: stored.avoid_mornings,
            avoid_evenings: stored.avoid_evenings,
            preferred_instructors: csv_set(stored.preferred_instructors.as_deref()),
            earliest_start: stored.earliest_start_time.map(minute_of_day),
            latest_end: stored.latest_end_time.map(minute_of_day),
            max_days_per_week: stored.max_days_per_week.and_then(|n| u32::try_from(n).ok()),
            preferred_days: DaySet::parse_opt(stored.preferred_days.as_deref()),
            max_gaps_per_day: stored.max_gaps_per_day.and_then(|n| u16::try_from(n).ok()),
            contiguous_classes: stored.contiguous_classes,
            preferred_locations: csv_set(stored.preferred_locations.as_deref()),
            preferred_time_of_day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn csv_lists_are_trimmed_and_lowercased() {
        let stored = StudentPreferences {
            preferred_instructors: Some(" Goldschmidt , TURNER,".to_string()),
            ..Default::default()
        };
        let prefs = PreferenceSet::from(&stored);
        assert!(prefs.prefers_instructor(Some("goldschmidt")));
        assert!(prefs.prefers_instructor(Some("Turner ")));
        assert!(!prefs.prefers_instructor(Some("Xiao")));
        assert!(!prefs.prefers_instructor(None));
    }

    #[test]
    fn empty_preference_sets_match_nothing() {
        let prefs = PreferenceSet::default();
        assert!(!prefs.prefers_instructor(Some("anyone")));
        assert!(!prefs.prefers_location(Some("anywhere")));
    }

    #[test]
    fn time_bounds_become_minutes() {
        let stored = StudentPreferences {
            earliest_start_time: NaiveTime::from_hms_opt(9, 0, 0),
            latest_end_time: NaiveTime::from_hms_opt(17, 30, 0),
            preferred_time_of_day: Some("Afternoon".to_string()),
            ..Default::default()
        };
        let prefs = PreferenceSet::from(&stored);
        assert_eq!(prefs.earliest_start, Some(540));
        assert_eq!(prefs.latest_end, Some(1050));
        assert_eq!(prefs.preferred_time_of_day, TimeOfDay::Afternoon);
    }
}
