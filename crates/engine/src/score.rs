//! Quantitative schedule scoring against hard and soft preferences.

use itertools::Itertools;

use pathplanner_domain::{
    ConflictPair, Course, PreferenceAdjustment, ScoreBreakdown, ScoreResponse, ScoreWeights,
};

use crate::prefs::{PreferenceSet, TimeOfDay};
use crate::timeslot::{DaySet, gap_minutes, minute_of_day, times_overlap};

/// Course-like record fed to the scorer.
#[derive(Debug, Clone)]
pub struct ScoredCourse {
    pub id: i32,
    pub course_code: String,
    pub semester: Option<String>,
    pub days: DaySet,
    pub start: Option<u16>,
    pub end: Option<u16>,
    pub instructor: Option<String>,
    pub location: Option<String>,
}

impl From<&Course> for ScoredCourse {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            course_code: course.course_code.clone(),
            semester: Some(course.semester.clone()),
            days: DaySet::parse_opt(course.days_of_week.as_deref()),
            start: course.start_time.map(minute_of_day),
            end: course.end_time.map(minute_of_day),
            instructor: course.instructor.clone(),
            location: course.location.clone(),
        }
    }
}

impl ScoredCourse {
    fn has_meeting(&self) -> bool {
        !self.days.is_empty() && self.start.is_some() && self.end.is_some()
    }
}

/// Days the gap accumulator walks, in canonical order.
const GAP_DAYS: &str = "MTWRFS";

/// Score a schedule. Deterministic: identical inputs produce a bit-identical
/// response.
pub fn score_courses(
    courses: &[ScoredCourse],
    weights: &ScoreWeights,
    prefs: Option<&PreferenceSet>,
    avg_rating: Option<f64>,
) -> ScoreResponse {
    // pairwise conflicts within one semester
    let mut conflicts = Vec::new();
    for (i, c1) in courses.iter().enumerate() {
        for c2 in &courses[i + 1..] {
            if c1.id == c2.id {
                continue;
            }
            if let (Some(s1), Some(s2)) = (&c1.semester, &c2.semester) {
                if s1 != s2 {
                    continue;
                }
            }
            if !c1.has_meeting() || !c2.has_meeting() {
                continue;
            }
            let shared = c1.days.intersection(c2.days);
            if !shared.is_empty()
                && times_overlap(
                    c1.start.unwrap(),
                    c1.end.unwrap(),
                    c2.start.unwrap(),
                    c2.end.unwrap(),
                )
            {
                conflicts.push(ConflictPair {
                    course1: c1.course_code.clone(),
                    course2: c2.course_code.clone(),
                    days: shared.to_string(),
                });
            }
        }
    }
    let conflict_count = conflicts.len() as u32;

    // idle minutes between consecutive classes, per day
    let mut total_gaps: u32 = 0;
    let mut gaps_by_day: Vec<(char, u32)> = Vec::new();
    for day in GAP_DAYS.chars() {
        let day_courses: Vec<&ScoredCourse> = courses
            .iter()
            .filter(|c| c.days.contains(day) && c.start.is_some() && c.end.is_some())
            .sorted_by_key(|c| c.start.unwrap())
            .collect();
        let mut day_gaps: u32 = 0;
        for (a, b) in day_courses.iter().tuple_windows() {
            day_gaps += u32::from(gap_minutes(a.end.unwrap(), b.start.unwrap()));
        }
        if day_gaps > 0 {
            gaps_by_day.push((day, day_gaps));
        }
        total_gaps += day_gaps;
    }

    // distinct weekdays used, against a five-day baseline
    let mut all_days = DaySet::EMPTY;
    for course in courses {
        all_days = all_days.union(course.days);
    }
    let distinct_days = all_days.weekdays().len();
    let compactness_bonus = f64::from(5u32.saturating_sub(distinct_days)) * weights.compactness_reward;

    let mut score = weights.base;
    score -= f64::from(conflict_count) * weights.conflict_penalty;
    score -= f64::from(total_gaps) * weights.gap_penalty_per_minute;
    score -= f64::from(distinct_days) * weights.day_penalty_per_day;
    score += compactness_bonus;
    if let Some(rating) = avg_rating {
        score += rating * weights.rating_weight * courses.len() as f64;
    }

    let mut adjustments = Vec::new();
    if let Some(prefs) = prefs {
        score += apply_preferences(
            courses,
            prefs,
            weights,
            distinct_days,
            total_gaps,
            &gaps_by_day,
            &mut adjustments,
        );
    }

    ScoreResponse {
        score,
        breakdown: ScoreBreakdown {
            base: weights.base,
            conflict_count,
            conflicts,
            total_gaps_minutes: total_gaps,
            distinct_days,
            compactness_bonus,
            avg_rating,
            preference_adjustments: adjustments,
        },
        weights: weights.clone(),
    }
}

/// Per-course and schedule-level preference effects. Returns the net score
/// delta and records every applied term.
fn apply_preferences(
    courses: &[ScoredCourse],
    prefs: &PreferenceSet,
    weights: &ScoreWeights,
    distinct_days: u32,
    total_gaps: u32,
    gaps_by_day: &[(char, u32)],
    adjustments: &mut Vec<PreferenceAdjustment>,
) -> f64 {
    let mut delta = 0.0;
    let mut penalize = |course: Option<&str>, reason: &str, amount: f64, delta: &mut f64| {
        *delta -= amount;
        adjustments.push(PreferenceAdjustment {
            course: course.map(str::to_string),
            reason: reason.to_string(),
            penalty: Some(amount),
            reward: None,
        });
    };

    for course in courses {
        if !prefs.unavailable_days.is_empty() && course.days.intersects(prefs.unavailable_days) {
            penalize(
                Some(&course.course_code),
                "unavailable_day",
                weights.unavailable_day_penalty,
                &mut delta,
            );
        }
        if prefs.avoid_mornings
            && course
                .start
                .is_some_and(|start| start < PreferenceSet::MORNING_CUTOFF)
        {
            penalize(
                Some(&course.course_code),
                "avoid_morning",
                weights.avoid_morning_penalty,
                &mut delta,
            );
        }
        if prefs.avoid_evenings
            && course
                .end
                .is_some_and(|end| end >= PreferenceSet::EVENING_START)
        {
            penalize(
                Some(&course.course_code),
                "avoid_evening",
                weights.avoid_evening_penalty,
                &mut delta,
            );
        }
        if let Some(earliest) = prefs.earliest_start {
            if course.start.is_some_and(|start| start < earliest) {
                penalize(
                    Some(&course.course_code),
                    "before_earliest_start",
                    weights.outside_window_penalty,
                    &mut delta,
                );
            }
        }
        if let Some(latest) = prefs.latest_end {
            if course.end.is_some_and(|end| end > latest) {
                penalize(
                    Some(&course.course_code),
                    "after_latest_end",
                    weights.outside_window_penalty,
                    &mut delta,
                );
            }
        }
    }

    if let Some(max_days) = prefs.max_days_per_week {
        if distinct_days > max_days {
            penalize(None, "max_days_per_week", weights.max_days_penalty, &mut delta);
        }
    }
    if let Some(max_gap) = prefs.max_gaps_per_day {
        for (_, day_gaps) in gaps_by_day {
            if *day_gaps > u32::from(max_gap) {
                let excess = f64::from(*day_gaps - u32::from(max_gap));
                penalize(
                    None,
                    "max_gaps_per_day",
                    excess * weights.max_gaps_penalty_per_minute,
                    &mut delta,
                );
            }
        }
    }

    let mut reward = |course: Option<&str>, reason: &str, amount: f64, delta: &mut f64| {
        *delta += amount;
        adjustments.push(PreferenceAdjustment {
            course: course.map(str::to_string),
            reason: reason.to_string(),
            penalty: None,
            reward: Some(amount),
        });
    };

    for course in courses {
        if prefs.prefers_instructor(course.instructor.as_deref()) {
            reward(
                Some(&course.course_code),
                "preferred_instructor",
                weights.preferred_instructor_reward,
                &mut delta,
            );
        }
        if !prefs.preferred_days.is_empty() && course.days.intersects(prefs.preferred_days) {
            reward(
                Some(&course.course_code),
                "preferred_day",
                weights.preferred_day_reward,
                &mut delta,
            );
        }
        if prefs.prefers_location(course.location.as_deref()) {
            reward(
                Some(&course.course_code),
                "preferred_location",
                weights.preferred_location_reward,
                &mut delta,
            );
        }
        let time_matches = match prefs.preferred_time_of_day {
            TimeOfDay::Morning => course.start.is_some_and(|s| s < PreferenceSet::NOON),
            TimeOfDay::Afternoon => course.start.is_some_and(|s| s >= PreferenceSet::NOON),
            TimeOfDay::None => false,
        };
        if time_matches {
            reward(
                Some(&course.course_code),
                "preferred_time_of_day",
                weights.preferred_time_reward,
                &mut delta,
            );
        }
    }

    if prefs.contiguous_classes {
        let bonus = (weights.contiguous_bonus - 0.2 * f64::from(total_gaps)).max(0.0);
        reward(None, "contiguous_classes", bonus, &mut delta);
    }

    delta
}
