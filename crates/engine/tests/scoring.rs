//! Scorer behavior against the default weight table.

use assert_float_eq::assert_float_absolute_eq;

use pathplanner_domain::ScoreWeights;
use pathplanner_engine::{DaySet, PreferenceSet, ScoredCourse, score_courses};

fn scored(id: i32, code: &str, days: &str, start: u16, end: u16) -> ScoredCourse {
    ScoredCourse {
        id,
        course_code: code.to_string(),
        semester: Some("Fall 2025".to_string()),
        days: DaySet::parse(days),
        start: Some(start),
        end: Some(end),
        instructor: None,
        location: None,
    }
}

#[test]
fn conflicting_pair_costs_exactly_one_conflict_penalty() {
    let weights = ScoreWeights::default();
    let a = scored(1, "A", "MWF", 9 * 60, 10 * 60);
    let b = scored(2, "B", "MWF", 9 * 60 + 30, 10 * 60 + 30);

    let clash = score_courses(&[a.clone(), b.clone()], &weights, None, None);
    assert_eq!(clash.breakdown.conflict_count, 1);
    assert_eq!(clash.breakdown.conflicts[0].days, "MWF");

    let mut apart = b;
    apart.start = Some(10 * 60);
    apart.end = Some(11 * 60);
    let clean = score_courses(&[a, apart], &weights, None, None);
    assert_eq!(clean.breakdown.conflict_count, 0);

    // identical day spread and gap structure, so the delta is the penalty
    assert_float_absolute_eq!(clean.score - clash.score, 1000.0, 1e-9);
}

#[test]
fn different_semesters_never_conflict() {
    let weights = ScoreWeights::default();
    let mut a = scored(1, "A", "MWF", 540, 600);
    let mut b = scored(2, "B", "MWF", 540, 600);
    a.semester = Some("Fall 2025".to_string());
    b.semester = Some("Spring 2026".to_string());

    let result = score_courses(&[a, b], &weights, None, None);
    assert_eq!(result.breakdown.conflict_count, 0);
}

#[test]
fn gaps_accumulate_per_day() {
    let weights = ScoreWeights::default();
    // 60 idle minutes on each of M, W
    let a = scored(1, "A", "MW", 540, 590);
    let b = scored(2, "B", "MW", 650, 700);

    let result = score_courses(&[a, b], &weights, None, None);
    assert_eq!(result.breakdown.total_gaps_minutes, 120);
}

#[test]
fn avoid_mornings_penalty_is_exact() {
    let weights = ScoreWeights::default();
    let mut prefs = PreferenceSet::default();
    prefs.avoid_mornings = true;

    let morning = scored(1, "A", "MW", 8 * 60 + 30, 9 * 60 + 20);
    let afternoon = scored(1, "A", "MW", 13 * 60, 13 * 60 + 50);

    let m = score_courses(&[morning], &weights, Some(&prefs), None);
    let a = score_courses(&[afternoon], &weights, Some(&prefs), None);

    assert_float_absolute_eq!(a.score - m.score, 150.0, 1e-9);
    let adjustment = &m.breakdown.preference_adjustments[0];
    assert_eq!(adjustment.reason, "avoid_morning");
    assert_eq!(adjustment.penalty, Some(150.0));
    assert!(a.breakdown.preference_adjustments.is_empty());
}

#[test]
fn rating_term_scales_with_course_count() {
    let weights = ScoreWeights::default();
    let a = scored(1, "A", "M", 540, 590);
    let b = scored(2, "B", "T", 540, 590);

    let unrated = score_courses(&[a.clone(), b.clone()], &weights, None, None);
    let rated = score_courses(&[a, b], &weights, None, Some(4.5));

    assert_float_absolute_eq!(rated.score - unrated.score, 4.5 * 20.0 * 2.0, 1e-9);
    assert_eq!(rated.breakdown.avg_rating, Some(4.5));
}

#[test]
fn compactness_rewards_fewer_weekdays() {
    let weights = ScoreWeights::default();
    let one_day = score_courses(&[scored(1, "A", "M", 540, 590)], &weights, None, None);
    assert_eq!(one_day.breakdown.distinct_days, 1);
    assert_float_absolute_eq!(one_day.breakdown.compactness_bonus, 200.0, 1e-9);

    // Saturday is not part of the weekday spread
    let weekend = score_courses(&[scored(1, "A", "S", 540, 590)], &weights, None, None);
    assert_eq!(weekend.breakdown.distinct_days, 0);
}

#[test]
fn preference_rewards_apply_per_course() {
    let weights = ScoreWeights::default();
    let mut prefs = PreferenceSet::default();
    prefs.preferred_instructors.insert("goldschmidt".to_string());
    prefs.preferred_days = DaySet::parse("MW");

    let mut course = scored(1, "A", "MW", 13 * 60, 13 * 60 + 50);
    course.instructor = Some("Goldschmidt".to_string());

    let plain = score_courses(
        &[scored(1, "A", "TR", 13 * 60, 13 * 60 + 50)],
        &weights,
        Some(&prefs),
        None,
    );
    let favored = score_courses(&[course], &weights, Some(&prefs), None);

    // instructor (+75) and preferred day (+50); day spread is identical at
    // two weekdays either way
    assert_float_absolute_eq!(favored.score - plain.score, 125.0, 1e-9);
}

#[test]
fn window_and_gap_limits_penalize() {
    let weights = ScoreWeights::default();
    let mut prefs = PreferenceSet::default();
    prefs.earliest_start = Some(9 * 60);
    prefs.max_gaps_per_day = Some(30);

    let early = scored(1, "A", "M", 8 * 60, 8 * 60 + 50);
    let late = scored(2, "B", "M", 10 * 60, 10 * 60 + 50);
    let result = score_courses(&[early, late], &weights, Some(&prefs), None);

    // 70-minute gap, 40 over the limit at 1.0 per minute
    let gap_penalty: f64 = result
        .breakdown
        .preference_adjustments
        .iter()
        .filter(|adj| adj.reason == "max_gaps_per_day")
        .filter_map(|adj| adj.penalty)
        .sum();
    assert_float_absolute_eq!(gap_penalty, 40.0, 1e-9);
    assert!(
        result
            .breakdown
            .preference_adjustments
            .iter()
            .any(|adj| adj.reason == "before_earliest_start" && adj.penalty == Some(200.0))
    );
}

#[test]
fn contiguous_bonus_shrinks_with_gaps() {
    let weights = ScoreWeights::default();
    let mut prefs = PreferenceSet::default();
    prefs.contiguous_classes = true;

    let a = scored(1, "A", "M", 540, 590);
    let b = scored(2, "B", "M", 890, 940);
    let result = score_courses(&[a, b], &weights, Some(&prefs), None);

    // 300 idle minutes: max(0, 100 - 0.2 * 300) = 40
    let bonus = result
        .breakdown
        .preference_adjustments
        .iter()
        .find(|adj| adj.reason == "contiguous_classes")
        .and_then(|adj| adj.reward)
        .unwrap();
    assert_float_absolute_eq!(bonus, 40.0, 1e-9);
}

#[test]
fn scorer_is_deterministic() {
    let weights = ScoreWeights::default();
    let mut prefs = PreferenceSet::default();
    prefs.avoid_evenings = true;
    prefs.preferred_days = DaySet::parse("TR");

    let courses = vec![
        scored(1, "A", "MWF", 540, 590),
        scored(2, "B", "TR", 1020, 1100),
        scored(3, "C", "MWF", 600, 650),
    ];

    let first = score_courses(&courses, &weights, Some(&prefs), Some(3.7));
    let second = score_courses(&courses, &weights, Some(&prefs), Some(3.7));
    assert_eq!(first, second);
    assert!(first.score.to_bits() == second.score.to_bits());
}

#[test]
fn removing_a_neutral_course_shifts_only_structural_terms() {
    // dropping a non-conflicting, unrated, preference-neutral course must
    // change the score by day-spread and compactness alone
    let weights = ScoreWeights::default();
    let a = scored(1, "A", "M", 540, 590);
    let b = scored(2, "B", "T", 540, 590);

    let with_both = score_courses(&[a.clone(), b], &weights, None, None);
    let just_a = score_courses(&[a], &weights, None, None);

    let expected_delta = weights.day_penalty_per_day + weights.compactness_reward;
    assert_float_absolute_eq!(just_a.score - with_both.score, expected_delta, 1e-9);
}

#[test]
fn weight_overrides_flow_into_the_formula() {
    let overrides =
        std::collections::HashMap::from([("conflict_penalty".to_string(), 10.0)]);
    let weights = ScoreWeights::with_overrides(&overrides);

    let a = scored(1, "A", "MWF", 540, 600);
    let b = scored(2, "B", "MWF", 570, 630);
    let result = score_courses(&[a, b], &weights, None, None);

    assert_eq!(result.breakdown.conflict_count, 1);
    assert_eq!(result.weights.conflict_penalty, 10.0);
    let default_result = score_courses(
        &[
            scored(1, "A", "MWF", 540, 600),
            scored(2, "B", "MWF", 570, 630),
        ],
        &ScoreWeights::default(),
        None,
        None,
    );
    assert_float_absolute_eq!(result.score - default_result.score, 990.0, 1e-9);
}
