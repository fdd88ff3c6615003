//! Conflict-free term packing.

use std::cmp::Ordering;

use pathplanner_domain::CourseOffering;

use crate::timeslot::{DaySet, parse_clock_opt, times_overlap};

/// Instructor-preference bias added to a candidate's selection weight.
pub const INSTRUCTOR_WEIGHT_BONUS: f64 = 0.1;

/// One packable (course, offering) pair for a single term.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub course_code: String,
    pub offering: &'a CourseOffering,
    pub credits: i32,
    /// Credits plus the instructor bias. Maximized by the packer but never
    /// compared against the credit cap.
    pub weight: f64,
    days: DaySet,
    start: Option<u16>,
    end: Option<u16>,
}

impl<'a> Candidate<'a> {
    pub fn new(
        course_code: String,
        offering: &'a CourseOffering,
        credits: i32,
        preferred_instructor: bool,
    ) -> Self {
        let weight = f64::from(credits)
            + if preferred_instructor {
                INSTRUCTOR_WEIGHT_BONUS
            } else {
                0.0
            };
        Self {
            course_code,
            offering,
            credits,
            weight,
            days: DaySet::parse_opt(offering.days.as_deref()),
            start: parse_clock_opt(offering.start_time.as_deref()),
            end: parse_clock_opt(offering.end_time.as_deref()),
        }
    }

    /// Two candidates conflict when they share a day and their time ranges
    /// overlap. Unknown days or times cannot prove a conflict.
    pub fn conflicts_with(&self, other: &Candidate<'_>) -> bool {
        if self.days.is_empty() || other.days.is_empty() || !self.days.intersects(other.days) {
            return false;
        }
        match (self.start, self.end, other.start, other.end) {
            (Some(s1), Some(e1), Some(s2), Some(e2)) => times_overlap(s1, e1, s2, e2),
            _ => false,
        }
    }
}

struct Best {
    indices: Vec<usize>,
    weight: f64,
}

/// Select a conflict-free subset maximizing total weight with total credits
/// at most `credit_cap`, each course at most once.
///
/// Depth-first search over the weight-sorted candidate list with a running
/// best and a remaining-potential cutoff. Ties keep the first feasible set
/// found, i.e. the one earliest in sort order.
pub fn pack_term<'a>(mut candidates: Vec<Candidate<'a>>, credit_cap: i32) -> Vec<Candidate<'a>> {
    if candidates.is_empty() || credit_cap <= 0 {
        return Vec::new();
    }

    candidates.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));

    let n = candidates.len();
    let mut suffix_weight = vec![0.0; n + 1];
    for i in (0..n).rev() {
        suffix_weight[i] = suffix_weight[i + 1] + candidates[i].weight;
    }

    let mut best = Best {
        indices: Vec::new(),
        weight: 0.0,
    };
    let mut current: Vec<usize> = Vec::new();
    dfs(
        &candidates,
        &suffix_weight,
        credit_cap,
        0,
        &mut current,
        0,
        0.0,
        &mut best,
    );

    best.indices
        .iter()
        .map(|&i| candidates[i].clone())
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn dfs(
    candidates: &[Candidate<'_>],
    suffix_weight: &[f64],
    credit_cap: i32,
    idx: usize,
    current: &mut Vec<usize>,
    current_credits: i32,
    current_weight: f64,
    best: &mut Best,
) {
    if current_weight > best.weight {
        best.indices = current.clone();
        best.weight = current_weight;
    }
    if idx >= candidates.len() {
        return;
    }
    // nothing below can beat the incumbent
    if current_weight + suffix_weight[idx] <= best.weight {
        return;
    }

    for j in idx..candidates.len() {
        let candidate = &candidates[j];
        if current_credits + candidate.credits > credit_cap {
            continue;
        }
        if current
            .iter()
            .any(|&k| candidates[k].course_code == candidate.course_code)
        {
            continue;
        }
        if current
            .iter()
            .any(|&k| candidates[k].conflicts_with(candidate))
        {
            continue;
        }
        current.push(j);
        dfs(
            candidates,
            suffix_weight,
            credit_cap,
            j + 1,
            current,
            current_credits + candidate.credits,
            current_weight + candidate.weight,
            best,
        );
        current.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathplanner_domain::Term;

    fn offering(id: i32, days: &str, start: &str, end: &str) -> CourseOffering {
        CourseOffering {
            id,
            course_id: id,
            term: Term::Fall,
            year: None,
            section: None,
            days: Some(days.to_string()),
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
            instructor: None,
            location: None,
            capacity: None,
            enrolled: None,
            notes: None,
        }
    }

    fn codes<'a>(selection: &'a [Candidate<'a>]) -> Vec<&'a str> {
        selection.iter().map(|c| c.course_code.as_str()).collect()
    }

    #[test]
    fn packs_disjoint_courses_up_to_the_cap() {
        let a = offering(1, "MWF", "09:00AM", "09:50AM");
        let b = offering(2, "TR", "10:00AM", "11:15AM");
        let picked = pack_term(
            vec![
                Candidate::new("A".to_string(), &a, 3, false),
                Candidate::new("B".to_string(), &b, 3, false),
            ],
            6,
        );
        assert_eq!(codes(&picked).len(), 2);
    }

    #[test]
    fn conflicting_pair_keeps_only_one() {
        let a = offering(1, "MWF", "09:00", "10:00");
        let b = offering(2, "MWF", "09:30", "10:30");
        let picked = pack_term(
            vec![
                Candidate::new("A".to_string(), &a, 3, false),
                Candidate::new("B".to_string(), &b, 3, false),
            ],
            6,
        );
        assert_eq!(picked.len(), 1);
    }

    #[test]
    fn credit_cap_binds_on_credits_not_weight() {
        // the instructor bonus must not push a course over the cap
        let a = offering(1, "MWF", "09:00", "09:50");
        let b = offering(2, "TR", "10:00", "11:15");
        let picked = pack_term(
            vec![
                Candidate::new("A".to_string(), &a, 3, true),
                Candidate::new("B".to_string(), &b, 3, true),
            ],
            6,
        );
        assert_eq!(picked.len(), 2, "6 credits fit a 6-credit cap despite bonuses");
    }

    #[test]
    fn preferred_instructor_wins_conflicts() {
        let a = offering(1, "MWF", "09:00", "10:00");
        let b = offering(2, "MWF", "09:30", "10:30");
        let picked = pack_term(
            vec![
                Candidate::new("A".to_string(), &a, 3, false),
                Candidate::new("B".to_string(), &b, 3, true),
            ],
            6,
        );
        assert_eq!(codes(&picked), vec!["B"]);
    }

    #[test]
    fn maximizes_credits_over_greedy_first_fit() {
        // one 4-credit course conflicting with two 3-credit courses: the
        // pair is worth more than the single heavyweight
        let big = offering(1, "MWF", "09:00", "11:00");
        let left = offering(2, "MWF", "09:00", "09:50");
        let right = offering(3, "MWF", "10:00", "10:50");
        let picked = pack_term(
            vec![
                Candidate::new("BIG".to_string(), &big, 4, false),
                Candidate::new("L".to_string(), &left, 3, false),
                Candidate::new("R".to_string(), &right, 3, false),
            ],
            15,
        );
        let mut chosen = codes(&picked);
        chosen.sort_unstable();
        assert_eq!(chosen, vec!["L", "R"]);
    }

    #[test]
    fn duplicate_course_entries_collapse_to_one() {
        let s1 = offering(1, "MWF", "09:00", "09:50");
        let s2 = offering(2, "TR", "10:00", "11:15");
        let picked = pack_term(
            vec![
                Candidate::new("A".to_string(), &s1, 3, false),
                Candidate::new("A".to_string(), &s2, 3, false),
            ],
            15,
        );
        assert_eq!(picked.len(), 1);
    }

    #[test]
    fn zero_cap_packs_nothing() {
        let a = offering(1, "MWF", "09:00", "09:50");
        let picked = pack_term(vec![Candidate::new("A".to_string(), &a, 3, false)], 0);
        assert!(picked.is_empty());
    }

    #[test]
    fn missing_times_never_conflict() {
        let mut a = offering(1, "MWF", "09:00", "09:50");
        a.start_time = None;
        let b = offering(2, "MWF", "09:00", "09:50");
        let picked = pack_term(
            vec![
                Candidate::new("A".to_string(), &a, 3, false),
                Candidate::new("B".to_string(), &b, 3, false),
            ],
            15,
        );
        assert_eq!(picked.len(), 2);
    }
}
