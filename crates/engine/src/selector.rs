//! Offering selection for a (course, term) pair.

use std::collections::HashMap;

use pathplanner_domain::{CourseOffering, Term, TermLabel};

use crate::prefs::PreferenceSet;

/// In-request seat bookkeeping for `reserve_seats` mode.
///
/// Holds taken earlier in the same planning request count against capacity
/// for later admission tests; persistence is the caller's concern.
#[derive(Debug, Clone, Default)]
pub struct SeatLedger {
    held: HashMap<i32, i32>,
}

impl SeatLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self, offering_id: i32) -> i32 {
        self.held.get(&offering_id).copied().unwrap_or(0)
    }

    pub fn hold(&mut self, offering_id: i32) {
        *self.held.entry(offering_id).or_insert(0) += 1;
    }

    /// Offering ids with at least one hold, unordered.
    pub fn offering_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.held.keys().copied()
    }
}

/// Offerings indexed by (course_id, term), built once per request.
#[derive(Debug, Clone, Default)]
pub struct OfferingIndex {
    offerings: Vec<CourseOffering>,
    by_course_term: HashMap<(i32, Term), Vec<usize>>,
}

impl OfferingIndex {
    pub fn new(offerings: Vec<CourseOffering>) -> Self {
        let mut by_course_term: HashMap<(i32, Term), Vec<usize>> = HashMap::new();
        for (i, offering) in offerings.iter().enumerate() {
            by_course_term
                .entry((offering.course_id, offering.term))
                .or_default()
                .push(i);
        }
        Self {
            offerings,
            by_course_term,
        }
    }

    /// Candidate offerings for a course in a labeled term: exact-year
    /// matches first, then recurring (null-year) sections.
    pub fn candidates(&self, course_id: i32, label: TermLabel) -> Vec<&CourseOffering> {
        let Some(indices) = self.by_course_term.get(&(course_id, label.term)) else {
            return Vec::new();
        };
        let mut exact = Vec::new();
        let mut recurring = Vec::new();
        for &i in indices {
            match self.offerings[i].year {
                Some(year) if year == label.year => exact.push(&self.offerings[i]),
                None => recurring.push(&self.offerings[i]),
                Some(_) => {}
            }
        }
        exact.extend(recurring);
        exact
    }

    /// Pick the best offering for (course, term): rank by seat availability
    /// then preferred instructor, and return the top candidate if it has
    /// space or overfull placement is allowed.
    pub fn select(
        &self,
        course_id: i32,
        label: TermLabel,
        prefs: &PreferenceSet,
        allow_overfull: bool,
        ledger: &SeatLedger,
    ) -> Option<&CourseOffering> {
        let mut candidates = self.candidates(course_id, label);
        if candidates.is_empty() {
            return None;
        }

        let rank = |offering: &CourseOffering| {
            let space = offering_has_space(offering, ledger) as u8;
            let instructor = prefs.prefers_instructor(offering.instructor.as_deref()) as u8;
            std::cmp::Reverse((space, instructor))
        };
        candidates.sort_by_key(|offering| rank(offering));

        let top = candidates[0];
        if offering_has_space(top, ledger) || allow_overfull {
            Some(top)
        } else {
            None
        }
    }

    /// Whether any offering admits the course in this term, used by the
    /// exact planner's availability grid.
    pub fn has_admissible(
        &self,
        course_id: i32,
        label: TermLabel,
        allow_overfull: bool,
        ledger: &SeatLedger,
    ) -> bool {
        let candidates = self.candidates(course_id, label);
        if candidates.is_empty() {
            return false;
        }
        allow_overfull
            || candidates
                .iter()
                .any(|offering| offering_has_space(offering, ledger))
    }
}

/// Seat availability including in-request holds. Uncapped offerings and
/// offerings without an enrollment counter always have space.
pub fn offering_has_space(offering: &CourseOffering, ledger: &SeatLedger) -> bool {
    match (offering.capacity, offering.enrolled) {
        (Some(capacity), Some(enrolled)) => enrolled + ledger.held(offering.id) < capacity,
        _ => true,
    }
}
