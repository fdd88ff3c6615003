//! Greedy and load-balancing term planners.

use std::collections::{HashMap, HashSet};

use pathplanner_domain::{
    Course, CourseOffering, OfferingSnapshot, PlannedCourse, SeatStatus, TermLabel, TermPlan,
};

use crate::packer::{Candidate, pack_term};
use crate::prefs::PreferenceSet;
use crate::prereq::PrereqMap;
use crate::selector::{OfferingIndex, SeatLedger, offering_has_space};
use crate::timeslot::parse_clock_opt;

/// In-memory catalog snapshot for one planning request: the pathway's target
/// courses keyed by code, the prerequisite map, and the offering index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub courses: HashMap<String, Course>,
    pub prereqs: PrereqMap,
    pub offerings: OfferingIndex,
}

impl Catalog {
    pub fn new(target_courses: Vec<Course>, prereqs: PrereqMap, offerings: OfferingIndex) -> Self {
        let courses = target_courses
            .into_iter()
            .map(|c| (c.course_code.clone(), c))
            .collect();
        Self {
            courses,
            prereqs,
            offerings,
        }
    }
}

/// Planner parameters resolved from the request.
#[derive(Debug, Clone, Copy)]
pub struct PlanOptions {
    pub max_credits_per_term: i32,
    pub max_terms: u32,
    pub allow_overfull: bool,
    pub reserve_seats: bool,
    pub balance_load: bool,
    pub start: TermLabel,
}

/// Planner result: the term-by-term plan plus any target courses the
/// planner could not place within the horizon.
#[derive(Debug, Clone, Default)]
pub struct PlanOutcome {
    pub terms: Vec<TermPlan>,
    pub unscheduled: Vec<String>,
    /// Offerings held in-request under `reserve_seats`, with hold counts.
    pub ledger: SeatLedger,
}

/// Effective per-term credit cap: the request cap tightened by the stored
/// preference when that is smaller.
pub fn effective_credit_cap(request_cap: i32, prefs: &PreferenceSet) -> i32 {
    match prefs.max_credits_per_term {
        Some(pref_cap) => request_cap.min(pref_cap),
        None => request_cap,
    }
}

/// Plan every remaining target course into terms.
///
/// Greedy mode packs each term up to the effective cap and stops once no
/// progress is possible; load-balancing mode spreads total remaining credits
/// evenly over the full horizon and emits every term, including empty ones.
pub fn plan_schedule(
    catalog: &Catalog,
    prefs: &PreferenceSet,
    opts: &PlanOptions,
    completed: &HashSet<String>,
) -> PlanOutcome {
    if opts.balance_load {
        plan_balanced(catalog, prefs, opts, completed)
    } else {
        plan_greedy(catalog, prefs, opts, completed)
    }
}

fn plan_greedy(
    catalog: &Catalog,
    prefs: &PreferenceSet,
    opts: &PlanOptions,
    completed: &HashSet<String>,
) -> PlanOutcome {
    let credit_cap = effective_credit_cap(opts.max_credits_per_term, prefs);
    let mut completed = completed.clone();
    let mut remaining: HashSet<String> = catalog
        .courses
        .keys()
        .filter(|code| !completed.contains(*code))
        .cloned()
        .collect();

    let mut plan = Vec::new();
    let mut ledger = SeatLedger::new();
    let mut label = opts.start;
    let mut term_count = 0u32;

    while !remaining.is_empty() && term_count < opts.max_terms {
        term_count += 1;

        let mut eligible: Vec<&str> = remaining
            .iter()
            .filter(|code| catalog.prereqs.eligible(code, &completed))
            .map(String::as_str)
            .collect();
        eligible.sort_unstable();

        let candidates = term_candidates(catalog, prefs, label, opts.allow_overfull, &ledger, &eligible);
        let selected = pack_term(candidates, credit_cap);
        let entry = emit_term(catalog, label, &selected, opts, &mut ledger);

        if entry.courses.is_empty() {
            if eligible.is_empty() {
                tracing::warn!(
                    semester = %label,
                    remaining = remaining.len(),
                    "no eligible courses remain; stopping with a partial plan"
                );
                break;
            }
            label = label.successor();
            continue;
        }

        for planned in &entry.courses {
            completed.insert(planned.course_code.clone());
            remaining.remove(&planned.course_code);
        }
        plan.push(entry);
        label = label.successor();
    }

    let mut unscheduled: Vec<String> = remaining.into_iter().collect();
    unscheduled.sort_unstable();
    PlanOutcome {
        terms: plan,
        unscheduled,
        ledger,
    }
}

fn plan_balanced(
    catalog: &Catalog,
    prefs: &PreferenceSet,
    opts: &PlanOptions,
    completed: &HashSet<String>,
) -> PlanOutcome {
    let credit_cap = effective_credit_cap(opts.max_credits_per_term, prefs);
    if opts.max_terms == 0 {
        let mut unscheduled: Vec<String> = catalog
            .courses
            .keys()
            .filter(|code| !completed.contains(*code))
            .cloned()
            .collect();
        unscheduled.sort_unstable();
        return PlanOutcome {
            unscheduled,
            ..Default::default()
        };
    }

    let total_remaining: i32 = catalog
        .courses
        .values()
        .filter(|c| !completed.contains(&c.course_code))
        .map(|c| c.credits)
        .sum();
    let terms = opts.max_terms as i32;
    let target_credits = credit_cap.min(((total_remaining + terms - 1) / terms).max(1));

    let mut scheduled = completed.clone();
    let mut plan = Vec::new();
    let mut ledger = SeatLedger::new();
    let mut label = opts.start;

    for _ in 0..opts.max_terms {
        let mut eligible: Vec<&str> = catalog
            .courses
            .keys()
            .filter(|code| !scheduled.contains(*code))
            .filter(|code| catalog.prereqs.eligible(code, &scheduled))
            .map(String::as_str)
            .collect();
        eligible.sort_unstable();

        let candidates = term_candidates(catalog, prefs, label, opts.allow_overfull, &ledger, &eligible);
        let selected = pack_term(candidates, target_credits);
        let entry = emit_term(catalog, label, &selected, opts, &mut ledger);

        for planned in &entry.courses {
            scheduled.insert(planned.course_code.clone());
        }
        plan.push(entry);
        label = label.successor();
    }

    let mut unscheduled: Vec<String> = catalog
        .courses
        .keys()
        .filter(|code| !scheduled.contains(*code))
        .cloned()
        .collect();
    unscheduled.sort_unstable();
    PlanOutcome {
        terms: plan,
        unscheduled,
        ledger,
    }
}

/// Build packer candidates for one term: select an offering per eligible
/// course, then apply the hard preference filters.
fn term_candidates<'a>(
    catalog: &'a Catalog,
    prefs: &PreferenceSet,
    label: TermLabel,
    allow_overfull: bool,
    ledger: &SeatLedger,
    eligible: &[&str],
) -> Vec<Candidate<'a>> {
    let mut candidates = Vec::new();
    for code in eligible {
        let Some(course) = catalog.courses.get(*code) else {
            continue;
        };
        let Some(offering) =
            catalog
                .offerings
                .select(course.id, label, prefs, allow_overfull, ledger)
        else {
            continue;
        };
        if !admitted_by_preferences(offering, prefs) {
            continue;
        }
        if !offering_has_space(offering, ledger) && !allow_overfull {
            continue;
        }
        candidates.push(Candidate::new(
            (*code).to_string(),
            offering,
            course.credits,
            prefs.prefers_instructor(offering.instructor.as_deref()),
        ));
    }
    candidates
}

/// Hard preference filters: unavailable days and morning/evening avoidance
/// drop an offering outright.
fn admitted_by_preferences(offering: &CourseOffering, prefs: &PreferenceSet) -> bool {
    if !prefs.unavailable_days.is_empty() {
        let days = crate::timeslot::DaySet::parse_opt(offering.days.as_deref());
        if days.intersects(prefs.unavailable_days) {
            return false;
        }
    }
    if let Some(start) = parse_clock_opt(offering.start_time.as_deref()) {
        if prefs.avoid_mornings && start < PreferenceSet::MORNING_CUTOFF {
            return false;
        }
        if prefs.avoid_evenings && start >= PreferenceSet::EVENING_START {
            return false;
        }
    }
    true
}

/// Materialize one term entry, skipping sections that are full unless
/// overfull placement is allowed, and recording holds in `reserve_seats`
/// mode.
fn emit_term(
    catalog: &Catalog,
    label: TermLabel,
    selected: &[Candidate<'_>],
    opts: &PlanOptions,
    ledger: &mut SeatLedger,
) -> TermPlan {
    let mut courses = Vec::new();
    let mut total_credits = 0;

    for candidate in selected {
        let Some(course) = catalog.courses.get(&candidate.course_code) else {
            continue;
        };
        let snapshot = snapshot_offering(candidate.offering, ledger);
        if snapshot.status == SeatStatus::Full && !opts.allow_overfull {
            continue;
        }
        if opts.reserve_seats && candidate.offering.enrolled.is_some() {
            ledger.hold(candidate.offering.id);
        }
        total_credits += course.credits;
        courses.push(PlannedCourse {
            course_code: course.course_code.clone(),
            name: course.name.clone(),
            credits: course.credits,
            offering: Some(snapshot),
        });
    }

    TermPlan {
        semester: label.to_string(),
        courses,
        total_credits,
    }
}

/// Offering snapshot with in-request holds folded into the enrolled count.
pub(crate) fn snapshot_offering(offering: &CourseOffering, ledger: &SeatLedger) -> OfferingSnapshot {
    let enrolled = offering
        .enrolled
        .map(|enrolled| enrolled + ledger.held(offering.id));
    let status = match (offering.capacity, enrolled) {
        (Some(capacity), Some(enrolled)) if enrolled >= capacity => SeatStatus::Full,
        _ => SeatStatus::Confirmed,
    };
    OfferingSnapshot {
        id: offering.id,
        section: offering.section.clone(),
        days: offering.days.clone(),
        start_time: offering.start_time.clone(),
        end_time: offering.end_time.clone(),
        instructor: offering.instructor.clone(),
        location: offering.location.clone(),
        capacity: offering.capacity,
        enrolled,
        status,
    }
}
