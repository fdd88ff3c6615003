//! Exact course-term assignment via integer programming.

use std::collections::{HashMap, HashSet};

use good_lp::{
    Expression, ProblemVariables, Solution, SolverModel, Variable, constraint, default_solver,
    variable,
};

use pathplanner_domain::{Course, PlannedCourse, TermPlan};

use crate::planner::{Catalog, PlanOptions, PlanOutcome, effective_credit_cap, snapshot_offering};
use crate::prefs::PreferenceSet;
use crate::selector::SeatLedger;

/// Solver controls for the exact planner.
#[derive(Debug, Clone, Copy)]
pub struct ExactOptions {
    /// Wall-clock bound for the search, in seconds.
    pub time_limit_seconds: u64,
    /// Worker threads for the parallel search.
    pub workers: u32,
}

impl Default for ExactOptions {
    fn default() -> Self {
        Self {
            time_limit_seconds: 20,
            workers: 8,
        }
    }
}

/// Assign every remaining course to a term with binary variables
/// x[course, term], subject to uniqueness, prerequisite ordering and the
/// per-term credit cap.
///
/// Scheduling earlier is worth more: the model maximizes
/// `credits * (horizon - term)` over chosen assignments, which orders any
/// fixed set of scheduled courses exactly like minimizing
/// `term * credits`, and always prefers placing a course to dropping it.
/// Courses that cannot be placed stay in `unscheduled` and the plan is
/// best-effort. Section-level time conflicts are not modeled here; the
/// heuristic planner remains the default.
pub fn plan_schedule_exact(
    catalog: &Catalog,
    prefs: &PreferenceSet,
    opts: &PlanOptions,
    solver_opts: &ExactOptions,
    completed: &HashSet<String>,
) -> PlanOutcome {
    let mut remaining: Vec<&Course> = catalog
        .courses
        .values()
        .filter(|c| !completed.contains(&c.course_code))
        .collect();
    remaining.sort_by(|a, b| a.course_code.cmp(&b.course_code));
    if remaining.is_empty() || opts.max_terms == 0 {
        return PlanOutcome::default();
    }

    let ledger = SeatLedger::new();
    let credit_cap = effective_credit_cap(opts.max_credits_per_term, prefs);

    let mut labels = Vec::with_capacity(opts.max_terms as usize);
    let mut label = opts.start;
    for _ in 0..opts.max_terms {
        labels.push(label);
        label = label.successor();
    }

    // admissibility grid: a variable exists only where some offering admits
    // the course in that term
    let mut problem = ProblemVariables::new();
    let mut vars: HashMap<(usize, usize), Variable> = HashMap::new();
    for (i, course) in remaining.iter().enumerate() {
        for (t, label) in labels.iter().enumerate() {
            if catalog
                .offerings
                .has_admissible(course.id, *label, opts.allow_overfull, &ledger)
            {
                vars.insert((i, t), problem.add(variable().binary()));
            }
        }
    }

    if vars.is_empty() {
        let unscheduled = remaining.iter().map(|c| c.course_code.clone()).collect();
        return PlanOutcome {
            terms: labels
                .iter()
                .map(|label| TermPlan::empty(label.to_string()))
                .collect(),
            unscheduled,
            ledger,
        };
    }

    let horizon = f64::from(opts.max_terms);
    let objective: Expression = vars
        .iter()
        .map(|((i, t), var)| f64::from(remaining[*i].credits) * (horizon - *t as f64) * *var)
        .sum();

    tracing::debug!(
        courses = remaining.len(),
        terms = labels.len(),
        variables = vars.len(),
        "setting up exact assignment model"
    );

    let mut model = problem
        .maximise(objective)
        .using(default_solver)
        .set_option("time_limit", solver_opts.time_limit_seconds as f64)
        .set_option("parallel", "on")
        .set_option("threads", solver_opts.workers as i32);

    let code_index: HashMap<&str, usize> = remaining
        .iter()
        .enumerate()
        .map(|(i, c)| (c.course_code.as_str(), i))
        .collect();

    // each course at most once
    for i in 0..remaining.len() {
        let course_vars: Vec<Variable> = (0..labels.len())
            .filter_map(|t| vars.get(&(i, t)).copied())
            .collect();
        if !course_vars.is_empty() {
            let total: Expression = course_vars.iter().copied().sum();
            model.add_constraint(constraint!(total <= 1));
        }
    }

    // prerequisite ordering: x[c, t] <= sum of the prerequisite's variables
    // in strictly earlier terms; completed prerequisites are satisfied, and
    // a prerequisite with no placement before t blocks the course at t
    for (i, course) in remaining.iter().enumerate() {
        for prereq in catalog.prereqs.prereqs_of(&course.course_code) {
            if completed.contains(prereq.as_str()) {
                continue;
            }
            let prereq_index = code_index.get(prereq.as_str()).copied();
            for t in 0..labels.len() {
                let Some(var) = vars.get(&(i, t)).copied() else {
                    continue;
                };
                let earlier: Vec<Variable> = prereq_index
                    .map(|p| {
                        (0..t).filter_map(|s| vars.get(&(p, s)).copied()).collect()
                    })
                    .unwrap_or_default();
                let placement = Expression::from(var);
                if earlier.is_empty() {
                    model.add_constraint(constraint!(placement <= 0));
                } else {
                    let coverage: Expression = earlier.iter().copied().sum();
                    model.add_constraint(constraint!(placement <= coverage));
                }
            }
        }
    }

    // per-term credit cap
    for t in 0..labels.len() {
        let terms: Vec<Expression> = (0..remaining.len())
            .filter_map(|i| {
                vars.get(&(i, t))
                    .map(|var| f64::from(remaining[i].credits) * *var)
            })
            .collect();
        if !terms.is_empty() {
            let load: Expression = terms.into_iter().sum();
            model.add_constraint(constraint!(load <= f64::from(credit_cap)));
        }
    }

    let solution = match model.solve() {
        Ok(solution) => solution,
        Err(err) => {
            tracing::warn!("exact solver returned no plan: {err}");
            let unscheduled = remaining.iter().map(|c| c.course_code.clone()).collect();
            return PlanOutcome {
                terms: Vec::new(),
                unscheduled,
                ledger,
            };
        }
    };

    let mut scheduled = HashSet::new();
    let mut terms_out = Vec::new();
    for (t, label) in labels.iter().enumerate() {
        let mut courses = Vec::new();
        let mut total_credits = 0;
        for (i, course) in remaining.iter().enumerate() {
            let chosen = vars
                .get(&(i, t))
                .is_some_and(|var| solution.value(*var) > 0.5);
            if !chosen {
                continue;
            }
            let offering = catalog
                .offerings
                .select(course.id, *label, prefs, opts.allow_overfull, &ledger)
                .map(|o| snapshot_offering(o, &ledger));
            courses.push(PlannedCourse {
                course_code: course.course_code.clone(),
                name: course.name.clone(),
                credits: course.credits,
                offering,
            });
            total_credits += course.credits;
            scheduled.insert(course.course_code.clone());
        }
        terms_out.push(TermPlan {
            semester: label.to_string(),
            courses,
            total_credits,
        });
    }

    let mut unscheduled: Vec<String> = remaining
        .iter()
        .filter(|c| !scheduled.contains(&c.course_code))
        .map(|c| c.course_code.clone())
        .collect();
    unscheduled.sort_unstable();

    PlanOutcome {
        terms: terms_out,
        unscheduled,
        ledger,
    }
}
