//! Plan and score request handling.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sqlx::PgPool;
use validator::Validate;

use pathplanner_config::AppConfig;
use pathplanner_domain::{
    CorequisiteLink, FourYearRequest, Pathway, PlanRequest, PlannerError, ScoreRequest,
    ScoreResponse, ScoreWeights, SolverKind, TermLabel, TermPlan,
};
use pathplanner_engine::{
    Catalog, ExactOptions, OfferingIndex, PlanOptions, PlanOutcome, PreferenceSet, PrereqMap,
    ScoredCourse, plan_schedule, plan_schedule_exact, score_courses,
};
use pathplanner_storage::CatalogRepository;

/// Planning and scoring service.
#[derive(Clone)]
pub struct PlanService {
    catalog: CatalogRepository,
    solver: ExactOptions,
}

impl PlanService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            catalog: CatalogRepository::new(pool),
            solver: ExactOptions::default(),
        }
    }

    pub fn with_config(pool: PgPool, config: &AppConfig) -> Self {
        Self {
            catalog: CatalogRepository::new(pool),
            solver: ExactOptions {
                time_limit_seconds: config.solver_time_limit_seconds,
                workers: config.solver_workers,
            },
        }
    }

    /// Produce a term-by-term plan for a pathway.
    ///
    /// Solver outcomes are data: an unsatisfiable problem yields a partial
    /// plan and a solver failure an empty one. Only malformed requests
    /// error.
    pub async fn plan(&self, request: &PlanRequest) -> Result<Vec<TermPlan>, PlannerError> {
        request
            .validate()
            .map_err(PlannerError::from_validation_errors)?;
        let pathway = self
            .resolve_pathway(request.pathway_id, request.pathway_code.as_deref())
            .await?;

        let start = match request.start_semester.as_deref() {
            Some(label) => TermLabel::parse(label)?,
            None => TermLabel::for_date(Utc::now().date_naive()),
        };
        let opts = PlanOptions {
            max_credits_per_term: request.max_credits_per_semester,
            max_terms: request.max_terms,
            allow_overfull: request.allow_overfull,
            reserve_seats: request.reserve_seats,
            balance_load: request.balance_load,
            start,
        };

        let outcome = self
            .run_planner(
                &pathway,
                &request.completed_course_codes,
                request.user_id,
                &opts,
                request.solver,
            )
            .await?;
        Ok(outcome.terms)
    }

    /// Four-year preset: fixed horizon, balanced by default, padded with
    /// empty terms out to the full horizon.
    pub async fn four_year_plan(
        &self,
        request: &FourYearRequest,
    ) -> Result<Vec<TermPlan>, PlannerError> {
        request
            .validate()
            .map_err(PlannerError::from_validation_errors)?;
        let pathway = self
            .resolve_pathway(request.pathway_id, request.pathway_code.as_deref())
            .await?;

        let terms_per_year = if request.include_summer { 3 } else { 2 };
        let max_terms = request.years * terms_per_year;
        let start = TermLabel::for_date(Utc::now().date_naive());
        let opts = PlanOptions {
            max_credits_per_term: request.max_credits_per_semester,
            max_terms,
            allow_overfull: request.allow_overfull,
            reserve_seats: request.reserve_seats,
            balance_load: request.balance_load,
            start,
        };

        let outcome = self
            .run_planner(
                &pathway,
                &request.completed_course_codes,
                request.user_id,
                &opts,
                SolverKind::Heuristic,
            )
            .await?;

        let mut plan = outcome.terms;
        let mut label = match plan.last() {
            Some(term) => TermLabel::parse(&term.semester)?.successor(),
            None => start,
        };
        while plan.len() < max_terms as usize {
            plan.push(TermPlan::empty(label.to_string()));
            label = label.successor();
        }
        Ok(plan)
    }

    /// Score an arbitrary set of catalog courses against preferences.
    pub async fn score(&self, request: &ScoreRequest) -> Result<ScoreResponse, PlannerError> {
        request
            .validate()
            .map_err(PlannerError::from_validation_errors)?;

        let courses = self.catalog.courses_by_ids(&request.course_ids).await?;
        if courses.len() != request.course_ids.len() {
            return Err(PlannerError::InvalidInput(format!(
                "one or more courses not found: requested {}, found {}",
                request.course_ids.len(),
                courses.len()
            )));
        }

        let weights = match &request.weights {
            Some(overrides) => ScoreWeights::with_overrides(overrides),
            None => ScoreWeights::default(),
        };
        let stored = match (&request.preferences, request.user_id) {
            (Some(inline), _) => Some(inline.clone()),
            (None, Some(user_id)) => self.catalog.preferences_for_user(user_id).await?,
            (None, None) => None,
        };
        let prefs = stored.as_ref().map(PreferenceSet::from);
        let avg_rating = self.catalog.average_rating(&request.course_ids).await?;

        let scored: Vec<ScoredCourse> = courses.iter().map(ScoredCourse::from).collect();
        Ok(score_courses(&scored, &weights, prefs.as_ref(), avg_rating))
    }

    /// Corequisite pairings rooted at a pathway's target courses.
    ///
    /// The relation is informational: plans never force the pair into one
    /// term, so callers get the raw links and decide how to present or
    /// enforce them. Pairs whose partner sits outside the pathway are
    /// included, since the partner is still a real catalog course.
    pub async fn corequisites_for(
        &self,
        pathway_id: i32,
    ) -> Result<Vec<CorequisiteLink>, PlannerError> {
        let pathway = self
            .catalog
            .pathway_by_id(pathway_id)
            .await?
            .ok_or_else(|| PlannerError::NotFound("pathway".to_string()))?;

        let target: HashSet<String> = self
            .catalog
            .pathway_course_codes(pathway.id)
            .await?
            .into_iter()
            .collect();
        if target.is_empty() {
            return Ok(Vec::new());
        }

        let all_courses = self.catalog.list_courses().await?;
        let id_to_code: HashMap<i32, &str> = all_courses
            .iter()
            .map(|c| (c.id, c.course_code.as_str()))
            .collect();

        let mut links: Vec<CorequisiteLink> = self
            .catalog
            .corequisite_edges()
            .await?
            .into_iter()
            .filter_map(|(course_id, corequisite_id)| {
                let course = id_to_code.get(&course_id)?;
                let corequisite = id_to_code.get(&corequisite_id)?;
                target.contains(*course).then(|| CorequisiteLink {
                    course_code: (*course).to_string(),
                    corequisite_code: (*corequisite).to_string(),
                })
            })
            .collect();
        links.sort();
        Ok(links)
    }

    async fn resolve_pathway(
        &self,
        pathway_id: Option<i32>,
        pathway_code: Option<&str>,
    ) -> Result<Pathway, PlannerError> {
        let pathway = match (pathway_id, pathway_code) {
            (Some(id), None) => self.catalog.pathway_by_id(id).await?,
            (None, Some(code)) => self.catalog.pathway_by_code(code).await?,
            (None, None) => {
                return Err(PlannerError::InvalidInput(
                    "pathway_id or pathway_code required".to_string(),
                ));
            }
            (Some(_), Some(_)) => {
                return Err(PlannerError::InvalidInput(
                    "provide exactly one of pathway_id and pathway_code".to_string(),
                ));
            }
        };
        pathway.ok_or_else(|| PlannerError::NotFound("pathway".to_string()))
    }

    /// Load the catalog snapshot for one request and run the chosen solver
    /// synchronously over it.
    async fn run_planner(
        &self,
        pathway: &Pathway,
        completed_codes: &[String],
        user_id: Option<i32>,
        opts: &PlanOptions,
        solver: SolverKind,
    ) -> Result<PlanOutcome, PlannerError> {
        let codes = self.catalog.pathway_course_codes(pathway.id).await?;
        if codes.is_empty() {
            return Ok(PlanOutcome::default());
        }

        let target_courses = self.catalog.courses_by_codes(&codes).await?;
        let course_ids: Vec<i32> = target_courses.iter().map(|c| c.id).collect();
        let all_courses = self.catalog.list_courses().await?;
        let edges = self.catalog.prerequisite_edges().await?;
        let offerings = self.catalog.offerings_for_courses(&course_ids).await?;

        let snapshot = Catalog::new(
            target_courses,
            PrereqMap::build(&all_courses, &edges),
            OfferingIndex::new(offerings),
        );

        let stored = match user_id {
            Some(user_id) => self.catalog.preferences_for_user(user_id).await?,
            None => None,
        };
        let prefs = PreferenceSet::from(&stored.unwrap_or_default());
        let completed: HashSet<String> = completed_codes.iter().cloned().collect();

        tracing::info!(
            pathway = %pathway.code,
            courses = snapshot.courses.len(),
            completed = completed.len(),
            solver = ?solver,
            "planning pathway"
        );

        let outcome = match solver {
            SolverKind::Heuristic => plan_schedule(&snapshot, &prefs, opts, &completed),
            SolverKind::Exact => {
                plan_schedule_exact(&snapshot, &prefs, opts, &self.solver, &completed)
            }
        };

        if !outcome.unscheduled.is_empty() {
            tracing::warn!(
                pathway = %pathway.code,
                unscheduled = ?outcome.unscheduled,
                "plan is partial"
            );
        }

        if opts.reserve_seats {
            let mut held: Vec<i32> = outcome.ledger.offering_ids().collect();
            held.sort_unstable();
            for offering_id in held {
                for _ in 0..outcome.ledger.held(offering_id) {
                    self.catalog.bump_enrolled(offering_id).await?;
                }
            }
        }

        Ok(outcome)
    }
}
