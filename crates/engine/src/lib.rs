//! Planning and scoring engine.
//!
//! Pure and synchronous: callers load the catalog snapshot up front and every
//! function here operates on in-memory data. The only internal parallelism is
//! the exact solver's worker pool.

pub mod exact;
pub mod packer;
pub mod planner;
pub mod prefs;
pub mod prereq;
pub mod score;
pub mod selector;
pub mod timeslot;

pub use exact::{ExactOptions, plan_schedule_exact};
pub use packer::{Candidate, pack_term};
pub use planner::{Catalog, PlanOptions, PlanOutcome, plan_schedule};
pub use prefs::{PreferenceSet, TimeOfDay};
pub use prereq::PrereqMap;
pub use score::{ScoredCourse, score_courses};
pub use selector::{OfferingIndex, SeatLedger};
pub use timeslot::DaySet;
