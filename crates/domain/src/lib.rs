//! Domain types for the pathway planning backend.

pub mod errors;
pub mod plan;
pub mod preferences;
pub mod reservation;
pub mod term;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

pub use errors::*;
pub use plan::*;
pub use preferences::*;
pub use reservation::*;
pub use term::*;

/// Catalog course entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i32,
    /// Unique code such as "CSCI-1200".
    pub course_code: String,
    pub name: String,
    pub description: Option<String>,
    pub credits: i32,
    /// Catalog label, e.g. "Fall 2025".
    pub semester: String,
    pub department: String,
    /// Free-text prerequisite note from the catalog feed.
    pub prerequisites: Option<String>,
    pub capacity: Option<i32>,
    pub instructor: Option<String>,
    /// Meeting days as letters, e.g. "MWF" or "TR".
    pub days_of_week: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
}

/// One concrete section of a course in one term.
///
/// A null `year` marks a recurring offering: the section runs in that term
/// every year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseOffering {
    pub id: i32,
    pub course_id: i32,
    pub term: Term,
    pub year: Option<i32>,
    pub section: Option<String>,
    pub days: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub instructor: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub enrolled: Option<i32>,
    pub notes: Option<String>,
}

/// Degree pathway entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pathway {
    pub id: i32,
    /// Short unique code, e.g. "CSCI".
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub total_credits: i32,
}

/// Grouped sub-requirement of a pathway, e.g. "Technical Electives".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathwayRequirement {
    pub id: i32,
    pub pathway_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub credits_required: i32,
    pub course_count_required: Option<i32>,
}
