//! Prerequisite adjacency map and eligibility checks.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::LazyLock;

use pathplanner_domain::Course;

static NO_PREREQS: LazyLock<BTreeSet<String>> = LazyLock::new(BTreeSet::new);

/// Map from course code to the set of prerequisite course codes, built in a
/// single pass over the edge table.
#[derive(Debug, Clone, Default)]
pub struct PrereqMap {
    by_code: HashMap<String, BTreeSet<String>>,
}

impl PrereqMap {
    /// Build from catalog courses and (course_id, prerequisite_id) edges.
    /// Edges whose endpoints are missing from the catalog are skipped.
    pub fn build(courses: &[Course], edges: &[(i32, i32)]) -> Self {
        let id_to_code: HashMap<i32, &str> = courses
            .iter()
            .map(|c| (c.id, c.course_code.as_str()))
            .collect();

        let mut by_code: HashMap<String, BTreeSet<String>> = courses
            .iter()
            .map(|c| (c.course_code.clone(), BTreeSet::new()))
            .collect();

        for (course_id, prereq_id) in edges {
            let (Some(code), Some(prereq)) = (id_to_code.get(course_id), id_to_code.get(prereq_id))
            else {
                continue;
            };
            by_code
                .entry((*code).to_string())
                .or_default()
                .insert((*prereq).to_string());
        }

        Self { by_code }
    }

    /// Prerequisite codes of a course; empty for unknown courses.
    pub fn prereqs_of(&self, code: &str) -> &BTreeSet<String> {
        self.by_code.get(code).unwrap_or(&NO_PREREQS)
    }

    /// A course is eligible once every prerequisite is in the completed set.
    /// Prerequisites are never silently dropped: a prereq outside the
    /// completed set blocks the course even if nothing else references it.
    pub fn eligible(&self, code: &str, completed: &HashSet<String>) -> bool {
        self.prereqs_of(code)
            .iter()
            .all(|p| completed.contains(p.as_str()))
    }

    /// Prerequisites still missing from the completed set, in code order.
    pub fn missing(&self, code: &str, completed: &HashSet<String>) -> Vec<String> {
        self.prereqs_of(code)
            .iter()
            .filter(|p| !completed.contains(p.as_str()))
            .cloned()
            .collect()
    }
}
