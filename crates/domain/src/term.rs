//! Term labels and the canonical term ordering.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::PlannerError;

/// Academic term within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Fall,
    Spring,
    Summer,
}

impl Term {
    pub fn as_str(&self) -> &'static str {
        match self {
            Term::Fall => "Fall",
            Term::Spring => "Spring",
            Term::Summer => "Summer",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Term {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fall" => Ok(Term::Fall),
            "Spring" => Ok(Term::Spring),
            "Summer" => Ok(Term::Summer),
            other => Err(PlannerError::InvalidInput(format!(
                "unknown term name: {other}"
            ))),
        }
    }
}

/// Canonical "Term YYYY" label.
///
/// Successor ordering: Fall Y -> Spring Y+1 -> Summer Y+1 -> Fall Y+1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TermLabel {
    pub term: Term,
    pub year: i32,
}

impl TermLabel {
    pub fn new(term: Term, year: i32) -> Self {
        Self { term, year }
    }

    /// Parse a label of the form "Fall 2025".
    ///
    /// A label without a parseable 4-digit year is rejected rather than
    /// guessed at.
    pub fn parse(label: &str) -> Result<Self, PlannerError> {
        let mut parts = label.split_whitespace();
        let (Some(term), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(PlannerError::InvalidInput(format!(
                "malformed term label: {label:?} (expected \"Term YYYY\")"
            )));
        };
        let term = Term::from_str(term)?;
        let year: i32 = year.parse().map_err(|_| {
            PlannerError::InvalidInput(format!("malformed year in term label: {label:?}"))
        })?;
        if !(1000..=9999).contains(&year) {
            return Err(PlannerError::InvalidInput(format!(
                "year out of range in term label: {label:?}"
            )));
        }
        Ok(Self { term, year })
    }

    /// The next term in the canonical ordering.
    pub fn successor(&self) -> Self {
        match self.term {
            Term::Fall => Self::new(Term::Spring, self.year + 1),
            Term::Spring => Self::new(Term::Summer, self.year),
            Term::Summer => Self::new(Term::Fall, self.year),
        }
    }

    /// The term in progress on the given date: August onward is Fall,
    /// May-July is Summer, otherwise Spring.
    pub fn for_date(date: NaiveDate) -> Self {
        let term = match date.month() {
            8.. => Term::Fall,
            5.. => Term::Summer,
            _ => Term::Spring,
        };
        Self::new(term, date.year())
    }
}

impl fmt::Display for TermLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.term, self.year)
    }
}
