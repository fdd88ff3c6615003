//! Meeting day and clock-time primitives.

use std::fmt;

use chrono::{NaiveTime, Timelike};

/// Day letters in canonical order; R is Thursday, S/U the weekend.
const DAY_LETTERS: [char; 7] = ['M', 'T', 'W', 'R', 'F', 'S', 'U'];

/// A set of meeting days, e.g. {M, W, F}.
///
/// Parsing treats the input as an unordered set of letters, so "TR", "RT"
/// and "TTR" all denote {T, R}. Unknown characters are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DaySet(u8);

impl DaySet {
    pub const EMPTY: DaySet = DaySet(0);

    pub fn parse(days: &str) -> Self {
        let mut bits = 0u8;
        for ch in days.trim().to_ascii_uppercase().chars() {
            if let Some(i) = DAY_LETTERS.iter().position(|d| *d == ch) {
                bits |= 1 << i;
            }
        }
        DaySet(bits)
    }

    pub fn parse_opt(days: Option<&str>) -> Self {
        days.map(Self::parse).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn contains(&self, day: char) -> bool {
        DAY_LETTERS
            .iter()
            .position(|d| *d == day.to_ascii_uppercase())
            .is_some_and(|i| self.0 & (1 << i) != 0)
    }

    pub fn intersects(&self, other: DaySet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn intersection(&self, other: DaySet) -> DaySet {
        DaySet(self.0 & other.0)
    }

    pub fn union(&self, other: DaySet) -> DaySet {
        DaySet(self.0 | other.0)
    }

    /// Restrict to Monday-Friday.
    pub fn weekdays(&self) -> DaySet {
        self.intersection(DaySet::parse("MTWRF"))
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        DAY_LETTERS
            .iter()
            .enumerate()
            .filter(|(i, _)| self.0 & (1 << i) != 0)
            .map(|(_, d)| *d)
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for day in self.iter() {
            write!(f, "{day}")?;
        }
        Ok(())
    }
}

/// Parse a clock string to minute-of-day in [0, 1440).
///
/// Accepts 24-hour "HH:MM[:SS]" and 12-hour "HH:MM[AM|PM]" (12AM is 00,
/// 12PM is 12). Returns None for anything unparseable.
pub fn parse_clock(raw: &str) -> Option<u16> {
    let t = raw.trim().to_ascii_uppercase();
    let (digits, meridian) = if let Some(stripped) = t.strip_suffix("AM") {
        (stripped.trim(), Some(false))
    } else if let Some(stripped) = t.strip_suffix("PM") {
        (stripped.trim(), Some(true))
    } else {
        (t.as_str(), None)
    };

    let mut parts = digits.split(':');
    let mut hour: u16 = parts.next()?.trim().parse().ok()?;
    let minute: u16 = match parts.next() {
        Some(m) => m.trim().parse().ok()?,
        None => 0,
    };
    // a trailing seconds field is tolerated and ignored
    if let Some(s) = parts.next() {
        let _: u16 = s.trim().parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }

    match meridian {
        Some(pm) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            if pm && hour != 12 {
                hour += 12;
            }
            if !pm && hour == 12 {
                hour = 0;
            }
        }
        None => {
            if hour > 23 {
                return None;
            }
        }
    }
    if minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}

pub fn parse_clock_opt(raw: Option<&str>) -> Option<u16> {
    raw.and_then(parse_clock)
}

/// Minute-of-day for a parsed catalog time.
pub fn minute_of_day(t: NaiveTime) -> u16 {
    (t.hour() * 60 + t.minute()) as u16
}

/// Half-open interval overlap: [s1, e1) and [s2, e2) share a minute.
pub fn times_overlap(s1: u16, e1: u16, s2: u16, e2: u16) -> bool {
    s1 < e2 && s2 < e1
}

/// Idle minutes between the end of one class and the start of the next on
/// the same day; never negative.
pub fn gap_minutes(end_prev: u16, start_next: u16) -> u16 {
    start_next.saturating_sub(end_prev)
}
