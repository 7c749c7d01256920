//! Report periods encoded in file names and season labels.

use std::fmt;

/// Season label some sources report instead of a calendar quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }

    /// Quarter slot the season is folded into (winter 1 through fall 4).
    pub fn quarter(&self) -> u8 {
        match self {
            Season::Winter => 1,
            Season::Spring => 2,
            Season::Summer => 3,
            Season::Fall => 4,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A six-month reporting window from an `avg-stump-val-MM-YY-MM-YY` name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    pub start_month: u8,
    pub start_year: i32,
    pub end_month: u8,
    pub end_year: i32,
}

const REPORT_PREFIX: &str = "avg-stump-val-";

fn two_digits(part: &str) -> Option<u8> {
    if part.len() == 2 && part.bytes().all(|byte| byte.is_ascii_digit()) {
        part.parse().ok()
    } else {
        None
    }
}

fn month(part: &str) -> Option<u8> {
    two_digits(part).filter(|value| (1..=12).contains(value))
}

impl ReportPeriod {
    /// Parses a report file name; an extension is ignored.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem = name.split('.').next()?;
        let rest = stem.strip_prefix(REPORT_PREFIX)?;
        let parts: Vec<&str> = rest.split('-').collect();
        let [start_month, start_year, end_month, end_year] = parts.as_slice() else {
            return None;
        };
        Some(Self {
            start_month: month(start_month)?,
            start_year: 2000 + i32::from(two_digits(start_year)?),
            end_month: month(end_month)?,
            end_year: 2000 + i32::from(two_digits(end_year)?),
        })
    }

    /// Windows opening April through September are the spring report.
    pub fn season(&self) -> Season {
        if (4..=9).contains(&self.start_month) {
            Season::Spring
        } else {
            Season::Fall
        }
    }

    /// `MM/YYYY-MM/YYYY`.
    pub fn date_span(&self) -> String {
        format!(
            "{:02}/{}-{:02}/{}",
            self.start_month, self.start_year, self.end_month, self.end_year
        )
    }
}
