use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// Label used for records that do not say which term they came from
pub const DEFAULT_TERM: &str = "unknown";

/// Season codes in calendar order within a year
const SEASONS: [&str; 7] = ["WI", "SP", "S1", "S2", "S3", "SU", "FA"];

/// An academic term label with a chronological sort key
///
/// Labels like `FA25` or `WI26` are ordered by (year, season), so `FA25` sorts
/// before `WI26` and `WI26` before `SP26`. Labels that do not follow that
/// scheme compare by raw string among themselves and always sort before any
/// recognized term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Term {
    label: String,
    key: Option<(u16, u8)>,
}

impl Term {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let key = Self::parse_key(&label);
        Self { label, key }
    }

    pub fn as_str(&self) -> &str {
        &self.label
    }

    /// Whether the label was recognized as a `<season><yy>` term
    pub fn is_chronological(&self) -> bool {
        self.key.is_some()
    }

    fn parse_key(label: &str) -> Option<(u16, u8)> {
        if label.len() != 4 || !label.is_ascii() {
            return None;
        }

        let (season, year) = label.split_at(2);
        let season = season.to_ascii_uppercase();
        let ordinal = SEASONS.iter().position(|s| *s == season)?;

        if !year.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let year = year.parse::<u16>().ok()?;

        Some((2000 + year, ordinal as u8))
    }
}

impl Default for Term {
    fn default() -> Self {
        Self::new(DEFAULT_TERM)
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.key, other.key) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.label.cmp(&other.label)),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => self.label.cmp(&other.label),
        }
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<String> for Term {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

impl From<&str> for Term {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<Term> for String {
    fn from(term: Term) -> Self {
        term.label
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chronological_ordering() {
        assert!(Term::new("FA25") < Term::new("WI26"));
        assert!(Term::new("WI26") < Term::new("SP26"));
        assert!(Term::new("SP26") < Term::new("S126"));
        assert!(Term::new("SU26") < Term::new("FA26"));
        assert!(Term::new("FA24") < Term::new("SP25"));
    }

    #[test]
    fn test_case_insensitive_season() {
        let term = Term::new("wi26");
        assert!(term.is_chronological());
        assert!(Term::new("FA25") < term);
        assert_eq!(term.as_str(), "wi26");
    }

    #[test]
    fn test_unrecognized_labels() {
        let unknown = Term::default();
        assert_eq!(unknown.as_str(), DEFAULT_TERM);
        assert!(!unknown.is_chronological());

        // Unrecognized labels are always older than recognized ones
        assert!(unknown < Term::new("FA10"));
        assert!(Term::new("zzz") < Term::new("WI00"));

        // ...and fall back to string order among themselves
        assert!(Term::new("2024") < Term::new("2025"));
        assert!(Term::new("t1") < Term::new("t2"));
        assert!(Term::new("XX25") < Term::new("YY25"));
    }

    #[test]
    fn test_serde_as_plain_string() {
        let term: Term = serde_json::from_str("\"FA25\"").unwrap();
        assert_eq!(term, Term::new("FA25"));
        assert_eq!(serde_json::to_string(&term).unwrap(), "\"FA25\"");
    }
}
