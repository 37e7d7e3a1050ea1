use crate::{
    course_id::CourseId,
    term::{DEFAULT_TERM, Term},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Reasons an ingestion record is rejected before anything is written
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid course id {0:?}: expected a leading alphabetic subject")]
    InvalidCourseId(String),
    #[error("prerequisite group {sequence} has no options")]
    EmptyGroup { sequence: i64 },
    #[error("invalid prerequisite sequence {0}: must be a positive integer")]
    InvalidSequence(i64),
    #[error("prerequisite sequence {0} appears more than once")]
    DuplicateSequence(i64),
    #[error("prerequisite group {sequence} has an option with an empty course id")]
    EmptyOption { sequence: i64 },
}

/// One OR-choice as it arrives from the scraper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrereqOptionInput {
    pub course_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl PrereqOptionInput {
    pub fn new(course_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            title: None,
        }
    }
}

/// One AND-group as it arrives from the scraper
///
/// The sequence is kept wide here so that out-of-range values are reported as
/// validation errors instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrereqGroupInput {
    pub sequence: i64,
    pub options: Vec<PrereqOptionInput>,
}

impl PrereqGroupInput {
    pub fn new<I, S>(sequence: i64, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sequence,
            options: options.into_iter().map(PrereqOptionInput::new).collect(),
        }
    }
}

fn default_term() -> String {
    DEFAULT_TERM.to_string()
}

/// A scraped course with its prerequisites for a single term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub course_id: String,
    #[serde(default = "default_term")]
    pub term: String,
    #[serde(default)]
    pub prereqs: Vec<PrereqGroupInput>,
}

impl CourseRecord {
    /// Checks the record and returns its parsed course id and groups
    pub fn validate(&self) -> Result<(CourseId, Vec<PrereqGroup>), ValidationError> {
        let course_id = self.course_id.parse()?;
        let groups = validate_groups(&self.prereqs)?;
        Ok((course_id, groups))
    }
}

/// A validated AND-group: any one of `options` satisfies it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrereqGroup {
    pub sequence: i32,
    pub options: Vec<String>,
}

impl PrereqGroup {
    pub fn new<I, S>(sequence: i32, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sequence,
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// A group tagged with the term it was scraped in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermGroup {
    pub term: Term,
    pub group: PrereqGroup,
}

/// Validates raw groups for a single (course, term) submission
///
/// Rejects empty groups, non-positive or out-of-range sequences, repeated
/// sequences and blank option ids. Duplicate options inside a group are
/// collapsed, keeping the first occurrence.
pub fn validate_groups(
    groups: &[PrereqGroupInput],
) -> Result<Vec<PrereqGroup>, ValidationError> {
    let mut seen = HashSet::new();
    let mut validated = Vec::with_capacity(groups.len());

    for group in groups {
        let sequence = i32::try_from(group.sequence)
            .ok()
            .filter(|s| *s >= 1)
            .ok_or(ValidationError::InvalidSequence(group.sequence))?;

        if !seen.insert(sequence) {
            return Err(ValidationError::DuplicateSequence(group.sequence));
        }

        if group.options.is_empty() {
            return Err(ValidationError::EmptyGroup {
                sequence: group.sequence,
            });
        }

        let mut options: Vec<String> = Vec::with_capacity(group.options.len());
        for option in &group.options {
            if option.course_id.trim().is_empty() {
                return Err(ValidationError::EmptyOption {
                    sequence: group.sequence,
                });
            }
            if !options.contains(&option.course_id) {
                options.push(option.course_id.clone());
            }
        }

        validated.push(PrereqGroup { sequence, options });
    }

    Ok(validated)
}

/// Merges groups from several terms into one view of a course's prerequisites
///
/// Groups are visited newest term first, then by ascending sequence. The first
/// group seen for each sequence number wins and older terms never reclaim it.
/// The result is sorted by sequence.
pub fn resolve_groups<I>(groups: I) -> Vec<PrereqGroup>
where
    I: IntoIterator<Item = TermGroup>,
{
    let mut groups: Vec<TermGroup> = groups.into_iter().collect();
    groups.sort_by(|a, b| {
        b.term
            .cmp(&a.term)
            .then_with(|| a.group.sequence.cmp(&b.group.sequence))
    });

    let mut claimed = HashSet::new();
    let mut resolved: Vec<PrereqGroup> = groups
        .into_iter()
        .filter(|tg| claimed.insert(tg.group.sequence))
        .map(|tg| tg.group)
        .collect();

    resolved.sort_by_key(|g| g.sequence);
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term_group(term: &str, sequence: i32, options: &[&str]) -> TermGroup {
        TermGroup {
            term: Term::new(term),
            group: PrereqGroup::new(sequence, options.iter().copied()),
        }
    }

    #[test]
    fn test_validate_groups() {
        let groups = vec![
            PrereqGroupInput::new(2, ["MATH20C"]),
            PrereqGroupInput::new(1, ["CSE21", "MATH154", "CSE21"]),
        ];

        let validated = validate_groups(&groups).unwrap();
        assert_eq!(
            validated,
            vec![
                PrereqGroup::new(2, ["MATH20C"]),
                PrereqGroup::new(1, ["CSE21", "MATH154"]),
            ]
        );
    }

    #[test]
    fn test_validate_rejects_empty_group() {
        let groups = vec![PrereqGroupInput::new(1, Vec::<String>::new())];
        assert_eq!(
            validate_groups(&groups),
            Err(ValidationError::EmptyGroup { sequence: 1 })
        );
    }

    #[test]
    fn test_validate_rejects_bad_sequences() {
        for sequence in [0, -1, i64::from(i32::MAX) + 1] {
            let groups = vec![PrereqGroupInput::new(sequence, ["CSE12"])];
            assert_eq!(
                validate_groups(&groups),
                Err(ValidationError::InvalidSequence(sequence))
            );
        }

        let groups = vec![
            PrereqGroupInput::new(1, ["CSE12"]),
            PrereqGroupInput::new(1, ["CSE15L"]),
        ];
        assert_eq!(
            validate_groups(&groups),
            Err(ValidationError::DuplicateSequence(1))
        );
    }

    #[test]
    fn test_validate_rejects_blank_option() {
        let groups = vec![PrereqGroupInput::new(3, ["CSE12", " "])];
        assert_eq!(
            validate_groups(&groups),
            Err(ValidationError::EmptyOption { sequence: 3 })
        );
    }

    #[test]
    fn test_record_defaults() {
        let record: CourseRecord = serde_json::from_str(r#"{"course_id": "CSE100"}"#).unwrap();
        assert_eq!(record.term, DEFAULT_TERM);
        assert!(record.prereqs.is_empty());

        let (course_id, groups) = record.validate().unwrap();
        assert_eq!(course_id.subject(), "CSE");
        assert!(groups.is_empty());
    }

    #[test]
    fn test_record_rejects_fractional_sequence() {
        let json = r#"{"course_id": "CSE100", "prereqs": [{"sequence": 1.5, "options": []}]}"#;
        assert!(serde_json::from_str::<CourseRecord>(json).is_err());
    }

    #[test]
    fn test_record_keeps_titles() {
        let json = r#"{
            "course_id": "CSE100",
            "term": "WI26",
            "prereqs": [{"sequence": 1, "options": [{"course_id": "CSE21", "title": "Discrete Math"}]}]
        }"#;
        let record: CourseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            record.prereqs[0].options[0].title.as_deref(),
            Some("Discrete Math")
        );
    }

    #[test]
    fn test_resolve_newest_term_wins() {
        let resolved = resolve_groups(vec![
            term_group("FA25", 1, &["A"]),
            term_group("WI26", 1, &["B"]),
        ]);
        assert_eq!(resolved, vec![PrereqGroup::new(1, ["B"])]);
    }

    #[test]
    fn test_resolve_unions_disjoint_sequences() {
        let resolved = resolve_groups(vec![
            term_group("WI26", 2, &["B"]),
            term_group("FA25", 1, &["A"]),
        ]);
        assert_eq!(
            resolved,
            vec![PrereqGroup::new(1, ["A"]), PrereqGroup::new(2, ["B"])]
        );
    }

    #[test]
    fn test_resolve_uses_chronological_terms() {
        // "SP26" < "WI26" as strings, but spring comes after winter
        let resolved = resolve_groups(vec![
            term_group("SP26", 1, &["NEW"]),
            term_group("WI26", 1, &["OLD"]),
            term_group("unknown", 1, &["STALE"]),
            term_group("unknown", 3, &["ONLY"]),
        ]);
        assert_eq!(
            resolved,
            vec![PrereqGroup::new(1, ["NEW"]), PrereqGroup::new(3, ["ONLY"])]
        );
    }

    #[test]
    fn test_resolve_empty() {
        assert!(resolve_groups(Vec::<TermGroup>::new()).is_empty());
    }
}
