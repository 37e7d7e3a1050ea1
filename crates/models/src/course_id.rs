use crate::prereq::ValidationError;
use serde::Serialize;
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// A catalog course identifier such as `CSE100` or `MATH20C`
///
/// The identifier is split into a subject (the leading alphabetic run) and a
/// number (everything after it). Concatenating the two always gives back the
/// original identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CourseId {
    subject: String,
    number: String,
}

impl CourseId {
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn number(&self) -> &str {
        &self.number
    }
}

impl FromStr for CourseId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .char_indices()
            .find(|(_, c)| !c.is_alphabetic())
            .map_or(s.len(), |(idx, _)| idx);

        if split == 0 {
            return Err(ValidationError::InvalidCourseId(s.to_owned()));
        }

        let (subject, number) = s.split_at(split);
        Ok(Self {
            subject: subject.to_owned(),
            number: number.to_owned(),
        })
    }
}

impl Display for CourseId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}", self.subject, self.number)
    }
}
