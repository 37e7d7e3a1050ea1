//! Transitive prerequisite trees
//!
//! [`expand`] turns a flat course -> AND-groups lookup into a full tree where
//! every OR-option is expanded into its own subtree. Cycles are cut at the
//! first course that reappears among its own ancestors.

use crate::prereq::{CourseRecord, PrereqGroup, TermGroup, ValidationError, resolve_groups};
use crate::term::Term;
use serde::Serialize;
use std::{
    collections::{BTreeSet, HashMap, HashSet},
    fmt::{Display, Formatter, Result as FmtResult},
};

/// Source of resolved prerequisites for the expander
///
/// Unknown courses must yield an empty slice.
pub trait PrereqLookup {
    fn prereqs(&self, course_id: &str) -> &[PrereqGroup];
}

impl PrereqLookup for HashMap<String, Vec<PrereqGroup>> {
    fn prereqs(&self, course_id: &str) -> &[PrereqGroup] {
        self.get(course_id).map(Vec::as_slice).unwrap_or_default()
    }
}

/// An in-memory course -> resolved groups table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrereqTable {
    courses: HashMap<String, Vec<PrereqGroup>>,
}

impl PrereqTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, course_id: impl Into<String>, groups: Vec<PrereqGroup>) {
        self.courses.insert(course_id.into(), groups);
    }

    pub fn contains(&self, course_id: &str) -> bool {
        self.courses.contains_key(course_id)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Builds a table straight from scraped records
    ///
    /// Records for the same course from different terms are merged with the
    /// same newest-term-wins rule the store uses. Within one (course, term) the
    /// last record wins. Records that fail validation are returned alongside
    /// the table instead of aborting the whole load.
    pub fn from_records<I>(records: I) -> (Self, Vec<(CourseRecord, ValidationError)>)
    where
        I: IntoIterator<Item = CourseRecord>,
    {
        let mut by_course: HashMap<String, HashMap<String, Vec<PrereqGroup>>> = HashMap::new();
        let mut rejected = Vec::new();

        for record in records {
            match record.validate() {
                Ok((_, groups)) => {
                    by_course
                        .entry(record.course_id.clone())
                        .or_default()
                        .insert(record.term.clone(), groups);
                }
                Err(e) => rejected.push((record, e)),
            }
        }

        let courses = by_course
            .into_iter()
            .map(|(course_id, terms)| {
                let tagged = terms.into_iter().flat_map(|(term, groups)| {
                    let term = Term::new(term);
                    groups.into_iter().map(move |group| TermGroup {
                        term: term.clone(),
                        group,
                    })
                });
                (course_id, resolve_groups(tagged))
            })
            .collect();

        (Self { courses }, rejected)
    }
}

impl PrereqLookup for PrereqTable {
    fn prereqs(&self, course_id: &str) -> &[PrereqGroup] {
        self.courses.prereqs(course_id)
    }
}

/// A course and its expanded prerequisite groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrereqTree {
    pub course_id: String,
    pub groups: Vec<TreeGroup>,
    pub is_cycle: bool,
}

/// An expanded AND-group: every option is its own subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeGroup {
    pub sequence: i32,
    pub options: Vec<PrereqTree>,
}

impl PrereqTree {
    fn leaf(course_id: &str, is_cycle: bool) -> Self {
        Self {
            course_id: course_id.to_owned(),
            groups: Vec::new(),
            is_cycle,
        }
    }

    /// Every distinct course id mentioned in the tree, root included
    pub fn courses(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_courses(&mut out);
        out
    }

    fn collect_courses<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        out.insert(&self.course_id);
        for group in &self.groups {
            for option in &group.options {
                option.collect_courses(out);
            }
        }
    }

    /// Renders the tree as indented text
    ///
    /// Single-option groups are printed inline; groups with several options
    /// are introduced by `pick one of:` with one bullet per option.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0, "");
        out
    }

    fn render_into(&self, out: &mut String, indent: usize, prefix: &str) {
        let note = if self.is_cycle { " (cycle)" } else { "" };
        out.push_str(&format!(
            "{}{prefix}{}{note}\n",
            "  ".repeat(indent),
            self.course_id
        ));

        for group in &self.groups {
            match group.options.as_slice() {
                [only] => only.render_into(out, indent + 1, ""),
                options => {
                    out.push_str(&format!("{}pick one of:\n", "  ".repeat(indent + 1)));
                    for option in options {
                        option.render_into(out, indent + 2, "- ");
                    }
                }
            }
        }
    }
}

impl Display for PrereqTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.render())
    }
}

/// Expands `root` into its full transitive prerequisite tree
///
/// The walk is depth-first and keeps only the current ancestor path, so a
/// course shared by two independent branches is expanded in both. A course
/// that reappears among its own ancestors is emitted as a cycle leaf. Courses
/// missing from the lookup are plain leaves.
pub fn expand<L>(root: &str, lookup: &L) -> PrereqTree
where
    L: PrereqLookup + ?Sized,
{
    let mut ancestors = HashSet::new();
    expand_node(root, lookup, &mut ancestors)
}

fn expand_node<'a, L>(
    course_id: &'a str,
    lookup: &'a L,
    ancestors: &mut HashSet<&'a str>,
) -> PrereqTree
where
    L: PrereqLookup + ?Sized,
{
    if ancestors.contains(course_id) {
        return PrereqTree::leaf(course_id, true);
    }

    ancestors.insert(course_id);
    let groups = lookup
        .prereqs(course_id)
        .iter()
        .map(|group| TreeGroup {
            sequence: group.sequence,
            options: group
                .options
                .iter()
                .map(|option| expand_node(option, lookup, ancestors))
                .collect(),
        })
        .collect();
    ancestors.remove(course_id);

    PrereqTree {
        course_id: course_id.to_owned(),
        groups,
        is_cycle: false,
    }
}
