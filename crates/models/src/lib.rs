pub mod course_id;
pub mod prereq;
pub mod term;
pub mod tree;

pub use course_id::CourseId;
pub use prereq::{
    CourseRecord, PrereqGroup, PrereqGroupInput, PrereqOptionInput, TermGroup, ValidationError,
};
pub use term::Term;
pub use tree::{PrereqLookup, PrereqTable, PrereqTree, TreeGroup, expand};
