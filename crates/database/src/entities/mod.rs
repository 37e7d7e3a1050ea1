pub mod course;
pub mod prereq_group;
pub mod prereq_option;

pub use course as courses;
pub use prereq_group as prereq_groups;
pub use prereq_option as prereq_options;
