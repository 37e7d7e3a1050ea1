pub mod prereq;
