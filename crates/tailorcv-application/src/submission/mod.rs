//! Generic submission workflow.

mod workflow;

pub use workflow::{SubmissionSnapshot, SubmissionWorkflow};
