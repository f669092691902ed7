//! Submission domain types: request state, file policy, gateway contract.

mod gateway;
mod model;
mod policy;

pub use gateway::SubmitGateway;
pub use model::{AttachedFile, SubmissionReceipt, SubmissionStatus};
pub use policy::{
    CompletenessCheck, FilePolicy, FileRule, WorkflowPolicy, FIELD_EMAIL, FIELD_JOB_DESCRIPTION,
    FIELD_LINKEDIN_URL, PAYMENT_MAX_FILE_BYTES, RESUME_MAX_FILE_BYTES,
};
