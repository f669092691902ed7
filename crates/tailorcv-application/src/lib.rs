pub mod session;
pub mod shell;
pub mod submission;

pub use crate::session::{SessionManager, SessionPhase};
pub use crate::shell::{AppShell, ShellView};
pub use crate::submission::{SubmissionSnapshot, SubmissionWorkflow};
